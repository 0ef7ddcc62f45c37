use std::fmt;

use super::LayerId;
use crate::frame::Frame;

/// A rejected document edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The id does not name a layer of this document.
    UnknownLayer(LayerId),
    /// Layers can only be nested under groups.
    NotAGroup(LayerId),
    /// Groups own no cels in this model.
    GroupHasNoCels(LayerId),
    /// The root group cannot be hidden or re-parented.
    RootLayer,
    FrameOutOfRange { frame: Frame, frame_count: u32 },
    NoCel { layer: LayerId, frame: Frame },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLayer(id) => write!(f, "unknown layer {id}"),
            Self::NotAGroup(id) => write!(f, "layer {id} is not a group"),
            Self::GroupHasNoCels(id) => write!(f, "group layer {id} cannot hold cels"),
            Self::RootLayer => write!(f, "operation not allowed on the root group"),
            Self::FrameOutOfRange { frame, frame_count } => {
                write!(f, "frame {frame} out of range (document has {frame_count} frames)")
            }
            Self::NoCel { layer, frame } => write!(f, "layer {layer} has no cel at frame {frame}"),
        }
    }
}

impl std::error::Error for DocumentError {}

pub type Result<T> = std::result::Result<T, DocumentError>;
