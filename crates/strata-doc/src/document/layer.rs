use std::collections::BTreeMap;
use std::fmt;

use super::Cel;
use crate::frame::Frame;

/// Handle to a layer inside a [`Document`](super::Document).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayerId(pub(crate) u32);

impl LayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayerKind {
    /// Raster content.
    Image,
    /// Tile-based content; orders exactly like an image layer.
    Tilemap,
    /// Container for other layers.
    Group,
}

impl LayerKind {
    #[inline]
    pub const fn is_group(self) -> bool {
        matches!(self, LayerKind::Group)
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) name: String,
    pub(crate) kind: LayerKind,
    pub(crate) visible: bool,
    pub(crate) parent: Option<LayerId>,
    /// Back-to-front.
    pub(crate) children: Vec<LayerId>,
    pub(crate) cels: BTreeMap<Frame, Cel>,
}

impl Layer {
    pub(crate) fn new(name: impl Into<String>, kind: LayerKind, parent: Option<LayerId>) -> Self {
        Self {
            name: name.into(),
            kind,
            visible: true,
            parent,
            children: Vec::new(),
            cels: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    #[inline]
    pub fn cel(&self, frame: Frame) -> Option<&Cel> {
        self.cels.get(&frame)
    }

    /// Cels in frame order.
    pub fn cels(&self) -> impl Iterator<Item = &Cel> {
        self.cels.values()
    }
}
