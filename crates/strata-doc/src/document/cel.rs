use super::LayerId;
use crate::frame::Frame;
use crate::tree::ZIndexed;
use crate::z_index::ZIndex;

/// Content of one layer at one frame.
///
/// Pixel data lives elsewhere; for ordering only the owning layer, the frame
/// and the z-index matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cel {
    layer: LayerId,
    frame: Frame,
    z_index: ZIndex,
}

impl Cel {
    pub(crate) fn new(layer: LayerId, frame: Frame, z_index: ZIndex) -> Self {
        Self { layer, frame, z_index }
    }

    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn z_index(&self) -> ZIndex {
        self.z_index
    }

    pub(crate) fn set_z_index(&mut self, z_index: ZIndex) {
        self.z_index = z_index;
    }
}

impl ZIndexed for Cel {
    #[inline]
    fn z_index(&self) -> ZIndex {
        self.z_index
    }
}
