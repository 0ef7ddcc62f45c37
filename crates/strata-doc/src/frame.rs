use core::fmt;

/// Index into a document's animation timeline.
///
/// Frames are zero-based. Whether a frame exists is decided by the document
/// that owns the timeline; the planner never checks bounds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Frame(pub u32);

impl Frame {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{}", self.0))
    }
}
