use core::cmp::Ordering;

use crate::z_index::ZIndex;

/// Sort key for one unit of a sibling run.
///
/// Ordering rules:
/// 1) `target`: ascending (structural slot + z-index, clamped to the run)
/// 2) `z`: ascending, so a cel moved onto an occupied slot passes its occupant
/// 3) `position`: ascending (structural order for full ties)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct RunKey {
    pub target: usize,
    pub z: ZIndex,
    pub position: usize,
}

impl RunKey {
    /// Key for the unit at `position` in a run of `len` units.
    ///
    /// `len` must be non-zero.
    #[inline]
    pub fn new(position: usize, len: usize, z: ZIndex) -> Self {
        debug_assert!(len > 0 && position < len);
        let last = (len - 1) as i64;
        let target = (position as i64 + i64::from(z.get())).clamp(0, last) as usize;
        Self { target, z, position }
    }
}

impl Ord for RunKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.target
            .cmp(&other.target)
            .then(self.z.cmp(&other.z))
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for RunKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
