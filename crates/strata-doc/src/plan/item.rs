use core::fmt;
use core::ptr;

/// One drawable cel in a render plan.
///
/// `cel` borrows the tree's storage; the plan never clones cel data.
pub struct Item<'a, C> {
    /// Structural position, assigned at insertion. Dense and increasing
    /// within a plan; wraps after `u32::MAX` insertions.
    pub order: u32,
    pub cel: &'a C,
}

impl<'a, C> Item<'a, C> {
    #[inline]
    pub const fn new(order: u32, cel: &'a C) -> Self {
        Self { order, cel }
    }

    /// Identity comparison against a cel in the source tree.
    #[inline]
    pub fn is_cel(&self, cel: &C) -> bool {
        ptr::eq(self.cel, cel)
    }

    /// `true` if both items reference the same cel object.
    #[inline]
    pub fn same_cel(&self, other: &Item<'_, C>) -> bool {
        ptr::eq(self.cel, other.cel)
    }
}

// Manual impls: `C` itself need not be `Clone`/`Copy`.
impl<C> Clone for Item<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Item<'_, C> {}

impl<C: fmt::Debug> fmt::Debug for Item<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("order", &self.order)
            .field("cel", self.cel)
            .finish()
    }
}
