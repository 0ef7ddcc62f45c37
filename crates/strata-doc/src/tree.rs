//! Read-only view of a layer tree, as consumed by [`RenderPlan`](crate::plan::RenderPlan).
//!
//! The planner never owns or mutates layers. Anything that can answer the
//! four queries below can be planned: the bundled [`Document`](crate::document::Document)
//! or a host application's own scene graph.

use crate::frame::Frame;
use crate::z_index::ZIndex;

/// A cel that carries a z-index override.
///
/// Queried lazily when a plan is resolved, not when the cel is inserted.
pub trait ZIndexed {
    fn z_index(&self) -> ZIndex;
}

/// Layer queries needed to walk a compositing tree.
pub trait LayerTree {
    /// Cheap handle identifying one layer.
    type LayerId: Copy;
    /// Per-frame content of a layer.
    type Cel: ZIndexed;

    /// `false` hides the layer and everything beneath it.
    fn is_visible(&self, layer: Self::LayerId) -> bool;

    fn is_group(&self, layer: Self::LayerId) -> bool;

    /// Direct children of a group, back-to-front. Empty for non-groups.
    fn children(&self, layer: Self::LayerId) -> impl Iterator<Item = Self::LayerId> + '_;

    /// The layer's content at `frame`, or `None` when the layer has no
    /// (or an empty) cel there.
    ///
    /// Groups may return a cel; it is drawn behind the group's children.
    fn cel_at(&self, layer: Self::LayerId, frame: Frame) -> Option<&Self::Cel>;
}
