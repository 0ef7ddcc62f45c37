//! Render-order planning.
//!
//! A [`RenderPlan`] collects the drawable cels of one or more layer subtrees
//! for a single frame and hands them back in back-to-front draw order.
//!
//! Ordering happens in two phases:
//! - structural: a depth-first walk appends cels in sibling order
//! - z-index: on first read, each sibling run is re-sorted by per-cel offsets,
//!   clamped so no cel leaves the run it was inserted in
//!
//! Nested groups take part in their parent's run as a single block, so a cel
//! inside a group can only ever move among that group's own children.

mod item;
mod key;

use core::ops::Range;

use crate::frame::Frame;
use crate::tree::{LayerTree, ZIndexed};
use crate::z_index::ZIndex;

pub use item::Item;
use key::RunKey;

/// One reorderable entry of a sibling run.
#[derive(Debug, Clone)]
enum Unit {
    /// A single cel, by index into `RenderPlan::items`.
    Cel(usize),
    /// A non-empty nested group, moved as a whole.
    Block(Range<usize>),
}

impl Unit {
    #[inline]
    fn span(&self) -> Range<usize> {
        match self {
            Unit::Cel(i) => *i..*i + 1,
            Unit::Block(r) => r.clone(),
        }
    }
}

/// Units of one sibling span, in structural order.
///
/// Units are contiguous: the run covers `first.start..last.end`.
#[derive(Debug)]
struct Run {
    units: Vec<Unit>,
}

impl Run {
    fn span(&self) -> Range<usize> {
        match (self.units.first(), self.units.last()) {
            (Some(first), Some(last)) => first.span().start..last.span().end,
            _ => 0..0,
        }
    }
}

/// Back-to-front cel order for one render pass.
///
/// Performance characteristics:
/// - adding a subtree is O(visible layers)
/// - the first read after a mutation resolves z-indices in O(n log n);
///   later reads are O(1) until the next mutation
///
/// Mutating z-indices in the source tree after a read has no effect on
/// that resolved order; only [`add_layer`](Self::add_layer),
/// [`add_layers`](Self::add_layers) and [`clear`](Self::clear) invalidate it.
#[derive(Debug)]
pub struct RenderPlan<'a, C> {
    /// Items in insertion (structural) order.
    items: Vec<Item<'a, C>>,
    next_order: u32,

    /// Sibling runs in post-order: a nested run always precedes the run
    /// containing its block.
    runs: Vec<Run>,

    resolved: Vec<Item<'a, C>>,
    dirty: bool,

    scratch: Vec<Item<'a, C>>,
}

impl<C> Default for RenderPlan<'_, C> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_order: 0,
            runs: Vec::new(),
            resolved: Vec::new(),
            dirty: false,
            scratch: Vec::new(),
        }
    }
}

impl<'a, C: ZIndexed> RenderPlan<'a, C> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears items and sibling structure. Keeps allocated capacity for reuse.
    ///
    /// A cleared plan is a new plan: `order` values restart at 0.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.runs.clear();
        self.resolved.clear();
        self.scratch.clear();
        self.dirty = false;
    }

    /// Appends every visible cel under `layer` at `frame`, in structural order.
    ///
    /// Each call forms its own top-level span: cels added here never trade
    /// places with cels from another call. The frame is not bounds-checked.
    pub fn add_layer<T>(&mut self, tree: &'a T, layer: T::LayerId, frame: Frame)
    where
        T: LayerTree<Cel = C>,
    {
        let before = self.items.len();
        self.visit(tree, layer, frame);
        self.dirty = true;

        log::trace!(
            "render plan: +{} cel(s) at frame {}",
            self.items.len() - before,
            frame
        );
    }

    /// Appends several roots as one sibling span.
    ///
    /// Unlike repeated [`add_layer`](Self::add_layer) calls, z-indices may
    /// reorder cels across these roots, as if they were children of one group
    /// (e.g. all top-level layers of a document).
    pub fn add_layers<T, I>(&mut self, tree: &'a T, layers: I, frame: Frame)
    where
        T: LayerTree<Cel = C>,
        I: IntoIterator<Item = T::LayerId>,
    {
        let before = self.items.len();
        let mut units = Vec::new();
        for layer in layers {
            if let Some(unit) = self.visit(tree, layer, frame) {
                units.push(unit);
            }
        }
        self.push_run(units);
        self.dirty = true;

        log::trace!(
            "render plan: +{} cel(s) from multiple roots at frame {}",
            self.items.len() - before,
            frame
        );
    }

    /// Items in final draw order, back-to-front (index 0 is drawn first).
    ///
    /// Resolves z-indices if the plan changed since the last read.
    pub fn items(&mut self) -> &[Item<'a, C>] {
        if self.dirty {
            self.resolve();
        }
        &self.resolved
    }

    /// Iterates items in final draw order.
    pub fn iter(&mut self) -> impl Iterator<Item = &Item<'a, C>> {
        self.items().iter()
    }

    /// Items in insertion order, before any z-index is applied.
    #[inline]
    pub fn structural_items(&self) -> &[Item<'a, C>] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `false` while z-index resolution is pending.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !self.dirty
    }

    fn push_item(&mut self, cel: &'a C) -> usize {
        let index = self.items.len();
        self.items.push(Item::new(self.next_order, cel));
        self.next_order = self.next_order.wrapping_add(1);
        index
    }

    fn push_run(&mut self, units: Vec<Unit>) {
        // A single unit has nowhere to move.
        if units.len() > 1 {
            self.runs.push(Run { units });
        }
    }

    /// Walks `layer`, returning the unit it contributes to its parent's run.
    fn visit<T>(&mut self, tree: &'a T, layer: T::LayerId, frame: Frame) -> Option<Unit>
    where
        T: LayerTree<Cel = C>,
    {
        if !tree.is_visible(layer) {
            return None;
        }

        if !tree.is_group(layer) {
            let cel = tree.cel_at(layer, frame)?;
            return Some(Unit::Cel(self.push_item(cel)));
        }

        let start = self.items.len();
        let mut units = Vec::new();

        // A group's own content sits behind its children.
        if let Some(cel) = tree.cel_at(layer, frame) {
            units.push(Unit::Cel(self.push_item(cel)));
        }
        for child in tree.children(layer) {
            if let Some(unit) = self.visit(tree, child, frame) {
                units.push(unit);
            }
        }

        let end = self.items.len();
        if start == end {
            return None;
        }
        self.push_run(units);
        Some(Unit::Block(start..end))
    }

    fn resolve(&mut self) {
        self.resolved.clear();
        self.resolved.extend_from_slice(&self.items);

        let mut keys: Vec<RunKey> = Vec::new();
        let mut reordered = 0usize;

        for run in &self.runs {
            let len = run.units.len();
            keys.clear();
            keys.extend(run.units.iter().enumerate().map(|(position, unit)| {
                let z = match unit {
                    Unit::Cel(i) => self.items[*i].cel.z_index(),
                    Unit::Block(_) => ZIndex::NEUTRAL,
                };
                RunKey::new(position, len, z)
            }));

            if keys.iter().all(|k| k.z.is_neutral()) {
                continue;
            }

            keys.sort_unstable();
            if keys.iter().enumerate().all(|(i, k)| k.position == i) {
                continue;
            }

            // Inner runs were resolved in place already; copy their current
            // contents block by block.
            self.scratch.clear();
            for key in &keys {
                let span = run.units[key.position].span();
                self.scratch.extend_from_slice(&self.resolved[span]);
            }
            self.resolved[run.span()].copy_from_slice(&self.scratch);
            reordered += 1;

            log::trace!("render plan: reordered run {:?} ({} units)", run.span(), len);
        }

        self.dirty = false;

        log::debug!(
            "render plan: resolved {} item(s), {} of {} run(s) reordered",
            self.resolved.len(),
            reordered,
            self.runs.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::document::{Document, LayerId, LayerKind};

    const F0: Frame = Frame(0);

    fn names(plan: &mut RenderPlan<'_, crate::document::Cel>, doc: &Document) -> Vec<String> {
        plan.items()
            .iter()
            .map(|item| doc.layer(item.cel.layer()).unwrap().name().to_owned())
            .collect()
    }

    fn image(doc: &mut Document, parent: LayerId, name: &str) -> LayerId {
        let id = doc.add_layer(parent, name, LayerKind::Image).unwrap();
        doc.set_cel(id, F0, ZIndex::NEUTRAL).unwrap();
        id
    }

    /// Root with G1 = [A, B] and G2 = [C, D], every leaf with a cel at frame 0.
    fn two_groups() -> (Document, [LayerId; 6]) {
        let mut doc = Document::new(1);
        let root = doc.root();
        let g1 = doc.add_layer(root, "G1", LayerKind::Group).unwrap();
        let a = image(&mut doc, g1, "A");
        let b = image(&mut doc, g1, "B");
        let g2 = doc.add_layer(root, "G2", LayerKind::Group).unwrap();
        let c = image(&mut doc, g2, "C");
        let d = image(&mut doc, g2, "D");
        (doc, [g1, a, b, g2, c, d])
    }

    /// Root with one group holding [A, B, C].
    fn one_run() -> (Document, [LayerId; 4]) {
        let mut doc = Document::new(1);
        let root = doc.root();
        let g = doc.add_layer(root, "G", LayerKind::Group).unwrap();
        let a = image(&mut doc, g, "A");
        let b = image(&mut doc, g, "B");
        let c = image(&mut doc, g, "C");
        (doc, [g, a, b, c])
    }

    // ── structural order ──────────────────────────────────────────────────

    #[test]
    fn empty_plan_yields_nothing() {
        let mut plan: RenderPlan<'_, crate::document::Cel> = RenderPlan::new();
        assert!(plan.items().is_empty());
        assert!(plan.is_empty());
        assert!(plan.is_resolved());
    }

    #[test]
    fn groups_in_sibling_order() {
        let (doc, [g1, _, _, g2, _, _]) = two_groups();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "B", "C", "D"]);
    }

    #[test]
    fn root_walk_matches_per_group_walk() {
        let (doc, _) = two_groups();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), F0);
        assert_eq!(names(&mut plan, &doc), ["A", "B", "C", "D"]);
    }

    #[test]
    fn orders_are_dense_and_increasing() {
        let (doc, [g1, _, _, g2, _, _]) = two_groups();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        let orders: Vec<u32> = plan.structural_items().iter().map(|i| i.order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);
    }

    #[test]
    fn nested_group_interleaves_by_position() {
        // G = [A, S = [X, Y], B]
        let mut doc = Document::new(1);
        let g = doc.add_layer(doc.root(), "G", LayerKind::Group).unwrap();
        image(&mut doc, g, "A");
        let s = doc.add_layer(g, "S", LayerKind::Group).unwrap();
        image(&mut doc, s, "X");
        image(&mut doc, s, "Y");
        image(&mut doc, g, "B");

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), F0);
        assert_eq!(names(&mut plan, &doc), ["A", "X", "Y", "B"]);
    }

    #[test]
    fn single_image_layer_root() {
        let (doc, [_, a, ..]) = two_groups();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, a, F0);
        assert_eq!(names(&mut plan, &doc), ["A"]);
    }

    // ── exclusion ─────────────────────────────────────────────────────────

    #[test]
    fn invisible_layer_is_skipped() {
        let (mut doc, [g1, _, b, g2, _, _]) = two_groups();
        doc.set_visible(b, false).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "C", "D"]);
    }

    #[test]
    fn invisible_group_hides_subtree() {
        let (mut doc, [g1, _, _, g2, _, _]) = two_groups();
        doc.set_visible(g1, false).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        assert_eq!(names(&mut plan, &doc), ["C", "D"]);
    }

    #[test]
    fn missing_cel_is_skipped() {
        let (mut doc, [g1, a, _, g2, _, _]) = two_groups();
        doc.remove_cel(a, F0).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        assert_eq!(names(&mut plan, &doc), ["B", "C", "D"]);
    }

    #[test]
    fn only_cels_at_requested_frame() {
        let (mut doc, [g1, a, ..]) = two_groups();
        doc.set_frame_count(2);
        doc.set_cel(a, Frame(1), ZIndex::NEUTRAL).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, Frame(1));
        assert_eq!(names(&mut plan, &doc), ["A"]);
    }

    // ── z-index ───────────────────────────────────────────────────────────

    #[test]
    fn positive_z_index_is_clamped_to_run() {
        let (mut doc, [g, _, b, _]) = one_run();
        doc.set_z_index(b, F0, ZIndex(5)).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "C", "B"]);
    }

    #[test]
    fn negative_z_index_moves_back() {
        let (mut doc, [g, _, _, c]) = one_run();
        doc.set_z_index(c, F0, ZIndex(-1)).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "C", "B"]);

        doc.set_z_index(c, F0, ZIndex(-40)).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g, F0);
        assert_eq!(names(&mut plan, &doc), ["C", "A", "B"]);
    }

    #[test]
    fn one_step_swaps_neighbours() {
        let (mut doc, [g, a, _, _]) = one_run();
        doc.set_z_index(a, F0, ZIndex(1)).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g, F0);
        assert_eq!(names(&mut plan, &doc), ["B", "A", "C"]);
    }

    #[test]
    fn z_index_never_crosses_group_boundary() {
        let (mut doc, [g1, _, b, g2, _, _]) = two_groups();
        doc.set_z_index(b, F0, ZIndex(100)).unwrap();

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g1, F0);
        plan.add_layer(&doc, g2, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "B", "C", "D"]);

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), F0);
        assert_eq!(names(&mut plan, &doc), ["A", "B", "C", "D"]);
    }

    #[test]
    fn z_index_cannot_leave_nested_group() {
        // G = [A, S = [X, Y], B]; Y pushed back as far as possible.
        let mut doc = Document::new(1);
        let g = doc.add_layer(doc.root(), "G", LayerKind::Group).unwrap();
        image(&mut doc, g, "A");
        let s = doc.add_layer(g, "S", LayerKind::Group).unwrap();
        image(&mut doc, s, "X");
        let y = image(&mut doc, s, "Y");
        image(&mut doc, g, "B");
        doc.set_z_index(y, F0, ZIndex(-10)).unwrap();

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), F0);
        assert_eq!(names(&mut plan, &doc), ["A", "Y", "X", "B"]);
    }

    #[test]
    fn sibling_moves_past_nested_block() {
        // G = [A, S = [X, Y], B]; A moves over the whole S block, which keeps
        // its own resolved order.
        let mut doc = Document::new(1);
        let g = doc.add_layer(doc.root(), "G", LayerKind::Group).unwrap();
        let a = image(&mut doc, g, "A");
        let s = doc.add_layer(g, "S", LayerKind::Group).unwrap();
        let x = image(&mut doc, s, "X");
        image(&mut doc, s, "Y");
        image(&mut doc, g, "B");
        doc.set_z_index(a, F0, ZIndex(1)).unwrap();
        doc.set_z_index(x, F0, ZIndex(1)).unwrap();

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), F0);
        assert_eq!(names(&mut plan, &doc), ["Y", "X", "A", "B"]);
    }

    #[test]
    fn resolution_keeps_the_item_set() {
        let (mut doc, [g, a, b, c]) = one_run();
        doc.set_z_index(a, F0, ZIndex(2)).unwrap();
        doc.set_z_index(b, F0, ZIndex(-3)).unwrap();
        doc.set_z_index(c, F0, ZIndex(-1)).unwrap();
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, g, F0);

        let mut orders: Vec<u32> = plan.items().iter().map(|i| i.order).collect();
        orders.sort_unstable();
        assert_eq!(orders, [0, 1, 2]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn separate_calls_are_separate_spans() {
        // Top-level A and B added one by one: A's z-index has no siblings.
        let mut doc = Document::new(1);
        let root = doc.root();
        let a = image(&mut doc, root, "A");
        let b = image(&mut doc, root, "B");
        doc.set_z_index(a, F0, ZIndex(3)).unwrap();

        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, a, F0);
        plan.add_layer(&doc, b, F0);
        assert_eq!(names(&mut plan, &doc), ["A", "B"]);
    }

    #[test]
    fn add_layers_forms_one_span() {
        let mut doc = Document::new(1);
        let root = doc.root();
        let a = image(&mut doc, root, "A");
        let b = image(&mut doc, root, "B");
        doc.set_z_index(a, F0, ZIndex(3)).unwrap();

        let mut plan = RenderPlan::new();
        plan.add_layers(&doc, [a, b], F0);
        assert_eq!(names(&mut plan, &doc), ["B", "A"]);

        let mut plan = RenderPlan::new();
        plan.add_layers(&doc, doc.top_level_layers().iter().copied(), F0);
        assert_eq!(names(&mut plan, &doc), ["B", "A"]);
    }

    // ── memoization ───────────────────────────────────────────────────────

    /// Flat tree with interior-mutable z-indices; layer 0 is the root group.
    struct FlatTree {
        cels: Vec<TestCel>,
        group_cel: Option<TestCel>,
    }

    struct TestCel {
        name: &'static str,
        z: Cell<i32>,
    }

    impl TestCel {
        fn new(name: &'static str, z: i32) -> Self {
            Self { name, z: Cell::new(z) }
        }
    }

    impl ZIndexed for TestCel {
        fn z_index(&self) -> ZIndex {
            ZIndex(self.z.get())
        }
    }

    impl LayerTree for FlatTree {
        type LayerId = usize;
        type Cel = TestCel;

        fn is_visible(&self, _layer: usize) -> bool {
            true
        }

        fn is_group(&self, layer: usize) -> bool {
            layer == 0
        }

        fn children(&self, layer: usize) -> impl Iterator<Item = usize> + '_ {
            let count = if layer == 0 { self.cels.len() } else { 0 };
            1..count + 1
        }

        fn cel_at(&self, layer: usize, _frame: Frame) -> Option<&TestCel> {
            match layer {
                0 => self.group_cel.as_ref(),
                n => self.cels.get(n - 1),
            }
        }
    }

    fn flat(plan: &mut RenderPlan<'_, TestCel>) -> Vec<&'static str> {
        plan.items().iter().map(|i| i.cel.name).collect()
    }

    #[test]
    fn repeated_reads_are_memoized() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0), TestCel::new("C", 0)],
            group_cel: None,
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        assert!(!plan.is_resolved());

        let first: Vec<*const TestCel> = plan.items().iter().map(|i| i.cel as *const _).collect();
        assert!(plan.is_resolved());

        // Not observed until the plan is mutated again.
        tree.cels[0].z.set(5);
        let second: Vec<*const TestCel> = plan.items().iter().map(|i| i.cel as *const _).collect();
        assert_eq!(first, second);
        assert_eq!(flat(&mut plan), ["A", "B", "C"]);
    }

    #[test]
    fn adding_after_read_re_resolves() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0)],
            group_cel: None,
        };
        let other = FlatTree {
            cels: vec![TestCel::new("X", 0), TestCel::new("Y", -1)],
            group_cel: None,
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        assert_eq!(flat(&mut plan), ["A", "B"]);

        tree.cels[0].z.set(1);
        plan.add_layer(&other, 0, F0);
        assert!(!plan.is_resolved());
        assert_eq!(flat(&mut plan), ["B", "A", "Y", "X"]);
    }

    #[test]
    fn items_reference_tree_cels() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0)],
            group_cel: None,
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        let items = plan.items();
        assert!(items[0].is_cel(&tree.cels[0]));
        assert!(items[0].same_cel(&items[0]));
    }

    #[test]
    fn clear_resets_plan() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0)],
            group_cel: None,
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        assert_eq!(plan.items().len(), 2);

        plan.clear();
        assert!(plan.is_empty());
        assert!(plan.items().is_empty());

        plan.add_layer(&tree, 0, F0);
        assert_eq!(plan.structural_items()[0].order, 0);
    }

    #[test]
    fn order_counter_wraps_instead_of_panicking() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0)],
            group_cel: None,
        };
        let mut plan = RenderPlan::new();
        plan.next_order = u32::MAX;
        plan.add_layer(&tree, 0, F0);
        let orders: Vec<u32> = plan.structural_items().iter().map(|i| i.order).collect();
        assert_eq!(orders, [u32::MAX, 0]);
        assert_eq!(flat(&mut plan), ["A", "B"]);
    }

    // ── group-owned cels ──────────────────────────────────────────────────

    #[test]
    fn group_cel_precedes_children() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0)],
            group_cel: Some(TestCel::new("G", 0)),
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        assert_eq!(flat(&mut plan), ["G", "A", "B"]);
    }

    #[test]
    fn group_cel_reorders_among_children() {
        let tree = FlatTree {
            cels: vec![TestCel::new("A", 0), TestCel::new("B", 0)],
            group_cel: Some(TestCel::new("G", 1)),
        };
        let mut plan = RenderPlan::new();
        plan.add_layer(&tree, 0, F0);
        assert_eq!(flat(&mut plan), ["A", "G", "B"]);
    }
}
