//! Layer documents and render-order planning.
//!
//! Given a layer tree and a frame, a [`RenderPlan`] produces the cels a
//! compositor must draw, back-to-front. Order follows the layer structure and
//! may be perturbed locally by per-cel z-indices, which never move a cel out
//! of its own sibling group.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`plan`] | `RenderPlan`, `Item` |
//! | [`tree`] | `LayerTree`, `ZIndexed`: what the planner reads |
//! | [`document`] | `Document`, an in-memory `LayerTree` |
//! | [`logging`] | `init_logging`, `LoggingConfig` |
//!
//! # Quick start
//!
//! ```rust
//! use strata_doc::{Document, Frame, LayerKind, RenderPlan, ZIndex};
//!
//! let mut doc = Document::new(1);
//! let root = doc.root();
//! let back = doc.add_layer(root, "back", LayerKind::Image).unwrap();
//! let front = doc.add_layer(root, "front", LayerKind::Image).unwrap();
//! doc.set_cel(back, Frame(0), ZIndex(1)).unwrap();
//! doc.set_cel(front, Frame(0), ZIndex(0)).unwrap();
//!
//! let mut plan = RenderPlan::new();
//! plan.add_layer(&doc, root, Frame(0));
//! let order: Vec<_> = plan.items().iter().map(|item| item.cel.layer()).collect();
//! assert_eq!(order, [front, back]);
//! ```

pub mod document;
pub mod frame;
pub mod logging;
pub mod plan;
pub mod tree;
pub mod z_index;

pub use document::{Cel, Document, DocumentError, Layer, LayerId, LayerKind};
pub use frame::Frame;
pub use plan::{Item, RenderPlan};
pub use tree::{LayerTree, ZIndexed};
pub use z_index::ZIndex;
