//! In-memory layer document.
//!
//! An arena of layers rooted at an always-visible group, with per-frame cels.
//! [`Document`] implements [`LayerTree`], so it can be handed straight to a
//! [`RenderPlan`](crate::plan::RenderPlan).

mod cel;
mod error;
mod layer;

pub use cel::Cel;
pub use error::{DocumentError, Result};
pub use layer::{Layer, LayerId, LayerKind};

use crate::frame::Frame;
use crate::tree::LayerTree;
use crate::z_index::ZIndex;

const ROOT: LayerId = LayerId(0);

#[derive(Debug, Clone)]
pub struct Document {
    layers: Vec<Layer>,
    frame_count: u32,
}

impl Document {
    /// Creates a document with an empty root group and `frame_count` frames.
    pub fn new(frame_count: u32) -> Self {
        Self {
            layers: vec![Layer::new("root", LayerKind::Group, None)],
            frame_count,
        }
    }

    #[inline]
    pub fn root(&self) -> LayerId {
        ROOT
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Resizes the timeline. Cels past the new end are dropped.
    pub fn set_frame_count(&mut self, frame_count: u32) {
        if frame_count < self.frame_count {
            let end = Frame(frame_count);
            for layer in &mut self.layers {
                layer.cels.retain(|frame, _| *frame < end);
            }
        }
        self.frame_count = frame_count;
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + use<> {
        (0..self.frame_count).map(Frame)
    }

    /// Direct children of the root group, back-to-front.
    #[inline]
    pub fn top_level_layers(&self) -> &[LayerId] {
        &self.layers[ROOT.index()].children
    }

    #[inline]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.index())
    }

    /// First layer with the given name, in creation order.
    pub fn find_layer(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .position(|layer| layer.name == name)
            .map(|i| LayerId(i as u32))
    }

    /// Appends a new layer on top of `parent`'s children.
    pub fn add_layer(
        &mut self,
        parent: LayerId,
        name: impl Into<String>,
        kind: LayerKind,
    ) -> Result<LayerId> {
        if !self.get(parent)?.kind.is_group() {
            return Err(DocumentError::NotAGroup(parent));
        }

        let id = LayerId(self.layers.len() as u32);
        self.layers.push(Layer::new(name, kind, Some(parent)));
        self.layers[parent.index()].children.push(id);

        log::trace!("document: added {kind:?} layer {id} under {parent}");
        Ok(id)
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<()> {
        if id == ROOT {
            return Err(DocumentError::RootLayer);
        }
        self.get_mut(id)?.visible = visible;
        Ok(())
    }

    /// Creates or replaces the cel of `layer` at `frame`.
    pub fn set_cel(&mut self, layer: LayerId, frame: Frame, z_index: ZIndex) -> Result<()> {
        self.check_frame(frame)?;
        let data = self.get_mut(layer)?;
        if data.kind.is_group() {
            return Err(DocumentError::GroupHasNoCels(layer));
        }
        data.cels.insert(frame, Cel::new(layer, frame, z_index));
        Ok(())
    }

    /// Changes the z-index of an existing cel.
    pub fn set_z_index(&mut self, layer: LayerId, frame: Frame, z_index: ZIndex) -> Result<()> {
        self.check_frame(frame)?;
        let cel = self
            .get_mut(layer)?
            .cels
            .get_mut(&frame)
            .ok_or(DocumentError::NoCel { layer, frame })?;
        cel.set_z_index(z_index);
        Ok(())
    }

    /// Removes the cel of `layer` at `frame`, returning it if there was one.
    pub fn remove_cel(&mut self, layer: LayerId, frame: Frame) -> Result<Option<Cel>> {
        self.check_frame(frame)?;
        Ok(self.get_mut(layer)?.cels.remove(&frame))
    }

    /// Cel of `layer` at `frame`, if both exist.
    pub fn cel(&self, layer: LayerId, frame: Frame) -> Option<&Cel> {
        self.layer(layer)?.cel(frame)
    }

    fn get(&self, id: LayerId) -> Result<&Layer> {
        self.layers.get(id.index()).ok_or(DocumentError::UnknownLayer(id))
    }

    fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers
            .get_mut(id.index())
            .ok_or(DocumentError::UnknownLayer(id))
    }

    fn check_frame(&self, frame: Frame) -> Result<()> {
        if frame.index() >= self.frame_count {
            return Err(DocumentError::FrameOutOfRange {
                frame,
                frame_count: self.frame_count,
            });
        }
        Ok(())
    }
}

impl LayerTree for Document {
    type LayerId = LayerId;
    type Cel = Cel;

    fn is_visible(&self, layer: LayerId) -> bool {
        self.layer(layer).is_some_and(Layer::is_visible)
    }

    fn is_group(&self, layer: LayerId) -> bool {
        self.layer(layer).is_some_and(|l| l.kind.is_group())
    }

    fn children(&self, layer: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        self.layer(layer)
            .map(|l| l.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }

    fn cel_at(&self, layer: LayerId, frame: Frame) -> Option<&Cel> {
        self.cel(layer, frame)
    }
}
