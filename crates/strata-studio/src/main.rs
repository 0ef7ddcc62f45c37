mod config;

use anyhow::{bail, Context, Result};
use clap::Parser;
use strata_doc::logging::init_logging;
use strata_doc::{Document, Frame, LayerKind, RenderPlan, ZIndex};

use config::StudioConfig;

fn main() -> Result<()> {
    let config = StudioConfig::parse();
    init_logging(config.logging());

    let doc = demo_document().context("building demo document")?;

    let frames: Vec<Frame> = match config.frame() {
        Some(frame) if frame.index() >= doc.frame_count() => {
            bail!("frame {frame} out of range (demo has {} frames)", doc.frame_count())
        }
        Some(frame) => vec![frame],
        None => doc.frames().collect(),
    };

    println!();
    println!("  strata render plan · {} layer(s)", doc.top_level_layers().len());
    println!();

    for frame in frames {
        let mut plan = RenderPlan::new();
        plan.add_layer(&doc, doc.root(), frame);

        println!("  frame {frame}");
        if plan.is_empty() {
            println!("    (nothing to draw)");
        }
        for (slot, item) in plan.items().iter().enumerate() {
            let layer = doc
                .layer(item.cel.layer())
                .context("plan references a layer outside the document")?;
            println!(
                "    {slot:>2}  {:<12} z {:<4} (structural #{})",
                layer.name(),
                item.cel.z_index(),
                item.order
            );
        }
        println!();
    }

    Ok(())
}

/// A small character rig over three frames:
///
/// ```text
/// root
/// ├── background
/// ├── body (group)
/// │   ├── arm_back
/// │   ├── torso
/// │   └── arm_front
/// ├── fx (group, hidden)
/// │   └── sparks
/// └── foreground
/// ```
///
/// On frame 1 the back arm swings in front of the torso; on frame 2 it tries
/// to jump over the foreground but stays inside `body`.
fn demo_document() -> Result<Document> {
    let mut doc = Document::new(3);
    let root = doc.root();

    let background = doc.add_layer(root, "background", LayerKind::Image)?;
    let body = doc.add_layer(root, "body", LayerKind::Group)?;
    let arm_back = doc.add_layer(body, "arm_back", LayerKind::Image)?;
    let torso = doc.add_layer(body, "torso", LayerKind::Image)?;
    let arm_front = doc.add_layer(body, "arm_front", LayerKind::Image)?;
    let fx = doc.add_layer(root, "fx", LayerKind::Group)?;
    let sparks = doc.add_layer(fx, "sparks", LayerKind::Tilemap)?;
    let foreground = doc.add_layer(root, "foreground", LayerKind::Image)?;

    doc.set_visible(fx, false)?;

    for frame in doc.frames() {
        for layer in [background, arm_back, torso, arm_front, sparks] {
            doc.set_cel(layer, frame, ZIndex::NEUTRAL)?;
        }
    }
    doc.set_cel(foreground, Frame(0), ZIndex::NEUTRAL)?;
    doc.set_cel(foreground, Frame(2), ZIndex::NEUTRAL)?;

    doc.set_z_index(arm_back, Frame(1), ZIndex(1))?;
    doc.set_z_index(arm_back, Frame(2), ZIndex(10))?;

    log::debug!("demo document: {} frames", doc.frame_count());
    Ok(doc)
}
