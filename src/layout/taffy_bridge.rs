//! Taffy Bridge - Natural content height of a subtree.
//!
//! Converts a document subtree into a Taffy tree, runs layout against the
//! viewport width, and reads back the root height. This is the headless
//! equivalent of `element.scrollHeight`: the height the content needs,
//! regardless of any `max-height` clamp on the element itself.
//!
//! Honoured inline properties (px only): `height`, `padding-top`,
//! `padding-bottom`, `margin-top`, `margin-bottom`. Text content is measured
//! with the fixed glyph grid from [`text_measure`](super::text_measure).

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, LengthPercentageAuto,
    NodeId as TaffyNodeId, Rect, Size, Style, TaffyResult, TaffyTree,
};

use crate::engine::Document;
use crate::types::NodeId;

use super::text_measure::{measure_text_height, measure_text_width, string_width, GLYPH_WIDTH};

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn px(doc: &Document, node: NodeId, property: &str) -> f32 {
    doc.style_px(node, property).unwrap_or(0.0).max(0.0)
}

/// Block-flow approximation: every element is a column flex container.
fn build_style(doc: &Document, node: NodeId, is_root: bool) -> Style {
    let mut style = Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        flex_shrink: 0.0,
        padding: Rect {
            top: LengthPercentage::Length(px(doc, node, "padding-top")),
            right: LengthPercentage::Length(0.0),
            bottom: LengthPercentage::Length(px(doc, node, "padding-bottom")),
            left: LengthPercentage::Length(0.0),
        },
        margin: Rect {
            top: LengthPercentageAuto::Length(px(doc, node, "margin-top")),
            right: LengthPercentageAuto::Length(0.0),
            bottom: LengthPercentageAuto::Length(px(doc, node, "margin-bottom")),
            left: LengthPercentageAuto::Length(0.0),
        },
        ..Default::default()
    };

    // The measured root spans the viewport and is sized by its content,
    // never by its own box
    if is_root {
        style.size.width = Dimension::Length(doc.viewport().0);
    } else if let Some(height) = doc.style_px(node, "height") {
        style.size.height = Dimension::Length(height.max(0.0));
    }

    style
}

/// Hidden by its own markup (ancestors are handled by the walk).
fn is_hidden(doc: &Document, node: NodeId) -> bool {
    doc.style(node, "display") == "none" || doc.has_attribute(node, "hidden")
}

fn build_node(
    doc: &Document,
    tree: &mut TaffyTree<String>,
    node: NodeId,
    is_root: bool,
) -> TaffyResult<TaffyNodeId> {
    let mut children = Vec::new();

    // Own text flows before element children
    let text = doc.text(node);
    if !text.trim().is_empty() {
        children.push(tree.new_leaf_with_context(Style::default(), text.to_string())?);
    }

    for &child in doc.children(node) {
        if is_hidden(doc, child) {
            continue;
        }
        children.push(build_node(doc, tree, child, false)?);
    }

    tree.new_with_children(build_style(doc, node, is_root), &children)
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn measure_text(
    text: &str,
    known_dimensions: Size<Option<f32>>,
    available_space: Size<AvailableSpace>,
) -> Size<f32> {
    let natural_width = measure_text_width(text);
    let width = known_dimensions.width.unwrap_or(match available_space.width {
        AvailableSpace::Definite(w) => w.min(natural_width),
        AvailableSpace::MinContent => text
            .split_whitespace()
            .map(string_width)
            .max()
            .unwrap_or(0) as f32
            * GLYPH_WIDTH,
        AvailableSpace::MaxContent => natural_width,
    });

    Size {
        width,
        height: known_dimensions
            .height
            .unwrap_or_else(|| measure_text_height(text, width)),
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Natural content height of `node` in whole pixels, laid out against the
/// current viewport width. Missing or detached nodes measure 0.
pub fn natural_height(doc: &Document, node: NodeId) -> f32 {
    if !doc.exists(node) {
        return 0.0;
    }
    match compute_height(doc, node) {
        Ok(height) => height.round(),
        Err(err) => {
            tracing::warn!(error = %err, "content measurement failed");
            0.0
        }
    }
}

fn compute_height(doc: &Document, node: NodeId) -> TaffyResult<f32> {
    let mut tree: TaffyTree<String> = TaffyTree::new();
    let root = build_node(doc, &mut tree, node, true)?;

    let (viewport_width, _) = doc.viewport();
    let available = Size {
        width: AvailableSpace::Definite(viewport_width),
        height: AvailableSpace::MaxContent,
    };

    let mut measure_fn = |known_dimensions: Size<Option<f32>>,
                          available_space: Size<AvailableSpace>,
                          _node_id: TaffyNodeId,
                          context: Option<&mut String>,
                          _style: &Style| {
        match context {
            Some(text) => measure_text(text, known_dimensions, available_space),
            None => Size::ZERO,
        }
    };

    tree.compute_layout_with_measure(root, available, &mut measure_fn)?;
    Ok(tree.layout(root)?.size.height)
}
