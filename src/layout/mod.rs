//! Layout Module - Content measurement using Taffy.
//!
//! The accordion animates panels through `max-height`, so it needs to know
//! how tall a panel's content is when unclamped. The layout module answers
//! that one question.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Converts a document subtree → Taffy column-flex nodes
//! 2. Provides a measure function for text intrinsic sizing
//! 3. Lays out against the viewport width
//! 4. Returns the root height
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::layout::natural_height;
//!
//! let height = natural_height(&doc, panel);
//! doc.set_style(panel, "max-height", &format!("{height}px"));
//! ```

mod taffy_bridge;
mod text_measure;

pub use taffy_bridge::natural_height;
pub use text_measure::*;
