use serde::Serialize;

use crate::layout::FontFace;

/// A backend-independent drawing operation. Coordinates are millimetres from the
/// top-left corner; for text, `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size_pt: f32,
        face: FontFace,
        text: String,
    },
    /// Outlined rectangle (checkbox squares).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// The organisation logo, scaled into the given box.
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Every page of the document, in order, as a list of drawing operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentLayout {
    pub pages: Vec<Vec<DrawOp>>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All drawn strings across all pages, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flatten()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }
}
