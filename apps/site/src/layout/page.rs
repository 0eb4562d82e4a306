use serde::{Deserialize, Serialize};

/// Geometry and type sizes of the criteria document. All lengths in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub margin_top_mm: f32,
    /// Content never flows below `height_mm - margin_bottom_mm`.
    pub margin_bottom_mm: f32,
    /// Baseline of the footer, measured up from the bottom edge.
    pub footer_offset_mm: f32,
    pub logo_width_mm: f32,
    pub title_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    pub footer_size_pt: f32,
    pub line_height_mm: f32,
    pub section_gap_mm: f32,
    pub column_gap_mm: f32,
    pub checkbox_size_mm: f32,
}

/// A4 portrait with 20 mm side margins.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_left_mm: 20.0,
        margin_right_mm: 20.0,
        margin_top_mm: 15.0,
        margin_bottom_mm: 22.0,
        footer_offset_mm: 10.0,
        logo_width_mm: 45.0,
        title_size_pt: 14.0,
        heading_size_pt: 11.0,
        body_size_pt: 9.0,
        footer_size_pt: 7.0,
        line_height_mm: 5.5,
        section_gap_mm: 4.0,
        column_gap_mm: 10.0,
        checkbox_size_mm: 3.0,
    }
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }

    /// Width of one of two side-by-side columns.
    pub fn column_width(&self) -> f32 {
        (self.content_width() - self.column_gap_mm) / 2.0
    }

    pub fn right_column_x(&self) -> f32 {
        self.margin_left_mm + self.column_width() + self.column_gap_mm
    }

    pub fn bottom_limit(&self) -> f32 {
        self.height_mm - self.margin_bottom_mm
    }

    /// Footer baseline, from the top of the page.
    pub fn footer_y(&self) -> f32 {
        self.height_mm - self.footer_offset_mm
    }
}
