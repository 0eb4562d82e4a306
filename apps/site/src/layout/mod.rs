//! Page geometry for the criteria document: glyph metrics, page configuration, and the
//! flow cursor. Nothing here knows about PDF; the document module turns the layout into
//! drawing operations.

pub mod cursor;
pub mod font_metrics;
pub mod page;

pub use cursor::{column_max, Cursor};
pub use font_metrics::{get_metrics, FontFace, FontMetricTable};
pub use page::{default_page_config, PageConfig};
