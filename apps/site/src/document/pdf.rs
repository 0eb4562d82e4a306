//! Turns a laid-out document into PDF bytes with `printpdf`.
//!
//! Layout coordinates are top-down; PDF user space is bottom-up, so every `y` is
//! flipped against the page height here and nowhere else.

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};

use crate::document::ops::{DocumentLayout, DrawOp};
use crate::document::DocumentError;
use crate::layout::{FontFace, PageConfig};

const LAYER_NAME: &str = "Content";
const OUTLINE_THICKNESS_PT: f32 = 0.6;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Helvetica => &self.regular,
            FontFace::HelveticaBold => &self.bold,
        }
    }
}

/// CPU-bound; callers run it inside `tokio::task::spawn_blocking`.
pub fn write_pdf(
    layout: &DocumentLayout,
    logo: &DynamicImage,
    config: &PageConfig,
    title: &str,
) -> Result<Vec<u8>, DocumentError> {
    let width = Mm(config.width_mm);
    let height = Mm(config.height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
    };

    for (index, ops) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page).get_layer(layer)
        };
        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(OUTLINE_THICKNESS_PT);

        for op in ops {
            draw(&layer, op, logo, &fonts, config);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw(
    layer: &PdfLayerReference,
    op: &DrawOp,
    logo: &DynamicImage,
    fonts: &Fonts,
    config: &PageConfig,
) {
    let flip = |y: f32| Mm(config.height_mm - y);

    match op {
        DrawOp::Text {
            x,
            y,
            size_pt,
            face,
            text,
        } => {
            layer.use_text(text.as_str(), *size_pt, Mm(*x), flip(*y), fonts.get(*face));
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
        } => {
            let (left, right) = (Mm(*x), Mm(x + width));
            let (top, bottom) = (flip(*y), flip(y + height));
            layer.add_line(Line {
                points: vec![
                    (Point::new(left, top), false),
                    (Point::new(right, top), false),
                    (Point::new(right, bottom), false),
                    (Point::new(left, bottom), false),
                ],
                is_closed: true,
            });
        }
        DrawOp::Logo {
            x,
            y,
            width,
            height,
        } => {
            // Scale through the DPI so the image spans exactly `width` millimetres.
            let dpi = logo.dimensions().0 as f32 * 25.4 / width.max(1.0);
            Image::from_dynamic_image(logo).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(*x)),
                    translate_y: Some(flip(y + height)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }
    }
}

fn pdf_error(e: printpdf::Error) -> DocumentError {
    DocumentError::Pdf(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaSubmission;
    use crate::document::compose::layout_document;
    use crate::document::logo::{decode_logo, tests::sample_png};
    use crate::layout::default_page_config;
    use crate::locale::Locale;
    use chrono::NaiveDate;

    #[test]
    fn test_write_pdf_produces_pdf_bytes() {
        let config = default_page_config();
        let logo = decode_logo(&sample_png(), "memory://logo.png").unwrap();
        let layout = layout_document(
            &CriteriaSubmission::new(),
            Locale::Fr,
            logo.dims,
            &config,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        );

        let bytes = write_pdf(&layout, &logo.image, &config, "Critères").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }
}
