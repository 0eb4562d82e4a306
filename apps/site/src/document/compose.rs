//! Lays the submission record out into drawing operations.
//!
//! Purely additive vertical flow: every block takes the cursor and returns it below
//! what it drew. Contacts are laid out two per row; a row ends at the taller of its two
//! columns. When a block does not fit above the bottom margin, a new page starts.

use chrono::NaiveDate;

use crate::criteria::model::{Contact, CriteriaOption, CriteriaSubmission};
use crate::document::labels::{labels_for, DocumentLabels};
use crate::document::ops::{DocumentLayout, DrawOp};
use crate::layout::{column_max, get_metrics, Cursor, FontFace, PageConfig};
use crate::locale::Locale;

/// Printed in place of any empty text field.
pub const PLACEHOLDER: &str = "..............................";

/// Marks a selected checkbox.
pub const CHECK_MARK: &str = "x";

const LABEL_GAP_MM: f32 = 2.0;
const OPTION_GAP_MM: f32 = 6.0;
const BOX_LABEL_GAP_MM: f32 = 1.5;

/// Pixel size of the decoded logo, used to keep its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoDims {
    pub width_px: u32,
    pub height_px: u32,
}

impl LogoDims {
    pub fn height_for(&self, width_mm: f32) -> f32 {
        if self.width_px == 0 {
            return 0.0;
        }
        width_mm * self.height_px as f32 / self.width_px as f32
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn layout_document(
    record: &CriteriaSubmission,
    locale: Locale,
    logo: LogoDims,
    config: &PageConfig,
    generated_on: NaiveDate,
) -> DocumentLayout {
    let labels = labels_for(locale);
    let mut composer = Composer::new(config);

    let cursor = composer.top();
    let cursor = composer.header(cursor, logo, labels.title);

    // 1. Identity
    let cursor = composer.heading(cursor, labels.identity_heading);
    let width = config.content_width();
    let cursor = composer.field_block(cursor, labels.company, &record.company_name, width);
    let cursor = composer.field_block(cursor, labels.address, &record.address, width);
    let mut cursor = cursor.advance(config.section_gap_mm / 2.0);
    for (row, pair) in record.contacts.chunks(2).enumerate() {
        cursor = composer.contact_row(cursor, row * 2, pair, labels);
    }

    // 2. Strategy
    let cursor = composer.heading(cursor, labels.strategy_heading);
    let cursor = composer.checkbox_group(
        cursor,
        labels.volume,
        &options_of(record.investment_volume.iter().copied(), locale),
    );
    let cursor = composer.checkbox_group(
        cursor,
        labels.location,
        &options_of(record.location.iter().copied(), locale),
    );

    // 3. Target
    let cursor = composer.heading(cursor, labels.target_heading);
    let cursor = composer.checkbox_group(
        cursor,
        labels.object_type,
        &options_of(record.object_type.iter().copied(), locale),
    );
    let cursor = composer.checkbox_group(
        cursor,
        labels.assignment,
        &options_of(record.assignment.iter().copied(), locale),
    );

    // 4. Modalities
    let cursor = composer.heading(cursor, labels.modalities_heading);
    let cursor = composer.checkbox_group(
        cursor,
        labels.property_form,
        &options_of(record.property_form.iter().copied(), locale),
    );
    let cursor = composer.checkbox_group(
        cursor,
        labels.transaction_nature,
        &options_of(record.transaction_nature.iter().copied(), locale),
    );
    composer.paragraph(cursor, labels.remarks, &record.remarks);

    composer.finish(labels, generated_on)
}

/// Every option of the catalogue, in catalogue order, with its selection state.
fn options_of<T: CriteriaOption>(
    selected: impl Iterator<Item = T>,
    locale: Locale,
) -> Vec<(&'static str, bool)> {
    let selected: Vec<T> = selected.collect();
    T::ALL
        .iter()
        .map(|option| (option.label(locale), selected.contains(option)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Composer
// ────────────────────────────────────────────────────────────────────────────

struct Composer<'a> {
    config: &'a PageConfig,
    pages: Vec<Vec<DrawOp>>,
    current: Vec<DrawOp>,
}

impl<'a> Composer<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn top(&self) -> Cursor {
        Cursor::new(self.config.margin_left_mm, self.config.margin_top_mm)
    }

    /// Returns `cursor` unchanged if `height` fits above the bottom margin, otherwise
    /// starts a new page and returns the top of it.
    fn ensure_space(&mut self, cursor: Cursor, height: f32) -> Cursor {
        if cursor.y + height <= self.config.bottom_limit() {
            return cursor;
        }
        self.pages.push(std::mem::take(&mut self.current));
        self.top().at_x(cursor.x)
    }

    /// Baseline for text on the line starting at `y`.
    fn baseline(&self, y: f32) -> f32 {
        y + self.config.line_height_mm - 1.5
    }

    fn text(&mut self, x: f32, y: f32, size_pt: f32, face: FontFace, text: impl Into<String>) {
        self.current.push(DrawOp::Text {
            x,
            y,
            size_pt,
            face,
            text: text.into(),
        });
    }

    fn centered_text(&mut self, y: f32, size_pt: f32, face: FontFace, text: &str) {
        let width = get_metrics(face).width_mm(text, size_pt);
        let x = (self.config.width_mm - width) / 2.0;
        self.text(x, y, size_pt, face, text);
    }

    // ── blocks ──────────────────────────────────────────────────────────────

    fn header(&mut self, cursor: Cursor, logo: LogoDims, title: &str) -> Cursor {
        let width = self.config.logo_width_mm;
        let height = logo.height_for(width);
        self.current.push(DrawOp::Logo {
            x: (self.config.width_mm - width) / 2.0,
            y: cursor.y,
            width,
            height,
        });
        let cursor = cursor.advance(height + self.config.section_gap_mm);

        let size = self.config.title_size_pt;
        let baseline = cursor.y + size * crate::layout::font_metrics::MM_PER_PT;
        self.centered_text(baseline, size, FontFace::HelveticaBold, title);
        cursor.advance(self.config.line_height_mm * 2.0)
    }

    fn heading(&mut self, cursor: Cursor, text: &str) -> Cursor {
        // Keep a heading together with at least one line of its section.
        let cursor = self.ensure_space(cursor, self.config.line_height_mm * 3.0);
        let cursor = cursor.advance(self.config.section_gap_mm);
        let baseline = self.baseline(cursor.y);
        self.text(
            cursor.x,
            baseline,
            self.config.heading_size_pt,
            FontFace::HelveticaBold,
            text,
        );
        cursor.advance(self.config.line_height_mm + 1.0)
    }

    /// Value lines of a label + value field laid out in `width`.
    fn field_lines(&self, label: &str, value: &str, width: f32) -> Vec<String> {
        let size = self.config.body_size_pt;
        let label_w = get_metrics(FontFace::HelveticaBold).width_mm(label, size);
        let available = (width - label_w - LABEL_GAP_MM).max(1.0);
        let lines = get_metrics(FontFace::Helvetica).wrap_lines(value, available, size);
        if lines.is_empty() {
            vec![PLACEHOLDER.to_string()]
        } else {
            lines
        }
    }

    fn field_height(&self, label: &str, value: &str, width: f32) -> f32 {
        self.field_lines(label, value, width).len() as f32 * self.config.line_height_mm
    }

    /// Draws a label + value field without page checks; callers reserve the space.
    fn field(&mut self, cursor: Cursor, label: &str, value: &str, width: f32) -> Cursor {
        let size = self.config.body_size_pt;
        let label_w = get_metrics(FontFace::HelveticaBold).width_mm(label, size);
        let value_x = cursor.x + label_w + LABEL_GAP_MM;
        let baseline = self.baseline(cursor.y);

        self.text(cursor.x, baseline, size, FontFace::HelveticaBold, label);
        let lines = self.field_lines(label, value, width);
        let line_count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            let y = baseline + i as f32 * self.config.line_height_mm;
            self.text(value_x, y, size, FontFace::Helvetica, line);
        }
        cursor.advance(line_count as f32 * self.config.line_height_mm)
    }

    fn field_block(&mut self, cursor: Cursor, label: &str, value: &str, width: f32) -> Cursor {
        let height = self.field_height(label, value, width);
        let cursor = self.ensure_space(cursor, height);
        self.field(cursor, label, value, width)
    }

    fn contact_fields<'c>(
        labels: &DocumentLabels,
        contact: &'c Contact,
    ) -> [(&'static str, &'c str); 5] {
        [
            (labels.name, contact.name.as_str()),
            (labels.position, contact.position.as_str()),
            (labels.email, contact.email.as_str()),
            (labels.mobile, contact.mobile.as_str()),
            (labels.direct_line, contact.direct_line.as_str()),
        ]
    }

    fn contact_height(&self, labels: &DocumentLabels, contact: &Contact, width: f32) -> f32 {
        let fields: f32 = Self::contact_fields(labels, contact)
            .iter()
            .map(|(label, value)| self.field_height(label, value, width))
            .sum();
        self.config.line_height_mm + fields
    }

    /// One contact column: a bold title then its five fields.
    fn contact(
        &mut self,
        cursor: Cursor,
        number: usize,
        contact: &Contact,
        labels: &DocumentLabels,
        width: f32,
    ) -> Cursor {
        let baseline = self.baseline(cursor.y);
        self.text(
            cursor.x,
            baseline,
            self.config.body_size_pt,
            FontFace::HelveticaBold,
            format!("{} {number}", labels.contact),
        );
        let mut cursor = cursor.advance(self.config.line_height_mm);
        for (label, value) in Self::contact_fields(labels, contact) {
            cursor = self.field(cursor, label, value, width);
        }
        cursor
    }

    /// Up to two contacts side by side. `first_index` is the 0-based index of the
    /// left contact in the record.
    fn contact_row(
        &mut self,
        cursor: Cursor,
        first_index: usize,
        pair: &[Contact],
        labels: &DocumentLabels,
    ) -> Cursor {
        let width = self.config.column_width();
        let height = pair
            .iter()
            .map(|c| self.contact_height(labels, c, width))
            .fold(0.0_f32, f32::max);
        let start = self.ensure_space(cursor, height);

        let mut end = start;
        for (offset, contact) in pair.iter().enumerate() {
            let column_x = if offset == 0 {
                self.config.margin_left_mm
            } else {
                self.config.right_column_x()
            };
            let column_end = self.contact(
                start.at_x(column_x),
                first_index + offset + 1,
                contact,
                labels,
                width,
            );
            end = column_max(end, column_end);
        }
        end.advance(self.config.section_gap_mm / 2.0)
    }

    /// A bold group label followed by checkbox options flowing left to right.
    fn checkbox_group(
        &mut self,
        cursor: Cursor,
        label: &str,
        options: &[(&str, bool)],
    ) -> Cursor {
        let line = self.config.line_height_mm;
        let size = self.config.body_size_pt;
        let box_size = self.config.checkbox_size_mm;
        let left = self.config.margin_left_mm;
        let right = self.config.width_mm - self.config.margin_right_mm;
        let regular = get_metrics(FontFace::Helvetica);

        let cursor = self.ensure_space(cursor, line * 2.0);
        let baseline = self.baseline(cursor.y);
        self.text(cursor.x, baseline, size, FontFace::HelveticaBold, label);
        let mut row = cursor.advance(line);
        let mut x = left;

        for (i, (option, selected)) in options.iter().enumerate() {
            let item_width = box_size + BOX_LABEL_GAP_MM + regular.width_mm(option, size);
            if i > 0 && x + item_width > right {
                row = self.ensure_space(row.advance(line), line);
                x = left;
            } else if i == 0 {
                row = self.ensure_space(row, line);
            }

            let box_top = row.y + (line - box_size) / 2.0;
            self.current.push(DrawOp::Rect {
                x,
                y: box_top,
                width: box_size,
                height: box_size,
            });
            if *selected {
                let mark_w = regular.width_mm(CHECK_MARK, size);
                self.text(
                    x + (box_size - mark_w) / 2.0,
                    box_top + box_size - 0.7,
                    size,
                    FontFace::Helvetica,
                    CHECK_MARK,
                );
            }
            self.text(
                x + box_size + BOX_LABEL_GAP_MM,
                box_top + box_size - 0.3,
                size,
                FontFace::Helvetica,
                *option,
            );
            x += item_width + OPTION_GAP_MM;
        }

        row.at_x(left).advance(line + 1.0)
    }

    /// A label on its own line followed by wrapped free text, breaking pages per line.
    fn paragraph(&mut self, cursor: Cursor, label: &str, text: &str) -> Cursor {
        let line = self.config.line_height_mm;
        let size = self.config.body_size_pt;

        let cursor = self.ensure_space(cursor, line * 2.0);
        let baseline = self.baseline(cursor.y);
        self.text(cursor.x, baseline, size, FontFace::HelveticaBold, label);
        let mut cursor = cursor.advance(line);

        let mut lines = get_metrics(FontFace::Helvetica).wrap_lines(
            text,
            self.config.content_width(),
            size,
        );
        if lines.is_empty() {
            lines.push(PLACEHOLDER.to_string());
        }
        for text_line in lines {
            cursor = self.ensure_space(cursor, line);
            let baseline = self.baseline(cursor.y);
            self.text(cursor.x, baseline, size, FontFace::Helvetica, text_line);
            cursor = cursor.advance(line);
        }
        cursor
    }

    /// Closes the last page and stamps the footer on every page.
    fn finish(mut self, labels: &DocumentLabels, generated_on: NaiveDate) -> DocumentLayout {
        self.pages.push(std::mem::take(&mut self.current));
        let total = self.pages.len();
        let date = generated_on.format("%d.%m.%Y").to_string();
        let size = self.config.footer_size_pt;
        let y = self.config.footer_y();
        let width = self.config.width_mm;

        for (i, page) in self.pages.iter_mut().enumerate() {
            let footer = format!(
                "{} · {} {} · {}/{}",
                labels.footer_firm,
                labels.generated_on,
                date,
                i + 1,
                total
            );
            let footer_w = get_metrics(FontFace::Helvetica).width_mm(&footer, size);
            page.push(DrawOp::Text {
                x: (width - footer_w) / 2.0,
                y,
                size_pt: size,
                face: FontFace::Helvetica,
                text: footer,
            });
        }

        DocumentLayout { pages: self.pages }
    }
}
