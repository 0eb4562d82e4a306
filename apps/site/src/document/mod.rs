//! Criteria document rendering.
//!
//! # Pipeline
//! 1. `LogoSource::load` fetches the header logo (async; failure aborts rendering).
//! 2. `compose::layout_document` lays the record out as drawing operations.
//! 3. `pdf::write_pdf` assembles the PDF inside `spawn_blocking`.

pub mod compose;
pub mod labels;
pub mod logo;
pub mod ops;
pub mod pdf;

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::criteria::CriteriaSubmission;
use crate::layout::PageConfig;
use crate::locale::Locale;

pub use compose::{layout_document, LogoDims, CHECK_MARK, PLACEHOLDER};
pub use logo::{logo_source_for, FileLogoSource, HttpLogoSource, LogoSource, StaticLogoSource};
pub use ops::{DocumentLayout, DrawOp};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to load logo from {url}: {reason}")]
    LogoLoad { url: String, reason: String },

    #[error("logo at {url} is not a readable image: {reason}")]
    LogoDecode { url: String, reason: String },

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// Renders submission records into PDF documents.
#[derive(Clone)]
pub struct DocumentRenderer {
    logo: Arc<dyn LogoSource>,
    page: PageConfig,
}

impl DocumentRenderer {
    pub fn new(logo: Arc<dyn LogoSource>, page: PageConfig) -> Self {
        Self { logo, page }
    }

    pub fn logo_location(&self) -> &str {
        self.logo.location()
    }

    /// Renders `record`, dated today.
    pub async fn render(
        &self,
        record: &CriteriaSubmission,
        locale: Locale,
    ) -> Result<Bytes, DocumentError> {
        self.render_on(record, locale, Local::now().date_naive())
            .await
    }

    pub async fn render_on(
        &self,
        record: &CriteriaSubmission,
        locale: Locale,
        generated_on: NaiveDate,
    ) -> Result<Bytes, DocumentError> {
        let raw = self.logo.load().await.map_err(|e| {
            warn!(logo = self.logo.location(), error = %e, "logo unavailable, aborting document");
            e
        })?;
        let logo = logo::decode_logo(&raw, self.logo.location())?;

        let layout = layout_document(record, locale, logo.dims, &self.page, generated_on);
        let page_count = layout.page_count();

        let page = self.page.clone();
        let title = labels::labels_for(locale).title;
        let pdf = tokio::task::spawn_blocking(move || {
            pdf::write_pdf(&layout, &logo.image, &page, title)
        })
        .await
        .map_err(|e| DocumentError::Pdf(format!("spawn_blocking failed in PDF assembly: {e}")))??;

        info!(pages = page_count, size = pdf.len(), "criteria document rendered");
        Ok(Bytes::from(pdf))
    }
}
