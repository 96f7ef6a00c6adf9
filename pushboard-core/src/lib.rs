//! pushboard core library - renders GitHub push-activity datasets as an HTML table
//! with one daily timeline per repository

#![deny(warnings)]

// Global invariants enforced in this crate:
// - The date axis and timelines are read-only once built and are passed
//   explicitly to every render call
// - Rows keep document order; sorting and filtering belong to the page script
// - A missing or misaligned timeline is an error, never an empty chart
// - Identical input yields byte-for-byte identical output

pub mod config;
pub mod dataset;
pub mod date_axis;
pub mod error;
pub mod markup;
pub mod page;
pub mod row;
pub mod source;
pub mod table;
pub mod timeline;

pub use config::ResolvedConfig;
pub use dataset::{Dataset, Document, RawRepoRecord, RepoRow};
pub use date_axis::DateAxis;
pub use error::{DatasetError, FetchError};
pub use page::{render_failure_page, render_page, PageOptions};
pub use source::{load_document, DataSource};

/// Build the dataset for `year` from `document` and render the full page.
pub fn render_report(
    document: Document,
    year: i32,
    options: &PageOptions,
) -> Result<String, DatasetError> {
    let dataset = Dataset::build(document, year)?;
    Ok(render_page(&dataset, options))
}
