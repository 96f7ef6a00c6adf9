//! Dataset document, normalized rows and the shared render context
//!
//! Global invariants enforced:
//! - Every row's repository has a timeline of exactly `axis.len()` entries
//! - Rows keep document order
//! - A built row never changes; its fragments are rendered once, at construction

use crate::date_axis::DateAxis;
use crate::error::DatasetError;
use crate::markup::Fragment;
use crate::row::{render_repo_cell, render_status_badge};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

const LOG_TARGET: &str = "pushboard::dataset";

/// Daily distinct PushEvent counts for one repository, aligned with the [`DateAxis`].
pub type Timeline = Vec<u32>;

/// The dataset document as delivered by the producer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub rows: Vec<RawRepoRecord>,
    /// Keyed by the exact `repo` string of each row.
    #[serde(default)]
    pub timelines: HashMap<String, Timeline>,
}

/// One repository's statistics, exactly as found in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRepoRecord {
    pub repo: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    pub push_events: u64,
    pub all_push_events: u64,
    pub commits: u64,
    pub distinct_commits: u64,
    pub push_users: u64,
    pub refs: u64,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub stars: Option<u64>,
    #[serde(default)]
    pub stars_today: Option<u64>,
    pub status: String,
}

/// A normalized optional value. Absence displays as the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Absent,
    Text(String),
    Count(u64),
}

impl Field {
    fn from_text(value: Option<&str>) -> Field {
        match value {
            Some(s) if !s.is_empty() => Field::Text(s.to_string()),
            _ => Field::Absent,
        }
    }

    fn from_count(value: Option<u64>) -> Field {
        value.map_or(Field::Absent, Field::Count)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Absent => Ok(()),
            Field::Text(s) => f.write_str(s),
            Field::Count(n) => write!(f, "{}", n),
        }
    }
}

/// A validated `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    full: String,
    slash: usize,
}

impl RepoId {
    /// Accepts exactly two non-empty, slash-separated segments.
    pub fn parse(repo: &str) -> Result<Self, DatasetError> {
        let malformed = || DatasetError::MalformedRepoId {
            repo: repo.to_string(),
        };
        let (owner, name) = repo.split_once('/').ok_or_else(malformed)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(malformed());
        }
        Ok(RepoId {
            full: repo.to_string(),
            slash: owner.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn name(&self) -> &str {
        &self.full[self.slash + 1..]
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// Read-only view over the axis and timelines, passed to every render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    axis: &'a DateAxis,
    timelines: &'a HashMap<String, Timeline>,
}

impl<'a> RenderContext<'a> {
    pub fn new(axis: &'a DateAxis, timelines: &'a HashMap<String, Timeline>) -> Self {
        RenderContext { axis, timelines }
    }

    pub fn axis(&self) -> &'a DateAxis {
        self.axis
    }

    /// Timeline for `repo`, checked against the axis length.
    pub fn timeline(&self, repo: &str) -> Result<&'a [u32], DatasetError> {
        let counts = self
            .timelines
            .get(repo)
            .ok_or_else(|| DatasetError::MissingTimeline {
                repo: repo.to_string(),
            })?;
        if counts.len() != self.axis.len() {
            return Err(DatasetError::TimelineLength {
                repo: repo.to_string(),
                expected: self.axis.len(),
                actual: counts.len(),
            });
        }
        Ok(counts)
    }
}

/// Normalized fields of one record. No optional value is left as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFields {
    pub repo: RepoId,
    pub description: Field,
    pub name: Field,
    pub homepage: Field,
    pub push_events: u64,
    pub all_push_events: u64,
    pub commits: u64,
    pub distinct_commits: u64,
    pub push_users: u64,
    pub refs: u64,
    pub size: Field,
    pub stars: Field,
    pub stars_today: Field,
    pub status: String,
}

impl RepoFields {
    pub fn normalize(record: &RawRepoRecord) -> Result<Self, DatasetError> {
        Ok(RepoFields {
            repo: RepoId::parse(&record.repo)?,
            description: Field::from_text(record.description.as_deref()),
            name: Field::from_text(record.name.as_deref()),
            homepage: Field::from_text(record.homepage.as_deref()),
            push_events: record.push_events,
            all_push_events: record.all_push_events,
            commits: record.commits,
            distinct_commits: record.distinct_commits,
            push_users: record.push_users,
            refs: record.refs,
            size: Field::from_count(record.size),
            stars: Field::from_count(record.stars),
            stars_today: Field::from_count(record.stars_today),
            status: record.status.clone(),
        })
    }
}

/// Immutable per-repository view-model handed to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    fields: RepoFields,
    repo_cell: Fragment,
    status_badge: Fragment,
}

impl RepoRow {
    pub fn from_record(
        record: &RawRepoRecord,
        ctx: &RenderContext<'_>,
    ) -> Result<Self, DatasetError> {
        let fields = RepoFields::normalize(record)?;
        let repo_cell = render_repo_cell(&fields, ctx)?;
        let status_badge = render_status_badge(&fields.status);
        Ok(RepoRow {
            fields,
            repo_cell,
            status_badge,
        })
    }

    pub fn fields(&self) -> &RepoFields {
        &self.fields
    }

    pub fn repo(&self) -> &str {
        self.fields.repo.as_str()
    }

    pub fn repo_cell(&self) -> &Fragment {
        &self.repo_cell
    }

    pub fn status_badge(&self) -> &Fragment {
        &self.status_badge
    }
}

/// Axis, timelines and rows for one page load.
#[derive(Debug, Clone)]
pub struct Dataset {
    axis: DateAxis,
    timelines: HashMap<String, Timeline>,
    rows: Vec<RepoRow>,
}

impl Dataset {
    /// Build every row of `document` against the axis for `year`.
    ///
    /// Stops at the first integrity fault; use [`Dataset::check_integrity`]
    /// to list all of them.
    pub fn build(document: Document, year: i32) -> Result<Self, DatasetError> {
        let started = Instant::now();
        let axis = DateAxis::for_year(year)?;
        let Document { rows, timelines } = document;

        let ctx = RenderContext::new(&axis, &timelines);
        let built = rows
            .iter()
            .map(|record| RepoRow::from_record(record, &ctx))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(target: LOG_TARGET, "Built {} repository rows for {}", built.len(), year);
        log::debug!(
            target: LOG_TARGET,
            "Finished building dataset in {:.3}s",
            started.elapsed().as_secs_f64()
        );

        Ok(Dataset {
            axis,
            timelines,
            rows: built,
        })
    }

    /// Every integrity fault in `document`, in row order.
    ///
    /// Only an invalid `year` fails the call itself.
    pub fn check_integrity(
        document: &Document,
        year: i32,
    ) -> Result<Vec<DatasetError>, DatasetError> {
        let axis = DateAxis::for_year(year)?;
        let ctx = RenderContext::new(&axis, &document.timelines);

        let mut faults = Vec::new();
        for record in &document.rows {
            if let Err(e) = RepoId::parse(&record.repo) {
                faults.push(e);
                continue;
            }
            if let Err(e) = ctx.timeline(&record.repo) {
                faults.push(e);
            }
        }
        Ok(faults)
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn rows(&self) -> &[RepoRow] {
        &self.rows
    }

    pub fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.axis, &self.timelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(repo: &str) -> RawRepoRecord {
        RawRepoRecord {
            repo: repo.to_string(),
            push_events: 3,
            all_push_events: 4,
            commits: 5,
            distinct_commits: 5,
            push_users: 1,
            refs: 1,
            status: "active".to_string(),
            ..Default::default()
        }
    }

    fn document(records: Vec<RawRepoRecord>, days: usize) -> Document {
        let timelines = records
            .iter()
            .map(|r| (r.repo.clone(), vec![0; days]))
            .collect();
        Document {
            rows: records,
            timelines,
        }
    }

    #[test]
    fn test_repo_id_parts() {
        let id = RepoId::parse("acme/acme.github.io").unwrap();
        assert_eq!(id.name(), "acme.github.io");
        assert_eq!(id.to_string(), "acme/acme.github.io");
    }

    #[test]
    fn test_repo_id_rejects_other_shapes() {
        for bad in ["acme", "acme/", "/tool", "a/b/c", ""] {
            assert!(
                matches!(RepoId::parse(bad), Err(DatasetError::MalformedRepoId { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_absent_fields_display_empty() {
        let fields = RepoFields::normalize(&record("acme/tool")).unwrap();
        for field in [
            &fields.description,
            &fields.name,
            &fields.homepage,
            &fields.size,
            &fields.stars,
            &fields.stars_today,
        ] {
            assert!(field.is_absent());
            assert_eq!(field.to_string(), "");
        }
    }

    #[test]
    fn test_present_fields_keep_values() {
        let mut raw = record("acme/tool");
        raw.stars = Some(12);
        raw.homepage = Some("https://acme.dev".to_string());
        raw.description = Some(String::new());
        let fields = RepoFields::normalize(&raw).unwrap();
        assert_eq!(fields.stars, Field::Count(12));
        assert_eq!(fields.homepage.as_text(), Some("https://acme.dev"));
        assert!(fields.description.is_absent(), "empty string counts as absent");
    }

    #[test]
    fn test_document_parses_nulls_and_missing_optionals() {
        let json = r#"{
            "rows": [{
                "repo": "acme/tool", "status": "active", "homepage": null,
                "push_events": 1, "all_push_events": 1, "commits": 1,
                "distinct_commits": 1, "push_users": 1, "refs": 1
            }],
            "timelines": {"acme/tool": [1, 2]}
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.rows[0].homepage, None);
        assert_eq!(doc.rows[0].stars, None);
        assert_eq!(doc.timelines["acme/tool"], vec![1, 2]);
    }

    #[test]
    fn test_build_preserves_order() {
        let doc = document(
            vec![record("zed/z"), record("acme/a"), record("mid/m")],
            365,
        );
        let dataset = Dataset::build(doc, 2018).unwrap();
        let repos: Vec<&str> = dataset.rows().iter().map(RepoRow::repo).collect();
        assert_eq!(repos, vec!["zed/z", "acme/a", "mid/m"]);
        assert_eq!(dataset.axis().len(), 365);
    }

    #[test]
    fn test_build_fails_on_missing_timeline() {
        let mut doc = document(vec![record("acme/a"), record("acme/b")], 365);
        doc.timelines.remove("acme/b");
        assert_eq!(
            Dataset::build(doc, 2018).unwrap_err(),
            DatasetError::MissingTimeline {
                repo: "acme/b".to_string()
            }
        );
    }

    #[test]
    fn test_build_fails_on_length_mismatch() {
        let doc = document(vec![record("acme/a")], 366);
        assert_eq!(
            Dataset::build(doc, 2018).unwrap_err(),
            DatasetError::TimelineLength {
                repo: "acme/a".to_string(),
                expected: 365,
                actual: 366,
            }
        );
    }

    #[test]
    fn test_check_integrity_reports_every_fault() {
        let mut doc = document(
            vec![record("acme/a"), record("acme/b"), record("a/b/c")],
            365,
        );
        doc.timelines.remove("acme/a");
        doc.timelines.insert("acme/b".to_string(), vec![0; 10]);
        let faults = Dataset::check_integrity(&doc, 2018).unwrap();
        assert_eq!(faults.len(), 3);
        assert!(matches!(faults[0], DatasetError::MissingTimeline { .. }));
        assert!(matches!(faults[1], DatasetError::TimelineLength { .. }));
        assert!(matches!(faults[2], DatasetError::MalformedRepoId { .. }));
    }

    #[test]
    fn test_check_integrity_clean_document() {
        let doc = document(vec![record("acme/a")], 366);
        assert!(Dataset::check_integrity(&doc, 2020).unwrap().is_empty());
    }
}
