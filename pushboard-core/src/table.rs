//! Table integration: column specification and row markup
//!
//! The table never edits a row. Each column reads a raw value through its
//! accessor; that raw value is the cell's `data-sort` key, so columns whose
//! display is markup (repo, status) still sort on plain text.

use crate::dataset::{Field, RepoRow};
use crate::markup::{Attr, Fragment, Markup};
use std::borrow::Cow;

/// Raw, unrendered value of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Number(u64),
    Absent,
}

impl<'a> RawValue<'a> {
    pub fn sort_key(&self) -> Cow<'a, str> {
        match self {
            RawValue::Text(s) => Cow::Borrowed(s),
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Absent => Cow::Borrowed(""),
        }
    }
}

impl<'a> From<&'a Field> for RawValue<'a> {
    fn from(field: &'a Field) -> Self {
        match field {
            Field::Absent => RawValue::Absent,
            Field::Text(s) => RawValue::Text(s),
            Field::Count(n) => RawValue::Number(*n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

impl ColumnKind {
    fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Numeric => "numeric",
        }
    }
}

/// One table column: a raw accessor and an optional renderer.
#[derive(Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: ColumnKind,
    pub accessor: for<'r> fn(&'r RepoRow) -> RawValue<'r>,
    pub renderer: Option<for<'r> fn(&'r RepoRow) -> &'r Fragment>,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("rendered", &self.renderer.is_some())
            .finish()
    }
}

macro_rules! counter_column {
    ($key:literal, $title:literal, $field:ident) => {
        Column {
            key: $key,
            title: $title,
            kind: ColumnKind::Numeric,
            accessor: |row| RawValue::Number(row.fields().$field),
            renderer: None,
        }
    };
}

macro_rules! optional_column {
    ($key:literal, $title:literal, $field:ident) => {
        Column {
            key: $key,
            title: $title,
            kind: ColumnKind::Numeric,
            accessor: |row| RawValue::from(&row.fields().$field),
            renderer: None,
        }
    };
}

/// Columns of the activity table, in display order.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column {
            key: "repo",
            title: "repo",
            kind: ColumnKind::Text,
            accessor: |row| RawValue::Text(row.repo()),
            renderer: Some(RepoRow::repo_cell),
        },
        Column {
            key: "status",
            title: "status",
            kind: ColumnKind::Text,
            accessor: |row| RawValue::Text(&row.fields().status),
            renderer: Some(RepoRow::status_badge),
        },
        counter_column!("push_events", "push events", push_events),
        counter_column!("all_push_events", "all push events", all_push_events),
        counter_column!("commits", "commits", commits),
        counter_column!("distinct_commits", "distinct commits", distinct_commits),
        counter_column!("push_users", "users", push_users),
        counter_column!("refs", "refs", refs),
        optional_column!("size", "size", size),
        optional_column!("stars", "stars", stars),
        optional_column!("stars_today", "stars today", stars_today),
    ]
}

/// Render the full `<table>` for `rows` in the given order.
pub fn render_table(rows: &[RepoRow], columns: &[Column], page_length: usize) -> Fragment {
    let page_length = page_length.to_string();

    let mut m = Markup::new();
    m.open(
        "table",
        &[
            Attr::trusted("id", "repo-table"),
            Attr::trusted("class", "data-table"),
            Attr::trusted("data-page-length", &page_length),
        ],
    );

    m.open("thead", &[]).open("tr", &[]);
    for (index, column) in columns.iter().enumerate() {
        let index = index.to_string();
        m.element(
            "th",
            &[
                Attr::trusted("class", "sortable"),
                Attr::trusted("data-column", &index),
                Attr::trusted("data-key", column.key),
                Attr::trusted("data-kind", column.kind.as_str()),
            ],
            column.title,
        );
    }
    m.close("tr").close("thead");

    m.open("tbody", &[]);
    for row in rows {
        m.open("tr", &[]);
        for column in columns {
            let raw = (column.accessor)(row);
            let sort_key = raw.sort_key();
            m.open("td", &[Attr::trusted("data-sort", &sort_key)]);
            match column.renderer {
                Some(render) => m.fragment(render(row)),
                None => m.text(&sort_key),
            };
            m.close("td");
        }
        m.close("tr");
    }
    m.close("tbody").close("table");

    m.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Document, RawRepoRecord};

    fn dataset() -> Dataset {
        let rows = vec![
            RawRepoRecord {
                repo: "acme/tool".to_string(),
                push_events: 7,
                stars: Some(42),
                status: "code-1".to_string(),
                ..Default::default()
            },
            RawRepoRecord {
                repo: "zed/z".to_string(),
                status: "active".to_string(),
                ..Default::default()
            },
        ];
        let timelines = rows
            .iter()
            .map(|r| (r.repo.clone(), vec![0; 365]))
            .collect();
        Dataset::build(Document { rows, timelines }, 2018).unwrap()
    }

    #[test]
    fn test_header_lists_every_column() {
        let columns = default_columns();
        let html = render_table(&[], &columns, 25).into_string();
        assert_eq!(html.matches("<th ").count(), columns.len());
        assert!(html.contains(r#"data-page-length="25""#));
        assert!(html.contains(">all push events</th>"));
    }

    #[test]
    fn test_repo_column_sorts_on_identifier() {
        let ds = dataset();
        let html = render_table(ds.rows(), &default_columns(), 25).into_string();
        assert!(html.contains(r#"<td data-sort="acme/tool"><div class="repo""#));
        assert!(html.contains(r#"<td data-sort="code-1"><span class="status status-exception""#));
    }

    #[test]
    fn test_counter_and_absent_cells() {
        let ds = dataset();
        let html = render_table(ds.rows(), &default_columns(), 25).into_string();
        assert!(html.contains(r#"<td data-sort="7">7</td>"#));
        assert!(html.contains(r#"<td data-sort="42">42</td>"#));
        assert!(html.contains(r#"<td data-sort=""></td>"#));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let ds = dataset();
        let html = render_table(ds.rows(), &default_columns(), 25).into_string();
        assert!(html.find("acme/tool").unwrap() < html.find("zed/z").unwrap());
    }

    #[test]
    fn test_accessor_reads_raw_value() {
        let ds = dataset();
        let columns = default_columns();
        let repo = &columns[0];
        assert_eq!((repo.accessor)(&ds.rows()[0]), RawValue::Text("acme/tool"));
        let stars = columns.iter().find(|c| c.key == "stars").unwrap();
        assert_eq!((stars.accessor)(&ds.rows()[1]), RawValue::Absent);
    }
}
