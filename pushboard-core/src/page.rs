//! HTML page generation
//!
//! Generates a self-contained page with embedded CSS and JavaScript. The
//! script only reorders and hides rows (sort, search, pagination); cell
//! content is exactly what the table renderer produced.

use crate::dataset::Dataset;
use crate::markup::{Attr, Markup};
use crate::table::{default_columns, render_table};

/// Page-level settings that do not come from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    pub title: String,
    pub page_length: usize,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            title: "Automated commits".to_string(),
            page_length: 25,
        }
    }
}

/// Render the activity table for `dataset` as a complete HTML document.
pub fn render_page(dataset: &Dataset, options: &PageOptions) -> String {
    let table = render_table(dataset.rows(), &default_columns(), options.page_length);
    let info = format!(
        "{} repositories, daily distinct PushEvents in {}",
        dataset.rows().len(),
        dataset.axis().year()
    );

    let mut body = Markup::new();
    body.element("p", &[Attr::trusted("class", "info")], &info)
        .text(SEARCH_BAR)
        .open("div", &[Attr::trusted("class", "table-wrap")])
        .fragment(&table)
        .close("div");

    document(options, &body.finish().into_string())
}

/// Page shown instead of the table when the dataset could not be loaded.
pub fn render_failure_page(reason: &str, options: &PageOptions) -> String {
    let mut body = Markup::new();
    body.open("p", &[Attr::trusted("class", "info")])
        .text("failed loading data: ")
        .escaped_text(reason)
        .close("p");

    document(options, &body.finish().into_string())
}

const SEARCH_BAR: &str = r#"<div class="controls">
        <input type="search" id="search-filter" placeholder="Search repositories">
        <div id="pagination-controls" class="pagination-controls"></div>
    </div>"#;

fn document(options: &PageOptions, body: &str) -> String {
    let mut title = Markup::new();
    title.escaped_text(&options.title);
    let title = title.finish();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header><h1>{title}</h1></header>
        {body}
        {footer}
    </div>
    <script>{js}</script>
</body>
</html>"#,
        title = title,
        css = inline_css(),
        body = body,
        footer = render_footer(),
        js = inline_javascript(),
    )
}

fn render_footer() -> &'static str {
    r#"<footer>
    <p>Generated by pushboard from GH Archive push events</p>
</footer>"#
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.5;
    color: #111827;
    background: #ffffff;
}

.container {
    max-width: 1600px;
    margin: 0 auto;
    padding: 2rem;
}

header {
    margin-bottom: 1rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
}

.info {
    color: #6b7280;
    font-size: 0.875rem;
    margin-bottom: 1rem;
}

.controls {
    display: flex;
    align-items: center;
    gap: 1rem;
    margin-bottom: 0.75rem;
    flex-wrap: wrap;
}

#search-filter {
    padding: 0.35rem 0.6rem;
    border: 1px solid #d1d5db;
    border-radius: 0.375rem;
    font-size: 0.875rem;
    min-width: 16rem;
}

.table-wrap {
    overflow-x: auto;
}

table {
    width: 100%;
    border-collapse: collapse;
}

thead {
    background: #f9fafb;
}

th {
    padding: 0.5rem;
    text-align: left;
    font-weight: 600;
    font-size: 0.8125rem;
    color: #374151;
    border-bottom: 2px solid #e5e7eb;
    white-space: nowrap;
}

td {
    padding: 0.5rem;
    border-bottom: 1px solid #e5e7eb;
    font-size: 0.8125rem;
    vertical-align: top;
}

th.sortable {
    cursor: pointer;
    user-select: none;
}

th.sortable:hover {
    background: #e5e7eb;
}

th.sortable::after {
    content: ' ↕';
    opacity: 0.3;
}

th.sortable.asc::after {
    content: ' ↑';
    opacity: 1;
}

th.sortable.desc::after {
    content: ' ↓';
    opacity: 1;
}

.repo-name {
    font-weight: 600;
}

.repo a {
    color: #2563eb;
    text-decoration: none;
}

.repo a:hover {
    text-decoration: underline;
}

/* Timeline: one fixed-size segment per day, bar grows from the bottom */
.timeline {
    display: flex;
    align-items: flex-end;
    height: 24px;
    margin-top: 0.35rem;
}

.tl-day {
    position: relative;
    width: 2px;
    height: 24px;
    flex: 0 0 2px;
}

.tl-day:hover {
    background: #e5e7eb;
}

.tl-bar {
    position: absolute;
    bottom: 0;
    width: 100%;
    background: #3b82f6;
}

.status {
    display: inline-block;
    padding: 0.1rem 0.5rem;
    border-radius: 9999px;
    font-size: 0.75rem;
    font-weight: 600;
    white-space: nowrap;
}

.status-active    { background: #dcfce7; color: #166534; }
.status-exception { background: #fef3c7; color: #92400e; }
.status-deleted   { background: #fee2e2; color: #991b1b; }

.pagination-controls {
    display: flex;
    align-items: center;
    gap: 0.75rem;
    flex-wrap: wrap;
}

.page-buttons {
    display: flex;
    align-items: center;
    gap: 0.25rem;
}

.page-btn, .page-nav {
    padding: 0.25rem 0.6rem;
    border: 1px solid #d1d5db;
    border-radius: 0.375rem;
    background: #ffffff;
    cursor: pointer;
    font-size: 0.8125rem;
}

.page-btn.active, .page-btn:disabled {
    background: #3b82f6;
    color: #ffffff;
    border-color: #3b82f6;
    cursor: default;
}

.page-nav:disabled {
    opacity: 0.4;
    cursor: not-allowed;
}

.page-info {
    font-size: 0.8125rem;
    color: #6b7280;
    white-space: nowrap;
}

.page-ellipsis {
    padding: 0 0.25rem;
    color: #9ca3af;
}

footer {
    margin-top: 2rem;
    padding-top: 1rem;
    border-top: 1px solid #e5e7eb;
    color: #9ca3af;
    font-size: 0.75rem;
}

@media (prefers-color-scheme: dark) {
    body { background: #111827; color: #f9fafb; }
    header, th, td, footer { border-color: #374151; }
    thead { background: #1f2937; }
    th { color: #d1d5db; }
    th.sortable:hover, .tl-day:hover { background: #374151; }
    .repo a { color: #60a5fa; }
    .tl-bar { background: #60a5fa; }
    #search-filter, .page-btn, .page-nav { background: #1f2937; border-color: #374151; color: #f9fafb; }
}
"#
}

/// Inline JavaScript for sorting, search and pagination
fn inline_javascript() -> &'static str {
    r#"
(function() {
    const table = document.getElementById('repo-table');
    if (!table) return;
    const tbody = table.querySelector('tbody');
    let sortColumn = null;
    let sortDirection = 'asc';
    let currentPage = 1;
    let pageSize = parseInt(table.dataset.pageLength, 10) || 25;

    window.__pbGoToPage = function(page) { currentPage = page; paginateTable(); };

    function sortTable(column) {
        const header = table.querySelector(`th[data-column="${column}"]`);
        const numeric = header && header.dataset.kind === 'numeric';
        const rows = Array.from(tbody.querySelectorAll('tr'));

        if (sortColumn === column) {
            sortDirection = sortDirection === 'asc' ? 'desc' : 'asc';
        } else {
            sortColumn = column;
            sortDirection = numeric ? 'desc' : 'asc';
        }

        table.querySelectorAll('th.sortable').forEach(th => th.classList.remove('asc', 'desc'));
        if (header) header.classList.add(sortDirection);

        const idx = parseInt(column, 10);
        const key = row => row.children[idx].dataset.sort || '';
        rows.sort((a, b) => {
            const aVal = key(a);
            const bVal = key(b);
            let cmp;
            if (numeric) {
                // empty keys (absent values) always sink to the bottom
                if (aVal === '' || bVal === '') return (aVal === '') - (bVal === '');
                cmp = parseFloat(aVal) - parseFloat(bVal);
            } else {
                cmp = aVal.localeCompare(bVal);
            }
            return sortDirection === 'asc' ? cmp : -cmp;
        });

        rows.forEach(row => tbody.appendChild(row));
        currentPage = 1;
        paginateTable();
    }

    function filterTable() {
        const needle = document.getElementById('search-filter').value.toLowerCase();
        tbody.querySelectorAll('tr').forEach(row => {
            const match = !needle || row.textContent.toLowerCase().includes(needle);
            row.dataset.filterMatch = match ? '1' : '0';
        });
        currentPage = 1;
        paginateTable();
    }

    function paginateTable() {
        const rows = Array.from(tbody.querySelectorAll('tr'));
        const matched = rows.filter(r => r.dataset.filterMatch !== '0');
        const total = matched.length;
        const totalPages = Math.max(1, Math.ceil(total / pageSize));
        if (currentPage > totalPages) currentPage = totalPages;
        if (currentPage < 1) currentPage = 1;

        const start = (currentPage - 1) * pageSize;
        const end = start + pageSize;

        rows.forEach(r => { r.style.display = 'none'; });
        matched.forEach((r, i) => { r.style.display = (i >= start && i < end) ? '' : 'none'; });

        renderPaginationControls(currentPage, totalPages, total, start, end);
    }

    function renderPaginationControls(page, totalPages, total, start, end) {
        const el = document.getElementById('pagination-controls');
        if (!el) return;

        const from = total === 0 ? 0 : start + 1;
        const to = Math.min(end, total);
        const button = p => `<button onclick="window.__pbGoToPage(${p})" class="page-btn${p === page ? ' active' : ''}" ${p === page ? 'disabled' : ''}>${p}</button>`;

        let pageButtons = '';
        const visible = new Set([1, 2, page - 1, page, page + 1, totalPages - 1, totalPages].filter(p => p >= 1 && p <= totalPages));
        let prev = 0;
        for (const p of Array.from(visible).sort((a, b) => a - b)) {
            if (prev && p - prev > 1) pageButtons += '<span class="page-ellipsis">…</span>';
            pageButtons += button(p);
            prev = p;
        }

        el.innerHTML =
            `<span class="page-info">Showing ${from}–${to} of ${total}</span>` +
            `<div class="page-buttons">` +
            `<button class="page-nav" onclick="window.__pbGoToPage(${page - 1})" ${page <= 1 ? 'disabled' : ''}>&larr; Prev</button>` +
            pageButtons +
            `<button class="page-nav" onclick="window.__pbGoToPage(${page + 1})" ${page >= totalPages ? 'disabled' : ''}>Next &rarr;</button>` +
            `</div>`;
    }

    document.addEventListener('DOMContentLoaded', function() {
        table.querySelectorAll('th.sortable').forEach(th => {
            th.addEventListener('click', function() { sortTable(this.dataset.column); });
        });
        const search = document.getElementById('search-filter');
        if (search) search.addEventListener('input', filterTable);

        tbody.querySelectorAll('tr').forEach(r => { r.dataset.filterMatch = '1'; });
        paginateTable();
    });
})();
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Document, RawRepoRecord};

    fn dataset() -> Dataset {
        let rows = vec![RawRepoRecord {
            repo: "acme/tool".to_string(),
            status: "active".to_string(),
            ..Default::default()
        }];
        let timelines = rows
            .iter()
            .map(|r| (r.repo.clone(), vec![0; 365]))
            .collect();
        Dataset::build(Document { rows, timelines }, 2018).unwrap()
    }

    #[test]
    fn test_page_contains_table_and_info() {
        let html = render_page(&dataset(), &PageOptions::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<table id="repo-table""#));
        assert!(html.contains("1 repositories, daily distinct PushEvents in 2018"));
        assert!(html.contains("<title>Automated commits</title>"));
    }

    #[test]
    fn test_failure_page_has_no_table() {
        let html = render_failure_page("connection refused", &PageOptions::default());
        assert!(html.contains(r#"<p class="info">failed loading data: connection refused</p>"#));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_failure_reason_is_escaped() {
        let html = render_failure_page("<b>bad</b>", &PageOptions::default());
        assert!(html.contains("failed loading data: &lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn test_title_is_escaped() {
        let options = PageOptions {
            title: "Pushes & <more>".to_string(),
            page_length: 10,
        };
        let html = render_page(&dataset(), &options);
        assert!(html.contains("<title>Pushes &amp; &lt;more&gt;</title>"));
        assert!(html.contains(r#"data-page-length="10""#));
    }

    #[test]
    fn test_identical_input_identical_output() {
        let ds = dataset();
        let options = PageOptions::default();
        assert_eq!(render_page(&ds, &options), render_page(&ds, &options));
    }
}
