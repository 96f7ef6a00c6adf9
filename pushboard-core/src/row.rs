//! Repo cell and status badge rendering

use crate::dataset::{RenderContext, RepoFields, RepoId};
use crate::error::DatasetError;
use crate::markup::{Attr, Fragment, Markup};
use crate::timeline::render_timeline;

const NO_DESCRIPTION: &str = "no description";
const PAGES_SUFFIX: &str = ".github.io";

/// Status classification for the badge, decided by string prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Deleted,
    Exception,
    Active,
}

impl StatusClass {
    /// First match wins: `deleted*`, then `code*`, then everything else.
    pub fn classify(status: &str) -> Self {
        if status.starts_with("deleted") {
            StatusClass::Deleted
        } else if status.starts_with("code") {
            StatusClass::Exception
        } else {
            StatusClass::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Deleted => "deleted",
            StatusClass::Exception => "exception",
            StatusClass::Active => "active",
        }
    }
}

/// GitHub Pages address for a `owner/owner.github.io`-style repository.
///
/// A bare `.github.io` name has no host label and gets no link.
pub fn pages_url(repo: &RepoId) -> Option<String> {
    match repo.name().strip_suffix(PAGES_SUFFIX) {
        Some(host) if !host.is_empty() => Some(format!("https://{}/", repo.name())),
        _ => None,
    }
}

/// Description tooltip, optional display name, GitHub link, homepage or pages
/// link, then the repository's timeline.
pub fn render_repo_cell(
    fields: &RepoFields,
    ctx: &RenderContext<'_>,
) -> Result<Fragment, DatasetError> {
    let repo = fields.repo.as_str();
    let timeline = render_timeline(repo, ctx)?;

    let description = fields.description.as_text().unwrap_or(NO_DESCRIPTION);
    let github = format!("https://github.com/{}", repo);

    let mut m = Markup::with_capacity(timeline.as_str().len() + 256);
    m.open(
        "div",
        &[
            Attr::trusted("class", "repo"),
            Attr::quoted("title", description),
        ],
    );
    if let Some(name) = fields.name.as_text() {
        m.element("span", &[Attr::trusted("class", "repo-name")], name)
            .void("br", &[]);
    }
    m.element(
        "a",
        &[
            Attr::trusted("href", &github),
            Attr::trusted("target", "_blank"),
        ],
        repo,
    );

    let pages = pages_url(&fields.repo);
    let site = match (fields.homepage.as_text(), pages.as_deref()) {
        (Some(homepage), _) => Some(("homepage", homepage)),
        (None, Some(pages)) => Some(("pages", pages)),
        (None, None) => None,
    };
    if let Some((class, url)) = site {
        m.text(" ").element(
            "a",
            &[
                Attr::trusted("class", class),
                Attr::trusted("href", url),
                Attr::trusted("target", "_blank"),
            ],
            url,
        );
    }
    m.close("div").fragment(&timeline);

    Ok(m.finish())
}

/// Tagged wrapper around the original status text.
pub fn render_status_badge(status: &str) -> Fragment {
    let class = StatusClass::classify(status);
    let css = format!("status status-{}", class.as_str());

    let mut m = Markup::new();
    m.element(
        "span",
        &[
            Attr::trusted("class", &css),
            Attr::trusted("data-status", class.as_str()),
        ],
        status,
    );
    m.finish()
}
