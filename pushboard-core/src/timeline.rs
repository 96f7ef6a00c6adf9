//! Per-repository daily bar chart
//!
//! Bars are scaled against the repository's own maximum. A zero day gets an
//! empty segment and no bar, so the division by `max` is only reached when
//! `value > 0`, which implies `max > 0`.

use crate::dataset::RenderContext;
use crate::error::DatasetError;
use crate::markup::{Attr, Fragment, Markup};

/// Render the timeline of `repo`, one segment per axis day.
pub fn render_timeline(repo: &str, ctx: &RenderContext<'_>) -> Result<Fragment, DatasetError> {
    let counts = ctx.timeline(repo)?;
    let max = counts.iter().copied().max().unwrap_or(0);

    let mut m = Markup::with_capacity(counts.len() * 72);
    m.open("div", &[Attr::trusted("class", "timeline")]);
    for (date, &value) in ctx.axis().iter().zip(counts) {
        let tooltip = if value > 0 {
            format!("{}: {} distinct PushEvent(s)", date, value)
        } else {
            format!("{}: nothing", date)
        };
        m.open(
            "div",
            &[Attr::trusted("class", "tl-day"), Attr::trusted("title", &tooltip)],
        );
        if let Some(height) = bar_height(value, max) {
            let style = format!("height: {:.2}%", height);
            m.open(
                "div",
                &[Attr::trusted("class", "tl-bar"), Attr::trusted("style", &style)],
            )
            .close("div");
        }
        m.close("div");
    }
    m.close("div");

    Ok(m.finish())
}

/// Bar height in percent of `max`, rounded to two decimals.
///
/// `None` for a zero day; no division happens in that case.
pub fn bar_height(value: u32, max: u32) -> Option<f64> {
    if value == 0 {
        return None;
    }
    let percent = f64::from(value) / f64::from(max) * 100.0;
    Some((percent * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Timeline;
    use crate::date_axis::DateAxis;
    use std::collections::HashMap;

    fn context_fixture(repo: &str, counts: Timeline) -> (DateAxis, HashMap<String, Timeline>) {
        let axis = DateAxis::for_year(2018).unwrap();
        let mut timelines = HashMap::new();
        timelines.insert(repo.to_string(), counts);
        (axis, timelines)
    }

    fn days_with(values: &[(usize, u32)]) -> Timeline {
        let mut counts = vec![0; 365];
        for &(i, v) in values {
            counts[i] = v;
        }
        counts
    }

    #[test]
    fn test_bar_height_zero_is_none_even_with_zero_max() {
        assert_eq!(bar_height(0, 0), None);
        assert_eq!(bar_height(0, 7), None);
    }

    #[test]
    fn test_bar_height_scaling() {
        assert_eq!(bar_height(5, 5), Some(100.0));
        assert_eq!(bar_height(1, 2), Some(50.0));
        assert_eq!(bar_height(1, 3), Some(33.33));
        assert_eq!(bar_height(2, 3), Some(66.67));
    }

    #[test]
    fn test_one_segment_per_day() {
        let (axis, timelines) = context_fixture("acme/tool", days_with(&[(3, 2)]));
        let ctx = RenderContext::new(&axis, &timelines);
        let html = render_timeline("acme/tool", &ctx).unwrap().into_string();
        assert_eq!(html.matches(r#"class="tl-day""#).count(), 365);
    }

    #[test]
    fn test_all_zero_timeline_has_no_bars() {
        let (axis, timelines) = context_fixture("acme/tool", vec![0; 365]);
        let ctx = RenderContext::new(&axis, &timelines);
        let html = render_timeline("acme/tool", &ctx).unwrap().into_string();
        assert!(!html.contains("tl-bar"));
        assert_eq!(html.matches(": nothing").count(), 365);
    }

    #[test]
    fn test_maximum_day_is_full_height() {
        let (axis, timelines) =
            context_fixture("acme/tool", days_with(&[(0, 2), (10, 8), (20, 4)]));
        let ctx = RenderContext::new(&axis, &timelines);
        let html = render_timeline("acme/tool", &ctx).unwrap().into_string();
        assert_eq!(html.matches("tl-bar").count(), 3);
        assert!(html.contains(
            r#"<div class="tl-day" title="2018-01-11: 8 distinct PushEvent(s)"><div class="tl-bar" style="height: 100.00%"></div></div>"#
        ));
        assert!(html.contains(r#"style="height: 25.00%""#));
        assert!(html.contains(r#"style="height: 50.00%""#));
    }

    #[test]
    fn test_scaling_is_per_repository() {
        let axis = DateAxis::for_year(2018).unwrap();
        let mut timelines = HashMap::new();
        timelines.insert("big/one".to_string(), days_with(&[(0, 1000)]));
        timelines.insert("small/one".to_string(), days_with(&[(0, 2)]));
        let ctx = RenderContext::new(&axis, &timelines);
        let small = render_timeline("small/one", &ctx).unwrap().into_string();
        assert!(small.contains(r#"style="height: 100.00%""#));
    }

    #[test]
    fn test_missing_timeline_is_an_error() {
        let (axis, timelines) = context_fixture("acme/tool", vec![0; 365]);
        let ctx = RenderContext::new(&axis, &timelines);
        assert_eq!(
            render_timeline("acme/other", &ctx).unwrap_err(),
            DatasetError::MissingTimeline {
                repo: "acme/other".to_string()
            }
        );
    }

    #[test]
    fn test_short_timeline_is_an_error() {
        let (axis, timelines) = context_fixture("acme/tool", vec![1; 364]);
        let ctx = RenderContext::new(&axis, &timelines);
        assert!(matches!(
            render_timeline("acme/tool", &ctx),
            Err(DatasetError::TimelineLength {
                expected: 365,
                actual: 364,
                ..
            })
        ));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let (axis, timelines) = context_fixture("acme/tool", days_with(&[(1, 5), (2, 3)]));
        let ctx = RenderContext::new(&axis, &timelines);
        assert_eq!(
            render_timeline("acme/tool", &ctx).unwrap(),
            render_timeline("acme/tool", &ctx).unwrap()
        );
    }
}
