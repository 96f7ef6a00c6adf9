//! Calendar-day axis for one year
//!
//! Every timeline in a dataset is index-aligned with this axis: entry `i` of a
//! timeline is the count for `axis[i]`.

use crate::error::DatasetError;
use chrono::{Datelike, NaiveDate};

/// Ordered ISO-8601 day labels, January 1 through December 31.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAxis {
    year: i32,
    labels: Vec<String>,
}

impl DateAxis {
    /// Build the axis for `year`, one label per day, stopping when the year rolls over.
    pub fn for_year(year: i32) -> Result<Self, DatasetError> {
        let mut day =
            NaiveDate::from_ymd_opt(year, 1, 1).ok_or(DatasetError::InvalidYear { year })?;

        let mut labels = Vec::with_capacity(366);
        while day.year() == year {
            labels.push(day.format("%Y-%m-%d").to_string());
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        Ok(DateAxis { year, labels })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
