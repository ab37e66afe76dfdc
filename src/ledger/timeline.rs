//! Day grouping and the seven-day timeline.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::render::{render_egg, EggVisual, RenderedEgg, SpeckleTuning};

use super::model::{DayRecord, EggRow, StoredEgg};

/// Days shown on the timeline.
pub const TIMELINE_DAYS: usize = 7;

/// Days returned by a days query that does not name a count.
pub const DEFAULT_DAYS_QUERY: usize = 5;

/// Group rows by collection day, newest day first.
///
/// Eggs keep their row order inside a day.
pub fn group_by_day(rows: &[EggRow]) -> Vec<DayRecord> {
    let mut by_date: BTreeMap<NaiveDate, Vec<StoredEgg>> = BTreeMap::new();

    for (row_index, row) in rows.iter().enumerate() {
        by_date.entry(row.date).or_default().push(StoredEgg {
            row_index,
            egg: row.egg.clone(),
        });
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, eggs)| DayRecord { date, eggs })
        .collect()
}

/// The `n` most recent days that have at least one egg.
pub fn last_n_days(rows: &[EggRow], n: usize) -> Vec<DayRecord> {
    let mut days = group_by_day(rows);
    days.truncate(n);
    days
}

/// Fill in empty days so every one of the `span` days ending at `today` is
/// present, then keep the `span` newest days.
///
/// Padding stops at the earliest representable date.
pub fn pad_days(mut days: Vec<DayRecord>, today: NaiveDate, span: usize) -> Vec<DayRecord> {
    for offset in 0..span {
        let Some(date) = today.checked_sub_days(Days::new(offset as u64)) else {
            break;
        };
        if !days.iter().any(|day| day.date == date) {
            days.push(DayRecord::empty(date));
        }
    }

    days.sort_by(|a, b| b.date.cmp(&a.date));
    days.truncate(span);
    days
}

/// An egg as shown on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineEgg {
    /// Row in the store.
    pub row_index: usize,
    /// Weight in grams.
    pub weight: f64,
    /// Speckled shell.
    pub speckled: bool,
    /// Stored seed, passed back so edits keep the pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Render output.
    pub visual: RenderedEgg,
}

/// A day on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineDay {
    /// Collection day.
    pub date: NaiveDate,
    /// Heading, e.g. `Monday 2nd October`.
    pub label: String,
    /// Rendered eggs, in row order.
    pub eggs: Vec<TimelineEgg>,
}

/// Build the timeline from the most recent stored days.
pub fn build_timeline(
    rows: &[EggRow],
    today: NaiveDate,
    tuning: SpeckleTuning,
) -> Vec<TimelineDay> {
    let days = pad_days(last_n_days(rows, TIMELINE_DAYS), today, TIMELINE_DAYS);

    days.into_iter()
        .map(|day| TimelineDay {
            date: day.date,
            label: day_label(day.date),
            eggs: day
                .eggs
                .iter()
                .map(|stored| TimelineEgg {
                    row_index: stored.row_index,
                    weight: stored.egg.weight,
                    speckled: stored.egg.speckled,
                    seed: stored.egg.seed,
                    visual: render_egg(&EggVisual::from(&stored.egg), tuning),
                })
                .collect(),
        })
        .collect()
}

/// Day heading: full weekday, ordinal day of month, full month name.
pub fn day_label(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.format("%A"),
        ordinal(date.day()),
        date.format("%B")
    )
}

/// English ordinal: `1st`, `2nd`, `3rd`, `11th`, `22nd`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
