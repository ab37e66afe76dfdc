//! Aggregate statistics over the whole egg log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::DayRecord;

/// Eggs lighter than this are small (grams).
pub const SMALL_BELOW: f64 = 55.0;

/// Eggs heavier than this are large (grams).
pub const LARGE_ABOVE: f64 = 65.0;

/// Weight class of an egg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightClass {
    /// Below 55 g.
    Small,
    /// 55 g to 65 g inclusive.
    Medium,
    /// Above 65 g.
    Large,
}

impl WeightClass {
    /// Classify a weight.
    pub fn of(weight: f64) -> Self {
        if weight < SMALL_BELOW {
            WeightClass::Small
        } else if weight <= LARGE_ABOVE {
            WeightClass::Medium
        } else {
            WeightClass::Large
        }
    }
}

/// Egg count per weight class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRanges {
    /// Eggs below 55 g.
    pub small: u32,
    /// Eggs from 55 g to 65 g.
    pub medium: u32,
    /// Eggs above 65 g.
    pub large: u32,
}

impl WeightRanges {
    fn record(&mut self, weight: f64) {
        match WeightClass::of(weight) {
            WeightClass::Small => self.small += 1,
            WeightClass::Medium => self.medium += 1,
            WeightClass::Large => self.large += 1,
        }
    }
}

/// Eggs collected on one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// Collection day.
    pub date: NaiveDate,
    /// Eggs that day.
    pub count: u32,
}

/// Summary of the egg log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggStats {
    /// Eggs across all days.
    pub total_eggs: u32,
    /// Mean weight, one decimal.
    pub avg_weight: String,
    /// Eggs per recorded day, newest first.
    pub eggs_per_day: Vec<DayCount>,
    /// Weight distribution.
    pub weight_ranges: WeightRanges,
    /// Speckled eggs.
    pub speckled_count: u32,
    /// Plain eggs.
    pub plain_count: u32,
    /// Mean eggs per recorded day, one decimal.
    pub daily_average: String,
}

/// Compute statistics from grouped days.
pub fn compute_stats(days: &[DayRecord]) -> EggStats {
    let mut total_eggs = 0u32;
    let mut total_weight = 0.0f64;
    let mut speckled_count = 0u32;
    let mut weight_ranges = WeightRanges::default();

    for stored in days.iter().flat_map(|day| &day.eggs) {
        total_eggs += 1;
        total_weight += stored.egg.weight;
        if stored.egg.speckled {
            speckled_count += 1;
        }
        weight_ranges.record(stored.egg.weight);
    }

    let avg_weight = if total_eggs > 0 {
        total_weight / total_eggs as f64
    } else {
        0.0
    };

    let daily_average = if days.is_empty() {
        0.0
    } else {
        total_eggs as f64 / days.len() as f64
    };

    EggStats {
        total_eggs,
        avg_weight: one_decimal(avg_weight),
        eggs_per_day: days
            .iter()
            .map(|day| DayCount {
                date: day.date,
                count: day.eggs.len() as u32,
            })
            .collect(),
        weight_ranges,
        speckled_count,
        plain_count: total_eggs - speckled_count,
        daily_average: one_decimal(daily_average),
    }
}

/// One decimal place, ties rounded away from zero (`1.25` is `"1.3"`).
///
/// `{:.1}` alone rounds ties to even, which would print `"1.2"`.
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::model::{Egg, EggRow};
    use crate::ledger::timeline::group_by_day;

    fn row(day: u32, weight: f64, speckled: bool) -> EggRow {
        EggRow {
            date: NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            egg: Egg {
                weight,
                color: "#fbe5ce".into(),
                speckled,
                seed: None,
            },
        }
    }

    #[test]
    fn test_empty_log() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total_eggs, 0);
        assert_eq!(stats.avg_weight, "0.0");
        assert_eq!(stats.daily_average, "0.0");
        assert!(stats.eggs_per_day.is_empty());
        assert_eq!(stats.weight_ranges, WeightRanges::default());
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(WeightClass::of(54.9), WeightClass::Small);
        assert_eq!(WeightClass::of(55.0), WeightClass::Medium);
        assert_eq!(WeightClass::of(65.0), WeightClass::Medium);
        assert_eq!(WeightClass::of(65.1), WeightClass::Large);
        assert_eq!(WeightClass::of(0.0), WeightClass::Small);
    }

    #[test]
    fn test_sample_log() {
        let rows = vec![
            row(2, 67.0, false),
            row(2, 64.0, true),
            row(2, 54.0, false),
            row(1, 67.0, false),
            row(1, 54.0, true),
        ];
        let stats = compute_stats(&group_by_day(&rows));

        assert_eq!(stats.total_eggs, 5);
        // (67 + 64 + 54 + 67 + 54) / 5 = 61.2
        assert_eq!(stats.avg_weight, "61.2");
        assert_eq!(stats.speckled_count, 2);
        assert_eq!(stats.plain_count, 3);
        assert_eq!(
            stats.weight_ranges,
            WeightRanges { small: 2, medium: 1, large: 2 }
        );
        assert_eq!(stats.eggs_per_day.len(), 2);
        assert_eq!(stats.eggs_per_day[0].count, 3);
        assert_eq!(stats.eggs_per_day[1].count, 2);
        assert_eq!(stats.daily_average, "2.5");
    }

    #[test]
    fn test_ties_round_up() {
        // 306.25 g over 5 eggs is 61.25 g; 5 eggs over 4 days is 1.25.
        let rows = vec![
            row(1, 61.0, false),
            row(2, 61.5, false),
            row(3, 61.25, false),
            row(4, 61.25, false),
            row(4, 61.25, false),
        ];
        let stats = compute_stats(&group_by_day(&rows));

        assert_eq!(stats.avg_weight, "61.3");
        assert_eq!(stats.daily_average, "1.3");
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(0.0), "0.0");
        assert_eq!(one_decimal(1.25), "1.3");
        assert_eq!(one_decimal(2.5), "2.5");
        assert_eq!(one_decimal(0.05), "0.1");
        assert_eq!(one_decimal(61.24), "61.2");
    }

    #[test]
    fn test_stats_json_field_names() {
        let json = serde_json::to_value(compute_stats(&[])).unwrap();
        for field in [
            "total_eggs",
            "avg_weight",
            "eggs_per_day",
            "weight_ranges",
            "speckled_count",
            "plain_count",
            "daily_average",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
