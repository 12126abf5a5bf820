//! Cost summary reporting over the stored monthly summaries

pub mod export;

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{Local, NaiveDate};

use crate::ingest::costs::MonthlyCostSummary;

/// Current month as `<Month>-<Year>`, e.g. `March-2023`
pub fn current_month() -> String {
    Local::now().format("%B-%Y").to_string()
}

/// First day of an accounted month, if the text names one
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    let (name, year) = month.split_once('-')?;
    NaiveDate::parse_from_str(&format!("1 {} {}", name.trim(), year.trim()), "%d %B %Y").ok()
}

/// Newest month first; summaries without a readable month go last
pub fn sort_newest_first(summaries: &mut [MonthlyCostSummary]) {
    summaries.sort_by_key(|s| {
        let month = parse_month(&s.accounted_month);
        (month.is_none(), Reverse(month))
    });
}

/// Summaries of `month`, or the first (newest) summary when none match.
///
/// Expects a list already sorted with [`sort_newest_first`].
pub fn select_month<'a>(sorted: &'a [MonthlyCostSummary], month: &str) -> Vec<&'a MonthlyCostSummary> {
    let matching: Vec<_> = sorted.iter().filter(|s| s.accounted_month == month).collect();
    if matching.is_empty() {
        if let Some(latest) = sorted.first() {
            log::info!(
                "No cost summary for {}, showing {}",
                month,
                latest.accounted_month
            );
            return vec![latest];
        }
    }
    matching
}

/// Distinct accounted months in list order
pub fn unique_months(sorted: &[MonthlyCostSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut months = Vec::new();
    for summary in sorted {
        if seen.insert(summary.accounted_month.as_str()) {
            months.push(summary.accounted_month.clone());
        }
    }
    months
}

/// `(label, value)` pairs of one summary in display order
pub fn summary_rows(summary: &MonthlyCostSummary) -> [(&'static str, f64); 10] {
    [
        ("Previous Stock", summary.previous_stock),
        ("Std Total Collection", summary.std_total_collection),
        ("Teacher Collection", summary.teacher_collection()),
        ("Total Cost", summary.total_cost),
        ("Total Meals Served", summary.total_meals_served),
        ("Guest Taka", summary.guest_taka),
        ("Per Meal Cost", summary.per_meal_cost),
        ("Current Stock", summary.current_stock),
        ("Others", summary.others),
        ("Shopping", shopping_total(summary)),
    ]
}

fn shopping_total(summary: &MonthlyCostSummary) -> f64 {
    summary.shopping_entries.iter().map(|e| e.amount).sum()
}

/// Sums across summaries of the amounts that accumulate.
///
/// Stock levels and the per-meal rate are per summary only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTotals {
    pub std_total_collection: f64,
    pub teacher_collection: f64,
    pub total_cost: f64,
    pub total_meals_served: f64,
    pub guest_taka: f64,
    pub others: f64,
    pub shopping: f64,
}

impl CostTotals {
    pub fn from_summaries<'a, I>(summaries: I) -> Self
    where
        I: IntoIterator<Item = &'a MonthlyCostSummary>,
    {
        summaries.into_iter().fold(Self::default(), |mut totals, s| {
            totals.std_total_collection += s.std_total_collection;
            totals.teacher_collection += s.teacher_collection();
            totals.total_cost += s.total_cost;
            totals.total_meals_served += s.total_meals_served;
            totals.guest_taka += s.guest_taka;
            totals.others += s.others;
            totals.shopping += shopping_total(s);
            totals
        })
    }

    /// `(label, value)` pairs in display order, labels as in [`summary_rows`]
    pub fn rows(&self) -> [(&'static str, f64); 7] {
        [
            ("Std Total Collection", self.std_total_collection),
            ("Teacher Collection", self.teacher_collection),
            ("Total Cost", self.total_cost),
            ("Total Meals Served", self.total_meals_served),
            ("Guest Taka", self.guest_taka),
            ("Others", self.others),
            ("Shopping", self.shopping),
        ]
    }
}
