use crate::models::{DayCounts, Entry, EntryKind, EntryMap, Statistics};

pub fn tally(day: &[Entry]) -> DayCounts {
    let mut counts = DayCounts::default();
    for entry in day {
        counts.increment(entry.kind);
    }
    counts
}

pub fn counts_for_day(entries: &EntryMap, date_key: &str) -> DayCounts {
    entries.get(date_key).map(|day| tally(day)).unwrap_or_default()
}

/// Every key present counts as a logged day, including days saved with
/// all counts at zero.
pub fn compute_statistics(entries: &EntryMap) -> Statistics {
    let total_days = entries.len() as u64;
    let mut days = [0u64; 3];
    let mut totals = [0u64; 3];

    for day in entries.values() {
        let counts = tally(day);
        for (slot, kind) in EntryKind::ALL.into_iter().enumerate() {
            let count = u64::from(counts.get(kind));
            if count > 0 {
                days[slot] += 1;
            }
            totals[slot] = totals[slot].saturating_add(count);
        }
    }

    let [successful_days, accident_days, failed_days] = days;
    let [total_successful, total_accidents, total_failed] = totals;

    Statistics {
        total_days,
        successful_days,
        accident_days,
        failed_days,
        total_successful,
        total_accidents,
        total_failed,
        successful_percentage: percentage(successful_days, total_days),
        accident_percentage: percentage(accident_days, total_days),
        failed_percentage: percentage(failed_days, total_days),
        avg_successful_per_day: per_day(total_successful, total_days),
        avg_accidents_per_day: per_day(total_accidents, total_days),
        avg_failed_per_day: per_day(total_failed, total_days),
    }
}

/// Whole percent, half rounded up.
fn percentage(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (part * 200 + whole) / (whole * 2)
}

/// Per-day average to one decimal place, half rounded up.
fn per_day(total: u64, days: u64) -> f64 {
    if days == 0 {
        return 0.0;
    }
    let tenths = (total * 20 + days) / (days * 2);
    tenths as f64 / 10.0
}
