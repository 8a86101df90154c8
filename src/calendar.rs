use crate::models::{CalendarMark, DayCounts, Dot, EntryKind, EntryMap};
use crate::stats::tally;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

pub const SELECTED_COLOR: &str = "#667eea";

pub fn dot_color(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Normal => "#48bb78",
        EntryKind::Accident => "#8B4513",
        EntryKind::Failed => "#e53e3e",
    }
}

fn dot_prefix(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Normal => "poop",
        EntryKind::Accident => "accident",
        EntryKind::Failed => "failed",
    }
}

/// Marks for every day with at least one entry, plus the selected day.
pub fn derive_calendar_marks(entries: &EntryMap, selected: &str) -> BTreeMap<String, CalendarMark> {
    let mut marks = BTreeMap::new();
    marks.insert(
        selected.to_string(),
        CalendarMark {
            selected: true,
            selected_color: Some(SELECTED_COLOR),
            ..CalendarMark::default()
        },
    );

    for (date, day) in entries {
        let counts = tally(day);
        if counts.total() == 0 {
            continue;
        }
        let mark = marks.entry(date.clone()).or_default();
        mark.marked = true;
        mark.dots = dots_for(counts);
    }

    marks
}

fn dots_for(counts: DayCounts) -> Vec<Dot> {
    EntryKind::ALL
        .into_iter()
        .flat_map(|kind| {
            (0..counts.get(kind)).map(move |index| Dot {
                key: format!("{}-{index}", dot_prefix(kind)),
                color: dot_color(kind),
            })
        })
        .collect()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Accepts only canonical, zero-padded `YYYY-MM-DD` keys.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| date_key(*date) == value)
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    parse_date_key(&format!("{value}-01"))
}

pub fn month_label(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}

/// Weeks of the month containing `date`, Sunday first. Slots outside the
/// month are `None`.
pub fn month_grid(date: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let first = date.with_day(1).unwrap_or(date);
    let mut weeks = Vec::with_capacity(6);
    let mut week = [None; 7];
    let mut slot = first.weekday().num_days_from_sunday() as usize;
    let mut current = Some(first);

    while let Some(day) = current.filter(|day| day.month() == first.month()) {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
        current = day.succ_opt();
    }
    if slot > 0 {
        weeks.push(week);
    }

    weeks
}
