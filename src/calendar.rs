//! Calendar navigator for the archive.
//!
//! One table per month that has archive pages, grouped by year. Weeks start
//! on Monday; days with a page link to it and today's cell is highlighted:
//!
//! ```text
//! 2021
//! ┌──────────── March ────────────┐
//! │ Mo  Tu  We  Th  Fr  Sa  Su    │
//! │  1   2   3   4   5   6   7    │
//! │  8   9  10  11  12 [13] 14    │  [13] → 2021-03-13.html
//! │ ...                           │
//! └───────────────────────────────┘
//! ```
//!
//! Column classes follow the page stylesheet: `workday` for Monday to
//! Saturday, `weekend` for Sunday.

use crate::config::LocaleConfig;
use crate::naming::archive_page_name;
use chrono::{Datelike, NaiveDate};
use maud::{Markup, html};
use std::collections::{BTreeMap, BTreeSet};

/// One calendar row, Monday first. `None` pads days outside the month.
pub type Week = [Option<u32>; 7];

/// Weeks of a month, Monday first, padded to full weeks.
///
/// Returns an empty grid for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<Week> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(days) = days_in_month(first) else {
        return Vec::new();
    };

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Option<u32>> = vec![None; offset];
    cells.extend((1..=days).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells
        .chunks(7)
        .map(|chunk| {
            let mut week: Week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect()
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

fn column_class(column: usize) -> &'static str {
    if column < 6 { "workday" } else { "weekend" }
}

/// Render the calendars for all archive dates.
pub fn render_calendar(dates: &BTreeSet<NaiveDate>, today: NaiveDate, locale: &LocaleConfig) -> Markup {
    let mut by_year: BTreeMap<i32, BTreeSet<u32>> = BTreeMap::new();
    for date in dates {
        by_year.entry(date.year()).or_default().insert(date.month());
    }

    html! {
        @for (year, months) in &by_year {
            h2 { (year) }
            div.container-year {
                @for month in months {
                    (render_month(*year, *month, dates, today, locale))
                }
            }
        }
    }
}

fn render_month(
    year: i32,
    month: u32,
    dates: &BTreeSet<NaiveDate>,
    today: NaiveDate,
    locale: &LocaleConfig,
) -> Markup {
    html! {
        div.month {
            h3 { (locale.month_name(month)) }
            table.calendar {
                thead {
                    tr.names {
                        @for (column, label) in locale.weekday_names.iter().enumerate() {
                            th class=(column_class(column)) { (label) }
                        }
                    }
                }
                tbody {
                    @for week in month_grid(year, month) {
                        tr {
                            @for (column, cell) in week.iter().enumerate() {
                                td class=(column_class(column)) {
                                    @if let Some(day) = cell {
                                        (render_day(year, month, *day, dates, today))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_day(year: i32, month: u32, day: u32, dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> Markup {
    let date = NaiveDate::from_ymd_opt(year, month, day);
    let content = match date.filter(|d| dates.contains(d)) {
        Some(d) => html! { a href=(archive_page_name(d)) { (day) } },
        None => html! { (day) },
    };

    html! {
        @if date == Some(today) {
            div.today { (content) }
        } @else {
            (content)
        }
    }
}
