use std::fmt::Write;

use chrono::Datelike;

use crate::models::form::FormErrors;
use crate::models::holiday::Holiday;
use crate::service::calendar::{CalendarDay, MonthGrid};

const WEEKDAY_HEADER: &str = "  Mo  Tu  We  Th  Fr  Sa  Su";

/// Plain-text month grid.
///
/// `[d]` selected, `d-` disabled, `d*` observance, `.` outside the month.
pub fn render_month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^28}", grid.label);
    let _ = writeln!(out, "{}", WEEKDAY_HEADER);
    for week in &grid.weeks {
        let line: String = week.iter().map(render_day).collect();
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let observances: Vec<&Holiday> = grid
        .days()
        .filter(|day| day.in_current_month)
        .filter_map(|day| day.observance.as_ref())
        .collect();
    for holiday in observances {
        let _ = writeln!(out, "* {} {}", holiday.date, holiday.name);
    }
    out
}

fn render_day(day: &CalendarDay) -> String {
    if !day.in_current_month {
        return "   .".to_string();
    }
    let number = day.date.day();
    if day.is_selected {
        format!("{:>4}", format!("[{}]", number))
    } else if day.is_disabled {
        format!("{:>3}-", number)
    } else if day.observance.is_some() {
        format!("{:>3}*", number)
    } else {
        format!("{:>3} ", number)
    }
}

pub fn render_holidays(year: i32, holidays: &[Holiday]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Holidays in {}:", year);
    if holidays.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for holiday in holidays {
        let kind: String = holiday.holiday_type.clone().into();
        let _ = writeln!(out, "  {}  {:<18} {}", holiday.date, kind, holiday.name);
    }
    out
}

pub fn render_errors(errors: &FormErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {}: {}", field, message))
        .collect::<Vec<_>>()
        .join("\n")
}
