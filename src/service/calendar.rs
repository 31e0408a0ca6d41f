use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::CalendarError;
use crate::models::holiday::{format_date, Holiday};

pub const SUNDAY_NOTICE: &str = "Training does not take place on sundays";
pub const NATIONAL_HOLIDAY_NOTICE: &str = "Training does not take place on national day";

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub observance: Option<Holiday>,
}

/// Monday-first weeks covering one month. `month0` is 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month0: u32,
    pub label: String,
    pub weeks: Vec<[CalendarDay; 7]>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days().find(|day| day.date == date)
    }
}

pub fn is_disabled(date: NaiveDate, holidays: &[Holiday]) -> bool {
    date.weekday() == Weekday::Sun
        || holidays
            .iter()
            .any(|holiday| holiday.is_national() && holiday.falls_on(date))
}

pub fn observance_for(date: NaiveDate, holidays: &[Holiday]) -> Option<&Holiday> {
    let formatted = format_date(date);
    holidays
        .iter()
        .find(|holiday| holiday.is_observance() && holiday.date == formatted)
}

/// Why `date` cannot be booked, if it cannot.
pub fn blocked_date_reason(date: NaiveDate, holidays: &[Holiday]) -> Option<&'static str> {
    if date.weekday() == Weekday::Sun {
        return Some(SUNDAY_NOTICE);
    }
    if is_disabled(date, holidays) {
        return Some(NATIONAL_HOLIDAY_NOTICE);
    }
    None
}

pub fn month_label(year: i32, month0: u32) -> String {
    match MONTH_NAMES.get(month0 as usize) {
        Some(name) => format!("{} {}", name, year),
        None => format!("{}-{:02}", year, month0 + 1),
    }
}

pub fn build_month_grid(
    year: i32,
    month0: u32,
    holidays: &[Holiday],
    selected: Option<NaiveDate>,
) -> Result<MonthGrid, CalendarError> {
    if month0 > 11 {
        return Err(CalendarError::InvalidMonth(month0));
    }
    let month_start = NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(
        CalendarError::OutOfRange {
            year,
            month: month0 + 1,
            day: 1,
        },
    )?;
    let out_of_range = |day: u32| CalendarError::OutOfRange {
        year,
        month: month0 + 1,
        day,
    };
    let month_end = last_day_of_month(month_start).ok_or(out_of_range(31))?;
    let offset = month_start.weekday().num_days_from_monday() as i64;
    let mut current = month_start
        .checked_sub_signed(Duration::days(offset))
        .ok_or(out_of_range(1))?;

    let mut weeks = Vec::new();
    while current <= month_end {
        let mut days = Vec::with_capacity(7);
        for i in 0..7 {
            let date = current
                .checked_add_signed(Duration::days(i))
                .ok_or(out_of_range(month_end.day()))?;
            days.push(CalendarDay {
                date,
                in_current_month: date.year() == year && date.month0() == month0,
                is_selected: selected == Some(date),
                is_disabled: is_disabled(date, holidays),
                observance: observance_for(date, holidays).cloned(),
            });
        }
        let week: [CalendarDay; 7] = days
            .try_into()
            .map_err(|_| out_of_range(current.day()))?;
        weeks.push(week);
        match current.checked_add_signed(Duration::days(7)) {
            Some(next) => current = next,
            None => break,
        }
    }

    Ok(MonthGrid {
        year,
        month0,
        label: month_label(year, month0),
        weeks,
    })
}

fn last_day_of_month(month_start: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

/// Result of clicking an enabled day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSelection {
    pub date: NaiveDate,
    pub observance: Option<Holiday>,
}

/// The month currently shown. Navigation has no bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    pub month0: u32,
}

impl CalendarView {
    pub fn new(selected: NaiveDate) -> Self {
        Self {
            year: selected.year(),
            month0: selected.month0(),
        }
    }

    pub fn change_month(&mut self, delta: i32) {
        let total = self.year as i64 * 12 + self.month0 as i64 + delta as i64;
        self.year = total.div_euclid(12) as i32;
        self.month0 = total.rem_euclid(12) as u32;
    }

    pub fn previous_month(&mut self) {
        self.change_month(-1);
    }

    pub fn next_month(&mut self) {
        self.change_month(1);
    }

    pub fn label(&self) -> String {
        month_label(self.year, self.month0)
    }

    pub fn grid(
        &self,
        holidays: &[Holiday],
        selected: Option<NaiveDate>,
    ) -> Result<MonthGrid, CalendarError> {
        build_month_grid(self.year, self.month0, holidays, selected)
    }

    /// Disabled dates are a no-op and return `None`.
    pub fn select(&self, date: NaiveDate, holidays: &[Holiday]) -> Option<DateSelection> {
        if is_disabled(date, holidays) {
            tracing::debug!(date = %date, "ignoring selection of disabled date");
            return None;
        }
        Some(DateSelection {
            date,
            observance: observance_for(date, holidays).cloned(),
        })
    }

    /// Day number within the shown month.
    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }
}
