use crate::errors::AppError;
use crate::models::{AttendanceEntry, AttendanceStatus};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(move |day| self.contains(*day))
    }

    /// Monday to Friday, holidays not considered.
    pub fn working_days(self) -> u32 {
        let count = self
            .days()
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::Validation(format!("Invalid month '{}', expected YYYY-MM", value));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A share out of 100, shown rounded to a whole number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Percent(pub f64);

impl Percent {
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self(0.0);
        }
        Self(part as f64 * 100.0 / whole as f64)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub working_days: u32,
    pub avg_present: Percent,
    pub avg_late: Percent,
    pub leaves_taken: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBreakdown {
    pub department: String,
    pub present: Percent,
    pub late: Percent,
    pub absent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub summary: MonthlySummary,
    pub departments: Vec<DepartmentBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_employees: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    present: usize,
    late: usize,
    absent: usize,
    leave: usize,
}

impl Tally {
    fn count(&mut self, status: AttendanceStatus) {
        self.total += 1;
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::OnLeave => self.leave += 1,
            AttendanceStatus::WeeklyOff => {}
        }
    }
}

fn in_month<'a>(entries: &'a [AttendanceEntry], month: YearMonth) -> impl Iterator<Item = &'a AttendanceEntry> {
    entries.iter().filter(move |entry| month.contains(entry.date))
}

pub fn monthly_summary(entries: &[AttendanceEntry], month: YearMonth) -> MonthlySummary {
    let mut tally = Tally::default();
    in_month(entries, month).for_each(|entry| tally.count(entry.status));

    MonthlySummary {
        month,
        working_days: month.working_days(),
        avg_present: Percent::of(tally.present, tally.total),
        avg_late: Percent::of(tally.late, tally.total),
        leaves_taken: tally.absent + tally.leave,
    }
}

/// Per-department shares, departments in the order they first appear.
pub fn department_breakdown(entries: &[AttendanceEntry], month: YearMonth) -> Vec<DepartmentBreakdown> {
    let mut tallies: Vec<(String, Tally)> = Vec::new();
    for entry in in_month(entries, month) {
        match tallies.iter_mut().find(|(department, _)| *department == entry.department) {
            Some((_, tally)) => tally.count(entry.status),
            None => {
                let mut tally = Tally::default();
                tally.count(entry.status);
                tallies.push((entry.department.clone(), tally));
            }
        }
    }

    tallies
        .into_iter()
        .map(|(department, tally)| DepartmentBreakdown {
            department,
            present: Percent::of(tally.present, tally.total),
            late: Percent::of(tally.late, tally.total),
            absent: Percent::of(tally.absent, tally.total),
        })
        .collect()
}

pub fn monthly_report(entries: &[AttendanceEntry], month: YearMonth) -> MonthlyReport {
    MonthlyReport {
        summary: monthly_summary(entries, month),
        departments: department_breakdown(entries, month),
    }
}

pub fn daily_stats(entries: &[AttendanceEntry], date: NaiveDate, total_employees: usize) -> DailyStats {
    let mut tally = Tally::default();
    entries
        .iter()
        .filter(|entry| entry.date == date)
        .for_each(|entry| tally.count(entry.status));

    DailyStats {
        date,
        total_employees,
        present: tally.present,
        absent: tally.absent,
        late: tally.late,
    }
}

#[cfg(test)]
mod tests {
    use super::{daily_stats, department_breakdown, monthly_summary, Percent, YearMonth};
    use crate::seed;

    fn september() -> YearMonth {
        "2025-09".parse().expect("valid month")
    }

    #[test]
    fn parses_and_prints_months() {
        assert_eq!(september().to_string(), "2025-09");
        assert_eq!(september().month(), 9);
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("2025/09".parse::<YearMonth>().is_err());
        assert!("25-09".parse::<YearMonth>().is_err());
    }

    #[test]
    fn counts_weekdays_only() {
        assert_eq!(september().working_days(), 22);
        assert_eq!(YearMonth::new(2024, 2).expect("month").working_days(), 21);
    }

    #[test]
    fn summarizes_seeded_month() {
        let summary = monthly_summary(&seed::attendance_entries(), september());
        assert_eq!(summary.avg_present.to_string(), "60%");
        assert_eq!(summary.avg_late.to_string(), "20%");
        assert_eq!(summary.leaves_taken, 2);

        let empty = monthly_summary(&seed::attendance_entries(), YearMonth::new(2025, 10).expect("month"));
        assert_eq!(empty.avg_present, Percent(0.0));
        assert_eq!(empty.leaves_taken, 0);
    }

    #[test]
    fn breaks_down_by_department_in_first_seen_order() {
        let rows = department_breakdown(&seed::attendance_entries(), september());
        let departments: Vec<&str> = rows.iter().map(|row| row.department.as_str()).collect();
        assert_eq!(departments, vec!["Engineering", "Marketing", "HR"]);
        assert_eq!(rows[0].present.to_string(), "75%");
        assert_eq!(rows[0].absent.to_string(), "0%");
        assert_eq!(rows[2].present.to_string(), "67%");
        assert_eq!(rows[2].absent.to_string(), "33%");
    }

    #[test]
    fn daily_stats_count_one_day() {
        let stats = daily_stats(&seed::attendance_entries(), seed::seed_date(), 128);
        assert_eq!((stats.present, stats.absent, stats.late), (6, 2, 2));
        assert_eq!(stats.total_employees, 128);
    }
}
