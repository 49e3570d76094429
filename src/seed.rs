//! Mock tables the dashboard starts from until a real backend is wired in.

use crate::models::{
    AttendanceEntry, AttendanceRow, AttendanceStatus, CaptureChannel, Employee, EmployeeId, EmployeeStatus, Shift,
    TimeOfDay,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

pub const DEPARTMENTS: [&str; 5] = ["Engineering", "Marketing", "HR", "Finance", "Operations"];
pub const ENTRY_STATUSES: [AttendanceStatus; 3] =
    [AttendanceStatus::Present, AttendanceStatus::Absent, AttendanceStatus::Late];

static EMPLOYEES: Lazy<Vec<Employee>> = Lazy::new(|| {
    vec![
        employee(1, "Alice Johnson", "Engineering", "Frontend Dev", EmployeeStatus::Active, (2023, 2, 14)),
        employee(2, "Bob Smith", "HR", "Recruiter", EmployeeStatus::Active, (2022, 7, 1)),
        employee(3, "Carla Gomez", "Finance", "Accountant", EmployeeStatus::OnLeave, (2021, 11, 22)),
        employee(4, "Daniel Lee", "Engineering", "Backend Dev", EmployeeStatus::Inactive, (2019, 5, 3)),
    ]
});

static ATTENDANCE_ROWS: Lazy<Vec<AttendanceRow>> = Lazy::new(|| {
    vec![
        row(
            "E-1001",
            "EMP Contact",
            CaptureChannel::Web,
            Shift::Evening,
            ("01:00", "02:00"),
            AttendanceStatus::WeeklyOff,
            "HR",
        ),
        row(
            "E-1002",
            "EMP Monthly",
            CaptureChannel::Web,
            Shift::Night,
            ("01:00", "02:00"),
            AttendanceStatus::Absent,
            "Finance",
        ),
        row(
            "E-1003",
            "John Smith",
            CaptureChannel::Mobile,
            Shift::Day,
            ("09:00", "17:00"),
            AttendanceStatus::Present,
            "Engineering",
        ),
        row(
            "E-1004",
            "Sarah Johnson",
            CaptureChannel::Web,
            Shift::Day,
            ("09:30", "17:30"),
            AttendanceStatus::Present,
            "Marketing",
        ),
        row(
            "E-1005",
            "Robert Davis",
            CaptureChannel::Biometric,
            Shift::Evening,
            ("14:00", "22:00"),
            AttendanceStatus::Present,
            "Operations",
        ),
    ]
});

static ATTENDANCE_ENTRIES: Lazy<Vec<AttendanceEntry>> = Lazy::new(|| {
    use AttendanceStatus::{Absent, Late, Present};
    vec![
        entry(1, "John Doe", "Engineering", Present, Some(("09:00", "18:00"))),
        entry(2, "Jane Smith", "Marketing", Late, Some(("09:30", "18:15"))),
        entry(3, "Mike Johnson", "HR", Absent, None),
        entry(4, "Sarah Williams", "Engineering", Present, Some(("08:50", "17:45"))),
        entry(5, "David Brown", "Marketing", Present, Some(("08:55", "18:05"))),
        entry(6, "Emily Davis", "HR", Present, Some(("09:05", "18:00"))),
        entry(7, "Michael Wilson", "Engineering", Late, Some(("09:45", "18:30"))),
        entry(8, "Jessica Moore", "Marketing", Absent, None),
        entry(9, "Daniel Taylor", "Engineering", Present, Some(("08:45", "17:30"))),
        entry(10, "Olivia Anderson", "HR", Present, Some(("09:00", "18:00"))),
    ]
});

pub fn employees() -> Vec<Employee> {
    EMPLOYEES.clone()
}

pub fn attendance_rows() -> Vec<AttendanceRow> {
    ATTENDANCE_ROWS.clone()
}

pub fn attendance_entries() -> Vec<AttendanceEntry> {
    ATTENDANCE_ENTRIES.clone()
}

pub fn seed_date() -> NaiveDate {
    date((2025, 9, 16))
}

fn date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn time(value: &str) -> TimeOfDay {
    value.parse().expect("valid seed time")
}

fn employee(
    id: u64,
    name: &str,
    department: &str,
    role: &str,
    status: EmployeeStatus,
    joined: (i32, u32, u32),
) -> Employee {
    Employee {
        id: EmployeeId(id),
        name: name.to_string(),
        department: department.to_string(),
        role: role.to_string(),
        status,
        joined: date(joined),
    }
}

fn row(
    id: &str,
    name: &str,
    channel: CaptureChannel,
    shift: Shift,
    (in_time, out_time): (&str, &str),
    status: AttendanceStatus,
    department: &str,
) -> AttendanceRow {
    AttendanceRow {
        id: id.to_string(),
        name: name.to_string(),
        attendance_by: Some(channel),
        shift,
        in_time: Some(time(in_time)),
        out_time: Some(time(out_time)),
        status,
        department: Some(department.to_string()),
    }
}

fn entry(
    id: u32,
    name: &str,
    department: &str,
    status: AttendanceStatus,
    times: Option<(&str, &str)>,
) -> AttendanceEntry {
    AttendanceEntry {
        id,
        name: name.to_string(),
        department: department.to_string(),
        date: seed_date(),
        status,
        time_in: times.map(|(time_in, _)| time(time_in)),
        time_out: times.map(|(_, time_out)| time(time_out)),
    }
}
