use crate::errors::{AppError, AppResult};
use crate::record::{Patch, Record};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DEPARTMENT: &str = "department";
    pub const ROLE: &str = "role";
    pub const STATUS: &str = "status";
    pub const JOINED: &str = "joined";
    pub const ATTENDANCE_BY: &str = "attendanceBy";
    pub const SHIFT: &str = "shift";
    pub const IN_TIME: &str = "inTime";
    pub const OUT_TIME: &str = "outTime";
    pub const DATE: &str = "date";
    pub const TIME_IN: &str = "timeIn";
    pub const TIME_OUT: &str = "timeOut";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock time without a date, exchanged as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn on_the_hour(hour: u32) -> Self {
        Self(NaiveTime::from_hms_opt(hour % 24, 0, 0).unwrap_or_default())
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| AppError::Validation(format!("Invalid time '{}': expected HH:MM", value)))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    #[serde(rename = "Weekly Off")]
    WeeklyOff,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 5] = [
        Self::Present,
        Self::Absent,
        Self::Late,
        Self::WeeklyOff,
        Self::OnLeave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::WeeklyOff => "Weekly Off",
            Self::OnLeave => "On Leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AppError::Validation(format!("Unknown attendance status '{}'", value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnLeave => "On Leave",
            Self::Inactive => "Inactive",
        }
    }

    /// Status a register row starts with for an employee in this state.
    pub fn register_status(self) -> AttendanceStatus {
        match self {
            Self::Active => AttendanceStatus::Present,
            Self::OnLeave => AttendanceStatus::OnLeave,
            Self::Inactive => AttendanceStatus::Absent,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Day,
    Evening,
    Night,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

/// How an attendance mark was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureChannel {
    Web,
    Mobile,
    Biometric,
}

impl CaptureChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Mobile => "Mobile",
            Self::Biometric => "Biometric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub role: String,
    pub status: EmployeeStatus,
    pub joined: NaiveDate,
}

impl Record for Employee {
    type Key = EmployeeId;

    fn key(&self) -> &EmployeeId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            fields::ID => Some(Cow::Owned(self.id.to_string())),
            fields::NAME => Some(Cow::Borrowed(self.name.as_str())),
            fields::DEPARTMENT => Some(Cow::Borrowed(self.department.as_str())),
            fields::ROLE => Some(Cow::Borrowed(self.role.as_str())),
            fields::STATUS => Some(Cow::Borrowed(self.status.as_str())),
            fields::JOINED => Some(Cow::Owned(self.joined.format(DATE_FORMAT).to_string())),
            _ => None,
        }
    }
}

/// Add/edit form contents for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    pub name: String,
    pub department: String,
    pub role: String,
    pub status: EmployeeStatus,
    pub joined: Option<NaiveDate>,
}

impl Default for EmployeeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            department: "Engineering".to_string(),
            role: String::new(),
            status: EmployeeStatus::Active,
            joined: None,
        }
    }
}

impl EmployeeDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(fields::NAME);
        }
        if self.role.trim().is_empty() {
            missing.push(fields::ROLE);
        }
        if self.joined.is_none() {
            missing.push(fields::JOINED);
        }
        missing
    }

    pub fn validate(&self) -> AppResult<NaiveDate> {
        let missing = self.missing_fields();
        match self.joined {
            Some(joined) if missing.is_empty() => Ok(joined),
            _ => Err(AppError::Validation(format!(
                "Missing required employee fields: {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn into_employee(self, id: EmployeeId) -> AppResult<Employee> {
        let joined = self.validate()?;
        Ok(Employee {
            id,
            name: self.name,
            department: self.department,
            role: self.role,
            status: self.status,
            joined,
        })
    }
}

impl Patch<Employee> for EmployeeDraft {
    fn apply_to(&self, record: &Employee) -> Employee {
        Employee {
            id: record.id,
            name: self.name.clone(),
            department: self.department.clone(),
            role: self.role.clone(),
            status: self.status,
            joined: self.joined.unwrap_or(record.joined),
        }
    }
}

/// One line of the daily attendance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRow {
    pub id: String,
    pub name: String,
    pub attendance_by: Option<CaptureChannel>,
    pub shift: Shift,
    pub in_time: Option<TimeOfDay>,
    pub out_time: Option<TimeOfDay>,
    pub status: AttendanceStatus,
    pub department: Option<String>,
}

impl Record for AttendanceRow {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            fields::ID => Some(Cow::Borrowed(self.id.as_str())),
            fields::NAME => Some(Cow::Borrowed(self.name.as_str())),
            fields::ATTENDANCE_BY => self.attendance_by.map(|channel| Cow::Borrowed(channel.as_str())),
            fields::SHIFT => Some(Cow::Borrowed(self.shift.as_str())),
            fields::IN_TIME => self.in_time.map(|time| Cow::Owned(time.to_string())),
            fields::OUT_TIME => self.out_time.map(|time| Cow::Owned(time.to_string())),
            fields::STATUS => Some(Cow::Borrowed(self.status.as_str())),
            fields::DEPARTMENT => self.department.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

/// Editable line of the update-register screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRow {
    pub id: String,
    pub name: String,
    pub in_time: TimeOfDay,
    pub out_time: TimeOfDay,
    pub status: AttendanceStatus,
}

impl RegisterRow {
    pub fn register_id(employee_id: EmployeeId) -> String {
        format!("E-{}", employee_id)
    }

    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: Self::register_id(employee.id),
            name: employee.name.clone(),
            in_time: TimeOfDay::on_the_hour(9),
            out_time: TimeOfDay::on_the_hour(17),
            status: employee.status.register_status(),
        }
    }
}

pub fn register_rows(employees: &[Employee]) -> Vec<RegisterRow> {
    employees.iter().map(RegisterRow::from_employee).collect()
}

impl Record for RegisterRow {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            fields::ID => Some(Cow::Borrowed(self.id.as_str())),
            fields::NAME => Some(Cow::Borrowed(self.name.as_str())),
            fields::IN_TIME => Some(Cow::Owned(self.in_time.to_string())),
            fields::OUT_TIME => Some(Cow::Owned(self.out_time.to_string())),
            fields::STATUS => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatch {
    pub in_time: Option<TimeOfDay>,
    pub out_time: Option<TimeOfDay>,
    pub status: Option<AttendanceStatus>,
}

impl RegisterPatch {
    pub fn in_time(time: TimeOfDay) -> Self {
        Self {
            in_time: Some(time),
            ..Self::default()
        }
    }

    pub fn out_time(time: TimeOfDay) -> Self {
        Self {
            out_time: Some(time),
            ..Self::default()
        }
    }

    pub fn status(status: AttendanceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Patch<RegisterRow> for RegisterPatch {
    fn apply_to(&self, record: &RegisterRow) -> RegisterRow {
        RegisterRow {
            id: record.id.clone(),
            name: record.name.clone(),
            in_time: self.in_time.unwrap_or(record.in_time),
            out_time: self.out_time.unwrap_or(record.out_time),
            status: self.status.unwrap_or(record.status),
        }
    }
}

/// Row of the attendance table served by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub id: u32,
    pub name: String,
    pub department: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub time_in: Option<TimeOfDay>,
    pub time_out: Option<TimeOfDay>,
}

impl Record for AttendanceEntry {
    type Key = u32;

    fn key(&self) -> &u32 {
        &self.id
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            fields::ID => Some(Cow::Owned(self.id.to_string())),
            fields::NAME => Some(Cow::Borrowed(self.name.as_str())),
            fields::DEPARTMENT => Some(Cow::Borrowed(self.department.as_str())),
            fields::DATE => Some(Cow::Owned(self.date.format(DATE_FORMAT).to_string())),
            fields::STATUS => Some(Cow::Borrowed(self.status.as_str())),
            fields::TIME_IN => self.time_in.map(|time| Cow::Owned(time.to_string())),
            fields::TIME_OUT => self.time_out.map(|time| Cow::Owned(time.to_string())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryPatch {
    pub name: Option<String>,
    pub department: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    pub time_in: Option<TimeOfDay>,
    pub time_out: Option<TimeOfDay>,
}

impl Patch<AttendanceEntry> for AttendanceEntryPatch {
    fn apply_to(&self, record: &AttendanceEntry) -> AttendanceEntry {
        AttendanceEntry {
            id: record.id,
            name: self.name.clone().unwrap_or_else(|| record.name.clone()),
            department: self
                .department
                .clone()
                .unwrap_or_else(|| record.department.clone()),
            date: self.date.unwrap_or(record.date),
            status: self.status.unwrap_or(record.status),
            time_in: self.time_in.or(record.time_in),
            time_out: self.time_out.or(record.time_out),
        }
    }
}

/// Filters accepted by the attendance data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceFilters {
    pub department: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> UpdateResult<T> {
    pub fn updated(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::{
        fields, AttendanceStatus, Employee, EmployeeDraft, EmployeeId, EmployeeStatus, RegisterPatch, RegisterRow,
        TimeOfDay,
    };
    use crate::errors::AppError;
    use crate::record::{Patch, Record};
    use chrono::NaiveDate;

    fn carla() -> Employee {
        Employee {
            id: EmployeeId(3),
            name: "Carla Gomez".to_string(),
            department: "Finance".to_string(),
            role: "Accountant".to_string(),
            status: EmployeeStatus::OnLeave,
            joined: NaiveDate::from_ymd_opt(2021, 11, 22).expect("date"),
        }
    }

    #[test]
    fn time_of_day_round_trips_through_json() {
        let time: TimeOfDay = "09:30".parse().expect("time");
        assert_eq!(time.to_string(), "09:30");
        assert_eq!(serde_json::to_string(&time).expect("json"), "\"09:30\"");
        assert!("9.30".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn status_labels_match_display_text() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::WeeklyOff).expect("json"),
            "\"Weekly Off\""
        );
        assert_eq!("on leave".parse::<AttendanceStatus>().expect("status"), AttendanceStatus::OnLeave);
    }

    #[test]
    fn register_row_derives_from_employee_status() {
        let row = RegisterRow::from_employee(&carla());
        assert_eq!(row.id, "E-3");
        assert_eq!(row.in_time.to_string(), "09:00");
        assert_eq!(row.out_time.to_string(), "17:00");
        assert_eq!(row.status, AttendanceStatus::OnLeave);
    }

    #[test]
    fn register_patch_keeps_untouched_fields() {
        let row = RegisterRow::from_employee(&carla());
        let patched = RegisterPatch::in_time(TimeOfDay::new(8, 15).expect("time")).apply_to(&row);
        assert_eq!(patched.in_time.to_string(), "08:15");
        assert_eq!(patched.out_time, row.out_time);
        assert_eq!(patched.status, row.status);
    }

    #[test]
    fn draft_lists_every_missing_field() {
        let draft = EmployeeDraft::default();
        assert_eq!(draft.missing_fields(), vec![fields::NAME, fields::ROLE, fields::JOINED]);
        let err = draft.into_employee(EmployeeId(9)).expect_err("incomplete draft");
        assert!(matches!(err, AppError::Validation(message) if message.contains("name, role, joined")));
    }

    #[test]
    fn employee_fields_are_readable_by_name() {
        let employee = carla();
        assert_eq!(employee.field(fields::STATUS).as_deref(), Some("On Leave"));
        assert_eq!(employee.field(fields::JOINED).as_deref(), Some("2021-11-22"));
        assert_eq!(employee.field("salary"), None);
    }
}
