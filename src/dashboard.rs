use crate::config::DashboardConfig;
use crate::errors::AppResult;
use crate::export::{export_csv, today_row, TODAY_FILE_NAME, TODAY_HEADERS};
use crate::models::{AttendanceRow, ExportResponse};
use crate::report::{daily_stats, monthly_report, DailyStats, MonthlyReport, YearMonth};
use crate::screens::{daily_attendance_view, EmployeesScreen, RegisterScreen};
use crate::seed;
use crate::service::{AttendanceService, MockAttendanceService, ServiceLatency};
use crate::settings::{Settings, SettingsForm};
use crate::store::EmployeeStore;
use crate::view::ViewController;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_FILE_NAME: &str = "dashboard.json";

/// Application root: owns the employee store and the data source and hands
/// out the individual screens.
pub struct Dashboard {
    config: DashboardConfig,
    employees: EmployeeStore,
    service: Arc<dyn AttendanceService>,
    settings: Settings,
    export_dir: PathBuf,
}

impl Dashboard {
    pub fn new(app_data_dir: &Path, config: DashboardConfig) -> AppResult<Self> {
        config.validate()?;
        let service = Arc::new(MockAttendanceService::seeded(ServiceLatency::from_config(&config)));
        let export_dir = config
            .export_dir
            .clone()
            .unwrap_or_else(|| app_data_dir.join("exports"));
        tracing::info!(export_dir = %export_dir.display(), "dashboard initialized");

        Ok(Self {
            config,
            employees: EmployeeStore::seeded(),
            service,
            settings: Settings::default(),
            export_dir,
        })
    }

    /// Loads `dashboard.json` from `app_data_dir` when present.
    pub fn open(app_data_dir: &Path) -> AppResult<Self> {
        let config = DashboardConfig::load(&app_data_dir.join(CONFIG_FILE_NAME))?;
        Self::new(app_data_dir, config)
    }

    pub fn with_service(mut self, service: Arc<dyn AttendanceService>) -> Self {
        self.service = service;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn employees(&self) -> &EmployeeStore {
        &self.employees
    }

    pub fn employees_mut(&mut self) -> &mut EmployeeStore {
        &mut self.employees
    }

    pub fn service(&self) -> Arc<dyn AttendanceService> {
        Arc::clone(&self.service)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn employees_screen(&self) -> EmployeesScreen {
        EmployeesScreen::new(&self.employees, &self.config)
    }

    pub fn register_screen(&self) -> RegisterScreen {
        RegisterScreen::new(&self.employees.snapshot(), self.service(), &self.config)
    }

    pub fn daily_attendance(&self) -> ViewController<AttendanceRow> {
        daily_attendance_view(seed::attendance_rows(), &self.config)
    }

    pub async fn monthly_report(&self, month: YearMonth) -> MonthlyReport {
        let entries = self.service.attendance_entries().await;
        monthly_report(&entries, month)
    }

    pub async fn daily_stats(&self, date: NaiveDate) -> DailyStats {
        let entries = self.service.attendance_entries().await;
        daily_stats(&entries, date, self.employees.len())
    }

    /// Exports every row matching the view's current filters, not only the
    /// visible page.
    pub fn export_today(&self, view: &ViewController<AttendanceRow>) -> AppResult<ExportResponse> {
        let rows: Vec<Vec<String>> = view.filtered().iter().map(today_row).collect();
        export_csv(&self.export_dir, TODAY_FILE_NAME, &TODAY_HEADERS, &rows)
    }

    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::new(self.settings.clone(), self.config.saved_indicator())
    }

    pub async fn save_settings(&mut self, form: &mut SettingsForm) -> AppResult<Settings> {
        let saved = form.submit(self.service.as_ref()).await?;
        self.settings = saved.clone();
        Ok(saved)
    }
}
