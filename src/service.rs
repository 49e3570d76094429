use crate::config::DashboardConfig;
use crate::errors::{AppError, AppResult};
use crate::filter::{Criteria, FilterEngine};
use crate::models::{
    fields, AttendanceEntry, AttendanceEntryPatch, AttendanceFilters, AttendanceStatus, FetchResponse, PaginationInfo,
    RegisterRow, UpdateResult,
};
use crate::pagination::paginate;
use crate::record::Patch;
use crate::seed;
use crate::settings::Settings;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;

pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend the dashboard reads from and commits to. Filtering and paging
/// follow the same rules as the in-process [`FilterEngine`] and
/// [`paginate`] so client and server pages agree.
pub trait AttendanceService: Send + Sync {
    fn fetch_attendance(
        &self,
        filters: AttendanceFilters,
        page: usize,
        page_size: usize,
    ) -> ServiceFuture<'_, AppResult<FetchResponse<AttendanceEntry>>>;

    /// Resolves with `success: false` for unknown ids rather than failing.
    fn update_attendance(
        &self,
        id: u32,
        patch: AttendanceEntryPatch,
    ) -> ServiceFuture<'_, UpdateResult<AttendanceEntry>>;

    fn attendance_entries(&self) -> ServiceFuture<'_, Vec<AttendanceEntry>>;

    fn save_register(&self, rows: Arc<Vec<RegisterRow>>) -> ServiceFuture<'_, AppResult<()>>;

    fn save_settings(&self, settings: Settings) -> ServiceFuture<'_, AppResult<Settings>>;

    fn departments(&self) -> Vec<String>;

    fn statuses(&self) -> Vec<AttendanceStatus>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLatency {
    pub fetch: Duration,
    pub register_save: Duration,
    pub settings_save: Duration,
}

impl ServiceLatency {
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            register_save: Duration::ZERO,
            settings_save: Duration::ZERO,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            fetch: Duration::from_millis(config.fetch_latency_ms),
            register_save: Duration::from_millis(config.register_save_latency_ms),
            settings_save: Duration::from_millis(config.settings_save_latency_ms),
        }
    }
}

/// In-memory stand-in for the attendance backend, with simulated latency.
pub struct MockAttendanceService {
    entries: Mutex<Vec<AttendanceEntry>>,
    register: Mutex<Option<Arc<Vec<RegisterRow>>>>,
    settings: Mutex<Settings>,
    latency: ServiceLatency,
    engine: FilterEngine,
}

impl MockAttendanceService {
    pub fn new(entries: Vec<AttendanceEntry>, latency: ServiceLatency) -> Self {
        Self {
            entries: Mutex::new(entries),
            register: Mutex::new(None),
            settings: Mutex::new(Settings::default()),
            latency,
            engine: FilterEngine::default(),
        }
    }

    pub fn seeded(latency: ServiceLatency) -> Self {
        Self::new(seed::attendance_entries(), latency)
    }

    pub async fn last_saved_register(&self) -> Option<Arc<Vec<RegisterRow>>> {
        self.register.lock().await.clone()
    }

    pub async fn current_settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    async fn simulate(&self, latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

fn filters_to_criteria(filters: &AttendanceFilters) -> Criteria {
    let mut criteria = Criteria::new();
    criteria.set_equals(fields::DEPARTMENT, filters.department.as_deref());
    let date = filters.date.map(|date| date.format("%Y-%m-%d").to_string());
    criteria.set_equals(fields::DATE, date.as_deref());
    criteria.set_equals(fields::STATUS, filters.status.map(AttendanceStatus::as_str));
    criteria
}

impl AttendanceService for MockAttendanceService {
    fn fetch_attendance(
        &self,
        filters: AttendanceFilters,
        page: usize,
        page_size: usize,
    ) -> ServiceFuture<'_, AppResult<FetchResponse<AttendanceEntry>>> {
        Box::pin(async move {
            if page_size == 0 {
                return Err(AppError::Validation("pageSize must be positive".to_string()));
            }
            let criteria = filters_to_criteria(&filters);
            let result = {
                let entries = self.entries.lock().await;
                let matched = self.engine.apply(&entries, &criteria);
                paginate(&matched, page, page_size)
            };
            self.simulate(self.latency.fetch).await;
            tracing::debug!(page, page_size, total = result.total_records, "attendance fetched");

            Ok(FetchResponse {
                data: result.items,
                pagination: PaginationInfo {
                    page,
                    page_size,
                    total_items: result.total_records,
                    total_pages: result.total_pages,
                },
            })
        })
    }

    fn update_attendance(
        &self,
        id: u32,
        patch: AttendanceEntryPatch,
    ) -> ServiceFuture<'_, UpdateResult<AttendanceEntry>> {
        Box::pin(async move {
            let updated = {
                let mut entries = self.entries.lock().await;
                entries.iter_mut().find(|entry| entry.id == id).map(|entry| {
                    *entry = patch.apply_to(entry);
                    entry.clone()
                })
            };
            self.simulate(self.latency.fetch).await;

            match updated {
                Some(entry) => {
                    tracing::info!(record_id = id, "attendance entry updated");
                    UpdateResult::updated(entry)
                }
                None => {
                    tracing::warn!(record_id = id, "attendance entry not found");
                    UpdateResult::failed("Record not found")
                }
            }
        })
    }

    fn attendance_entries(&self) -> ServiceFuture<'_, Vec<AttendanceEntry>> {
        Box::pin(async move { self.entries.lock().await.clone() })
    }

    fn save_register(&self, rows: Arc<Vec<RegisterRow>>) -> ServiceFuture<'_, AppResult<()>> {
        Box::pin(async move {
            self.simulate(self.latency.register_save).await;
            let count = rows.len();
            *self.register.lock().await = Some(rows);
            tracing::info!(rows = count, "register saved");
            Ok(())
        })
    }

    fn save_settings(&self, settings: Settings) -> ServiceFuture<'_, AppResult<Settings>> {
        Box::pin(async move {
            settings.validate()?;
            self.simulate(self.latency.settings_save).await;
            *self.settings.lock().await = settings.clone();
            tracing::info!(company = %settings.company, "settings saved");
            Ok(settings)
        })
    }

    fn departments(&self) -> Vec<String> {
        seed::DEPARTMENTS.iter().map(|department| department.to_string()).collect()
    }

    fn statuses(&self) -> Vec<AttendanceStatus> {
        seed::ENTRY_STATUSES.to_vec()
    }
}
