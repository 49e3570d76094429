pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod editor;
pub mod errors;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod record;
pub mod report;
pub mod screens;
pub mod seed;
pub mod service;
pub mod settings;
pub mod store;
pub mod view;

pub use crate::config::DashboardConfig;
pub use crate::dashboard::Dashboard;
pub use crate::debounce::Debouncer;
pub use crate::editor::RowEditor;
pub use crate::errors::{AppError, AppResult};
pub use crate::filter::{Criteria, FilterEngine};
pub use crate::logging::init_tracing;
pub use crate::pagination::{page_labels, paginate, Page, PageLabel, Pager};
pub use crate::record::{Patch, Record};
pub use crate::screens::{EmployeesScreen, RegisterScreen, ScreenEvent};
pub use crate::service::{AttendanceService, MockAttendanceService, ServiceLatency};
pub use crate::settings::{Settings, SettingsForm};
pub use crate::store::EmployeeStore;
pub use crate::view::{ViewConfig, ViewController};
