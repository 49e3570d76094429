use crate::config::merge_json;
use crate::errors::{AppError, AppResult};
use crate::models::TimeOfDay;
use crate::service::AttendanceService;
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timezone {
    #[serde(rename = "UTC")]
    Utc,
    #[serde(rename = "GMT")]
    Gmt,
    #[serde(rename = "EST")]
    Est,
    #[serde(rename = "CST")]
    Cst,
    #[serde(rename = "PST")]
    Pst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekStart {
    Sunday,
    Monday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub company: String,
    pub timezone: Timezone,
    pub work_start: TimeOfDay,
    pub work_end: TimeOfDay,
    pub week_starts_on: WeekStart,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company: "Acme Solutions".to_string(),
            timezone: Timezone::Utc,
            work_start: TimeOfDay::on_the_hour(9),
            work_end: TimeOfDay::new(17, 30).unwrap_or_else(|| TimeOfDay::on_the_hour(17)),
            week_starts_on: WeekStart::Monday,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> AppResult<()> {
        if self.company.trim().is_empty() {
            return Err(AppError::Validation("Company name is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitState {
    Idle,
    Saving,
    Saved,
}

/// Settings page form: local edits, then a simulated save and a transient
/// "saved" indicator.
#[derive(Debug)]
pub struct SettingsForm {
    form: Settings,
    state: SubmitState,
    saved_at: Option<Instant>,
    saved_indicator: Duration,
}

impl SettingsForm {
    pub fn new(current: Settings, saved_indicator: Duration) -> Self {
        Self {
            form: current,
            state: SubmitState::Idle,
            saved_at: None,
            saved_indicator,
        }
    }

    pub fn form(&self) -> &Settings {
        &self.form
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Deep-merges a partial camelCase JSON object into the form. The form is
    /// left untouched if the result does not deserialize.
    pub fn apply_update(&mut self, update: serde_json::Value) -> AppResult<()> {
        let mut merged = serde_json::to_value(&self.form)?;
        merge_json(&mut merged, update);
        self.form = serde_json::from_value(merged)?;
        Ok(())
    }

    pub async fn submit(&mut self, service: &dyn AttendanceService) -> AppResult<Settings> {
        self.form.validate()?;
        self.state = SubmitState::Saving;
        self.saved_at = None;

        match service.save_settings(self.form.clone()).await {
            Ok(saved) => {
                self.form = saved.clone();
                self.state = SubmitState::Saved;
                self.saved_at = Some(Instant::now());
                Ok(saved)
            }
            Err(error) => {
                tracing::warn!(%error, "settings save failed");
                self.state = SubmitState::Idle;
                Err(error)
            }
        }
    }

    /// Whether the "saved" indicator is still showing.
    pub fn saved_visible(&self) -> bool {
        match (self.state, self.saved_at) {
            (SubmitState::Saved, Some(saved_at)) => saved_at.elapsed() < self.saved_indicator,
            _ => false,
        }
    }
}
