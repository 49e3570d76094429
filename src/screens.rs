use crate::config::DashboardConfig;
use crate::editor::RowEditor;
use crate::errors::AppResult;
use crate::models::{
    fields, register_rows, AttendanceRow, Employee, EmployeeDraft, EmployeeId, RegisterPatch, RegisterRow,
};
use crate::record::Record;
use crate::service::AttendanceService;
use crate::store::EmployeeStore;
use crate::view::{ViewConfig, ViewController};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const EMPLOYEE_SEARCH_FIELDS: [&str; 3] = [fields::NAME, fields::DEPARTMENT, fields::ROLE];
pub const REGISTER_SEARCH_FIELDS: [&str; 3] = [fields::ID, fields::NAME, fields::STATUS];
pub const DAILY_SEARCH_FIELDS: [&str; 5] = [
    fields::ID,
    fields::NAME,
    fields::ATTENDANCE_BY,
    fields::STATUS,
    fields::DEPARTMENT,
];

pub fn daily_attendance_view(rows: Vec<AttendanceRow>, config: &DashboardConfig) -> ViewController<AttendanceRow> {
    ViewController::new(rows, ViewConfig::from_dashboard(config, &DAILY_SEARCH_FIELDS))
}

/// Counter line above a table, e.g. `Showing 1-10 of 42 records for search: "ann"`.
pub fn results_summary<R: Record>(view: &ViewController<R>) -> String {
    let page = view.page();
    let total = page.total_records;
    let first = if total == 0 { 0 } else { page.start_index + 1 };
    let noun = if total == 1 { "record" } else { "records" };
    let mut summary = format!("Showing {}-{} of {} {}", first, page.end_index, total, noun);
    if let Some(query) = view.active_query() {
        summary.push_str(&format!(" for search: \"{}\"", query));
    }
    summary
}

/// Employee directory table. Mutations go through the store passed in and
/// the view is re-sourced from its new snapshot.
#[derive(Debug)]
pub struct EmployeesScreen {
    view: ViewController<Employee>,
}

impl EmployeesScreen {
    pub fn new(store: &EmployeeStore, config: &DashboardConfig) -> Self {
        Self {
            view: ViewController::new(store.snapshot(), ViewConfig::from_dashboard(config, &EMPLOYEE_SEARCH_FIELDS)),
        }
    }

    pub fn view(&self) -> &ViewController<Employee> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController<Employee> {
        &mut self.view
    }

    pub fn add(&mut self, store: &mut EmployeeStore, draft: EmployeeDraft) -> AppResult<Employee> {
        let employee = store.add(draft)?;
        self.refresh(store);
        Ok(employee)
    }

    pub fn edit(
        &mut self,
        store: &mut EmployeeStore,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> AppResult<Option<Employee>> {
        let updated = store.update(id, draft)?;
        if updated.is_some() {
            self.refresh(store);
        }
        Ok(updated)
    }

    pub fn delete(&mut self, store: &mut EmployeeStore, id: EmployeeId) -> bool {
        let removed = store.remove(id);
        if removed {
            self.refresh(store);
        }
        removed
    }

    pub fn refresh(&mut self, store: &EmployeeStore) {
        self.view.replace_source(store.snapshot());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub save_id: Uuid,
    pub success: bool,
    pub saved_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ScreenEvent {
    SearchApplied { query: String, changed: bool },
    SaveFinished(SaveOutcome),
}

enum Wake {
    Saved(Option<SaveOutcome>),
    Search(Option<String>),
}

/// Editable register of today's in/out times, committed as one batch.
pub struct RegisterScreen {
    view: ViewController<RegisterRow>,
    editor: RowEditor<RegisterRow>,
    service: Arc<dyn AttendanceService>,
    save_tx: mpsc::UnboundedSender<SaveOutcome>,
    save_rx: mpsc::UnboundedReceiver<SaveOutcome>,
}

impl RegisterScreen {
    pub fn new(employees: &[Employee], service: Arc<dyn AttendanceService>, config: &DashboardConfig) -> Self {
        let editor = RowEditor::new(register_rows(employees));
        let view = ViewController::new(editor.rows(), ViewConfig::from_dashboard(config, &REGISTER_SEARCH_FIELDS));
        let (save_tx, save_rx) = mpsc::unbounded_channel();
        Self {
            view,
            editor,
            service,
            save_tx,
            save_rx,
        }
    }

    pub fn view(&self) -> &ViewController<RegisterRow> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController<RegisterRow> {
        &mut self.view
    }

    pub fn rows(&self) -> Arc<Vec<RegisterRow>> {
        self.editor.rows()
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.editor.is_saving()
    }

    pub fn saves_in_flight(&self) -> usize {
        self.editor.saves_in_flight()
    }

    pub fn update_row(&mut self, id: &str, patch: RegisterPatch) -> bool {
        if !self.editor.patch(&id.to_string(), &patch) {
            return false;
        }
        self.view.replace_source(self.editor.rows());
        true
    }

    /// Discards unsaved edits and re-derives the rows from `employees`.
    pub fn reset(&mut self, employees: &[Employee]) {
        self.editor.reset(register_rows(employees));
        self.view.replace_source(self.editor.rows());
    }

    /// Starts committing the current rows. Returns `None` without doing
    /// anything when there is nothing unsaved. Must be called inside a Tokio
    /// runtime; the outcome arrives through [`RegisterScreen::next_event`].
    pub fn save(&mut self) -> Option<Uuid> {
        if !self.editor.is_dirty() {
            tracing::debug!("register save skipped, nothing changed");
            return None;
        }
        let rows = self.editor.begin_save();
        let save_id = Uuid::new_v4();
        let service = Arc::clone(&self.service);
        let tx = self.save_tx.clone();
        tracing::info!(%save_id, rows = rows.len(), "register save started");

        tokio::spawn(async move {
            let saved_rows = rows.len();
            let result = service.save_register(rows).await;
            let outcome = SaveOutcome {
                save_id,
                success: result.is_ok(),
                saved_rows,
                error: result.err().map(|err| err.to_string()),
            };
            let _ = tx.send(outcome);
        });
        Some(save_id)
    }

    /// Waits for the next thing the screen reacts to: a settled search or a
    /// finished save. Returns `None` when neither is outstanding.
    pub async fn next_event(&mut self) -> Option<ScreenEvent> {
        loop {
            let saving = self.editor.is_saving();
            let searching = self.view.is_search_pending();
            let wake = tokio::select! {
                outcome = self.save_rx.recv(), if saving => Wake::Saved(outcome),
                query = self.view.next_search(), if searching => Wake::Search(query),
                else => return None,
            };

            match wake {
                Wake::Saved(Some(outcome)) => {
                    self.editor.finish_save(outcome.success);
                    if outcome.success {
                        tracing::info!(save_id = %outcome.save_id, "register saved");
                    } else {
                        tracing::warn!(save_id = %outcome.save_id, error = ?outcome.error, "register save failed");
                    }
                    return Some(ScreenEvent::SaveFinished(outcome));
                }
                Wake::Saved(None) => return None,
                Wake::Search(Some(query)) => {
                    let changed = self.view.apply_search(&query);
                    return Some(ScreenEvent::SearchApplied { query, changed });
                }
                Wake::Search(None) => {}
            }
        }
    }
}
