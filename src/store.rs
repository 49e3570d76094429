use crate::editor;
use crate::errors::{AppError, AppResult};
use crate::models::{fields, Employee, EmployeeDraft, EmployeeId};
use crate::seed;
use std::sync::Arc;
use tracing::info;

/// Mints an id from the wall clock, bumped past every existing id.
pub fn mint_employee_id(existing: &[Employee], now_millis: i64) -> EmployeeId {
    let candidate = u64::try_from(now_millis).unwrap_or(0);
    let floor = existing
        .iter()
        .map(|employee| employee.id.0)
        .max()
        .map(|max| max.saturating_add(1))
        .unwrap_or(0);
    EmployeeId(candidate.max(floor))
}

/// The one owned employee collection. Every mutation swaps in a new
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct EmployeeStore {
    employees: Arc<Vec<Employee>>,
}

impl EmployeeStore {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees: Arc::new(employees),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::employees())
    }

    pub fn snapshot(&self) -> Arc<Vec<Employee>> {
        Arc::clone(&self.employees)
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn add(&mut self, draft: EmployeeDraft) -> AppResult<Employee> {
        self.add_at(draft, chrono::Utc::now().timestamp_millis())
    }

    pub(crate) fn add_at(&mut self, draft: EmployeeDraft, now_millis: i64) -> AppResult<Employee> {
        let id = mint_employee_id(&self.employees, now_millis);
        let employee = draft.into_employee(id)?;
        self.employees = Arc::new(editor::add(&self.employees, employee.clone()));
        info!(employee_id = %employee.id, name = %employee.name, "employee added");
        Ok(employee)
    }

    /// Returns `Ok(None)` when no employee has `id`.
    pub fn update(&mut self, id: EmployeeId, draft: EmployeeDraft) -> AppResult<Option<Employee>> {
        if self.get(id).is_none() {
            tracing::warn!(employee_id = %id, "update for unknown employee");
            return Ok(None);
        }
        // The stored joined date stands in when the form leaves it blank.
        let missing: Vec<&str> = draft
            .missing_fields()
            .into_iter()
            .filter(|field| *field != fields::JOINED)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required employee fields: {}",
                missing.join(", ")
            )));
        }
        self.employees = Arc::new(editor::patch(&self.employees, &id, &draft));
        info!(employee_id = %id, "employee updated");
        Ok(self.get(id).cloned())
    }

    pub fn remove(&mut self, id: EmployeeId) -> bool {
        if !editor::contains_key(&self.employees, &id) {
            return false;
        }
        self.employees = Arc::new(editor::remove(&self.employees, &id));
        info!(employee_id = %id, "employee removed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{mint_employee_id, EmployeeStore};
    use crate::errors::AppError;
    use crate::models::{EmployeeDraft, EmployeeId, EmployeeStatus};
    use crate::seed;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn draft(name: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.to_string(),
            department: "Marketing".to_string(),
            role: "Analyst".to_string(),
            status: EmployeeStatus::Active,
            joined: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn minted_ids_never_collide() {
        let employees = seed::employees();
        assert_eq!(mint_employee_id(&employees, 1_700_000_000_000), EmployeeId(1_700_000_000_000));
        assert_eq!(mint_employee_id(&employees, 2), EmployeeId(5));
        assert_eq!(mint_employee_id(&[], -1), EmployeeId(0));
    }

    #[test]
    fn duplicate_names_get_distinct_ids() {
        let mut store = EmployeeStore::seeded();
        let first = store.add_at(draft("Alice Johnson"), 1_000).expect("add");
        let second = store.add_at(draft("Alice Johnson"), 1_000).expect("add");
        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 6);
        assert_eq!(store.snapshot()[0].id, second.id);
    }

    #[test]
    fn add_rejects_incomplete_draft_without_changing_store() {
        let mut store = EmployeeStore::seeded();
        let before = store.snapshot();
        let err = store
            .add(EmployeeDraft {
                joined: None,
                ..draft("Nina")
            })
            .expect_err("joined missing");
        assert!(matches!(err, AppError::Validation(message) if message.contains("joined")));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn update_keeps_joined_date_when_blank() {
        let mut store = EmployeeStore::seeded();
        let before = store.snapshot();
        let updated = store
            .update(
                EmployeeId(3),
                EmployeeDraft {
                    status: EmployeeStatus::Active,
                    joined: None,
                    ..draft("Carla Gomez")
                },
            )
            .expect("valid update")
            .expect("known id");
        assert_eq!(updated.status, EmployeeStatus::Active);
        assert_eq!(updated.joined, NaiveDate::from_ymd_opt(2021, 11, 22).expect("date"));
        assert_eq!(before[2].status, EmployeeStatus::OnLeave);

        assert!(store.update(EmployeeId(99), draft("Ghost")).expect("no error").is_none());
        assert!(store
            .update(
                EmployeeId(1),
                EmployeeDraft {
                    name: " ".to_string(),
                    ..draft("x")
                }
            )
            .is_err());
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut store = EmployeeStore::seeded();
        assert!(store.remove(EmployeeId(2)));
        assert!(!store.remove(EmployeeId(2)));
        assert_eq!(store.len(), 3);
    }
}
