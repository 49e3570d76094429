use crate::record::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// Select value the directory screen uses for "no filter".
pub const ALL: &str = "all";

/// Active predicates for one view: equality filters plus at most one
/// free-text query. Everything combines with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    equals: BTreeMap<String, String>,
    text: Option<String>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equals(mut self, field: &str, value: &str) -> Self {
        self.set_equals(field, Some(value));
        self
    }

    pub fn with_text(mut self, query: &str) -> Self {
        self.set_text(query);
        self
    }

    /// Sets or clears an equality filter. Empty values and [`ALL`] clear it.
    /// Returns whether the criteria changed.
    pub fn set_equals(&mut self, field: &str, value: Option<&str>) -> bool {
        match value.filter(|value| !value.is_empty() && *value != ALL) {
            Some(value) => self.equals.insert(field.to_string(), value.to_string()).as_deref() != Some(value),
            None => self.equals.remove(field).is_some(),
        }
    }

    /// Returns whether the effective query changed. Whitespace and case
    /// differences are not a change, though the latest text is kept.
    pub fn set_text(&mut self, query: &str) -> bool {
        let changed = normalize(query) != self.normalized_text();
        self.text = if query.is_empty() { None } else { Some(query.to_string()) };
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.is_empty();
        self.equals.clear();
        self.text = None;
        changed
    }

    pub fn equals(&self, field: &str) -> Option<&str> {
        self.equals.get(field).map(String::as_str)
    }

    pub fn equality_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.equals.iter().map(|(field, value)| (field.as_str(), value.as_str()))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.normalized_text().is_none()
    }

    fn normalized_text(&self) -> Option<String> {
        self.text.as_deref().and_then(normalize)
    }
}

fn normalize(text: &str) -> Option<String> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Applies [`Criteria`] to a record collection, searching free text across a
/// fixed set of fields.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    search_fields: Vec<String>,
}

impl FilterEngine {
    pub fn new<I, S>(search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Returns the matching records in their original order.
    pub fn apply<R: Record>(&self, records: &[R], criteria: &Criteria) -> Vec<R> {
        let query = criteria.normalized_text();
        records
            .iter()
            .filter(|record| self.matches_normalized(*record, criteria, query.as_deref()))
            .cloned()
            .collect()
    }

    pub fn matches<R: Record>(&self, record: &R, criteria: &Criteria) -> bool {
        self.matches_normalized(record, criteria, criteria.normalized_text().as_deref())
    }

    fn matches_normalized<R: Record>(&self, record: &R, criteria: &Criteria, query: Option<&str>) -> bool {
        for (field, expected) in criteria.equality_filters() {
            if record.field(field).as_deref() != Some(expected) {
                return false;
            }
        }

        if let Some(query) = query {
            let hit = self.search_fields.iter().any(|field| {
                record
                    .field(field)
                    .map(|value| value.to_lowercase().contains(query))
                    .unwrap_or(false)
            });
            if !hit {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Criteria, FilterEngine, ALL};
    use crate::models::{fields, AttendanceRow};
    use crate::seed;

    fn engine() -> FilterEngine {
        FilterEngine::new([fields::ID, fields::NAME, fields::ATTENDANCE_BY, fields::STATUS, fields::DEPARTMENT])
    }

    fn ids(rows: &[AttendanceRow]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_keeps_everything_in_order() {
        let rows = seed::attendance_rows();
        let result = engine().apply(&rows, &Criteria::new());
        assert_eq!(result, rows);
    }

    #[test]
    fn equality_filters_are_exact_and_case_sensitive() {
        let rows = seed::attendance_rows();
        let criteria = Criteria::new().with_equals(fields::DEPARTMENT, "Engineering");
        assert_eq!(ids(&engine().apply(&rows, &criteria)), vec!["E-1003"]);

        let lowercase = Criteria::new().with_equals(fields::DEPARTMENT, "engineering");
        assert!(engine().apply(&rows, &lowercase).is_empty());
    }

    #[test]
    fn text_query_is_trimmed_and_case_insensitive() {
        let rows = seed::attendance_rows();
        let criteria = Criteria::new().with_text("  WEB ");
        assert_eq!(ids(&engine().apply(&rows, &criteria)), vec!["E-1001", "E-1002", "E-1004"]);
    }

    #[test]
    fn filters_combine_with_and() {
        let rows = seed::attendance_rows();
        let criteria = Criteria::new()
            .with_equals(fields::SHIFT, "Day")
            .with_text("present");
        assert_eq!(ids(&engine().apply(&rows, &criteria)), vec!["E-1003", "E-1004"]);

        let none = Criteria::new()
            .with_equals(fields::SHIFT, "Night")
            .with_text("present");
        assert!(engine().apply(&rows, &none).is_empty());
    }

    #[test]
    fn missing_optional_fields_do_not_match() {
        let mut rows = seed::attendance_rows();
        rows[0].department = None;
        rows[0].attendance_by = None;
        let criteria = Criteria::new().with_text("hr");
        assert!(engine().apply(&rows[..1], &criteria).is_empty());
        let by_department = Criteria::new().with_equals(fields::DEPARTMENT, "HR");
        assert!(engine().apply(&rows[..1], &by_department).is_empty());
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let rows = seed::attendance_rows();
        let criteria = Criteria::new()
            .with_equals(fields::STATUS, "Present")
            .with_text("o");
        let once = engine().apply(&rows, &criteria);
        let twice = engine().apply(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn all_sentinel_and_empty_values_clear_filters() {
        let mut criteria = Criteria::new().with_equals(fields::DEPARTMENT, "HR");
        assert!(criteria.set_equals(fields::DEPARTMENT, Some(ALL)));
        assert!(criteria.is_empty());
        assert!(!criteria.set_equals(fields::DEPARTMENT, Some("")));
        assert!(criteria.set_equals(fields::DEPARTMENT, Some("HR")));
        assert!(!criteria.set_equals(fields::DEPARTMENT, Some("HR")));
    }

    #[test]
    fn padding_or_case_alone_does_not_change_the_query() {
        let mut criteria = Criteria::new().with_text("john");
        assert!(!criteria.set_text("john "));
        assert!(!criteria.set_text(" JOHN"));
        assert_eq!(criteria.text(), Some(" JOHN"));
        assert!(criteria.set_text("johns"));
        assert!(criteria.set_text("  "));
        assert!(!criteria.set_text(""));
    }

    #[test]
    fn whitespace_only_query_matches_everything() {
        let rows = seed::attendance_rows();
        let criteria = Criteria::new().with_text("   ");
        assert!(criteria.is_empty());
        assert_eq!(engine().apply(&rows, &criteria).len(), rows.len());
    }
}
