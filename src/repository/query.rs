//! Filter and sort parameters understood by every store backend

use serde_json::Value;
use uuid::Uuid;

/// A single predicate on a document
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Top-level field equals the value
    Eq(String, Value),
    /// Top-level array field contains the value
    Contains(String, Value),
    /// Document id is one of the ids
    IdIn(Vec<Uuid>),
    /// Document id differs from the id
    IdNot(Uuid),
}

/// Conjunction of conditions; an empty filter matches every document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Contains(field.to_string(), value.into()));
        self
    }

    pub fn id_in(mut self, ids: Vec<Uuid>) -> Self {
        self.conditions.push(Condition::IdIn(ids));
        self
    }

    pub fn id_not(mut self, id: Uuid) -> Self {
        self.conditions.push(Condition::IdNot(id));
        self
    }

    /// Evaluate the filter against a document held in memory
    pub fn matches(&self, id: Uuid, body: &Value) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Eq(field, value) => body.get(field) == Some(value),
            Condition::Contains(field, value) => body
                .get(field)
                .and_then(Value::as_array)
                .map(|values| values.contains(value))
                .unwrap_or(false),
            Condition::IdIn(ids) => ids.contains(&id),
            Condition::IdNot(other) => *other != id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort on one top-level field
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::all().matches(Uuid::new_v4(), &json!({"name": "Fiction"})));
    }

    #[test]
    fn eq_does_not_match_inside_arrays() {
        let genre = Uuid::new_v4().to_string();
        let body = json!({ "genre": [genre.clone()] });
        assert!(!Filter::all().eq("genre", genre.clone()).matches(Uuid::new_v4(), &body));
        assert!(Filter::all().contains("genre", genre).matches(Uuid::new_v4(), &body));
    }

    #[test]
    fn id_conditions() {
        let id = Uuid::new_v4();
        let body = json!({});
        assert!(Filter::all().id_in(vec![id]).matches(id, &body));
        assert!(!Filter::all().id_in(vec![]).matches(id, &body));
        assert!(!Filter::all().id_not(id).matches(id, &body));
    }
}
