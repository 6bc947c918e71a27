//! Audit snapshots
//!
//! Serializes entities into the JSON stored in `old_values` / `new_values`
//! and narrows updates down to the fields that actually changed.

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::types::entity;

/// Fields never written to the audit log, per entity type
fn excluded_fields(entity_type: &str) -> &'static [&'static str] {
    match entity_type {
        entity::USER => &["password_hash", "created_at", "updated_at"],
        entity::EVENT | entity::TICKET => &["created_at", "updated_at"],
        _ => &[],
    }
}

/// Structural equality with integer/float tolerance
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
                _ => a == b,
            },
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Full snapshot of an entity with sensitive and bookkeeping fields removed
pub fn snapshot<T: Serialize>(value: &T, entity_type: &str) -> Value {
    match serde_json::to_value(value) {
        Ok(mut json) => {
            if let Value::Object(obj) = &mut json {
                for field in excluded_fields(entity_type) {
                    obj.remove(*field);
                }
            }
            json
        }
        Err(e) => {
            tracing::error!(entity_type, error = %e, "Failed to serialize audit snapshot");
            json!({ "error": "serialization_failed" })
        }
    }
}

/// Old and new values restricted to the top-level fields that differ.
///
/// Returns `None` when nothing changed.
pub fn changed_fields<T: Serialize>(
    before: &T,
    after: &T,
    entity_type: &str,
) -> Option<(Value, Value)> {
    let (Value::Object(old), Value::Object(new)) =
        (snapshot(before, entity_type), snapshot(after, entity_type))
    else {
        return None;
    };

    let mut old_changed = Map::new();
    let mut new_changed = Map::new();
    for (key, new_value) in new {
        let old_value = old.get(&key).cloned().unwrap_or(Value::Null);
        if !values_equal(&old_value, &new_value) {
            old_changed.insert(key.clone(), old_value);
            new_changed.insert(key, new_value);
        }
    }

    if new_changed.is_empty() {
        None
    } else {
        Some((Value::Object(old_changed), Value::Object(new_changed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Event, User};

    fn user() -> User {
        User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            is_active: true,
            role_id: Some(2),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn user_snapshot_never_contains_hash() {
        let snap = snapshot(&user(), entity::USER);
        let obj = snap.as_object().unwrap();
        assert!(!obj.contains_key("password_hash"));
        assert_eq!(obj["email"], "ana@example.com");
    }

    #[test]
    fn changed_fields_only_reports_differences() {
        let before = user();
        let mut after = user();
        after.name = "Ana Maria".into();
        after.updated_at = 99;

        let (old, new) = changed_fields(&before, &after, entity::USER).unwrap();
        assert_eq!(old, json!({ "name": "Ana" }));
        assert_eq!(new, json!({ "name": "Ana Maria" }));
    }

    #[test]
    fn identical_values_yield_none() {
        let event = Event {
            id: 4,
            title: "Expo".into(),
            description: String::new(),
            start_date: 10,
            end_date: 20,
            location: "Hall A".into(),
            max_attendees: 100,
            current_attendees: 0,
            is_active: true,
            created_at: 1,
            updated_at: 2,
        };
        let mut touched = event.clone();
        touched.updated_at = 3;
        assert!(changed_fields(&event, &touched, entity::EVENT).is_none());
    }

    #[test]
    fn float_and_integer_compare_equal() {
        assert!(values_equal(&json!(5), &json!(5.0)));
        assert!(!values_equal(&json!([1, 2]), &json!([1, 2, 3])));
    }
}
