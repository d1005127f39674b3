use serde_json::Value;

use crate::storage::StorageError;

type MigrationFn = fn(Value) -> Result<Value, StorageError>;

/// Index `n` migrates version `n + 1` to `n + 2`
fn get_migrations() -> Vec<MigrationFn> {
    vec![migrate_v1_to_v2]
}

/// Returns 1 if the version field is missing (files written before versioning)
pub fn detect_version(data: &Value) -> Result<u32, StorageError> {
    match data.get("version") {
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| StorageError::MalformedVersion(v.to_string())),
        None => Ok(1),
    }
}

/// Migrations are applied sequentially: v1→v2→v3→...→target
pub fn apply_migrations(
    mut data: Value,
    from_version: u32,
    to_version: u32,
) -> Result<Value, StorageError> {
    if from_version == to_version {
        return Ok(data);
    }

    if from_version > to_version {
        return Err(StorageError::FutureVersion(from_version));
    }

    if from_version == 0 {
        return Err(StorageError::UnsupportedVersion(from_version));
    }

    let migrations = get_migrations();

    for version in from_version..to_version {
        let migration = migrations
            .get((version - 1) as usize)
            .ok_or(StorageError::UnsupportedVersion(version))?;
        data = migration(data)?;
    }

    Ok(data)
}

/// v1 lists owned a `tasks` array of task ids. v2 keeps membership only on
/// the task (`list_id`), so the array is folded into the tasks and dropped.
fn migrate_v1_to_v2(mut value: Value) -> Result<Value, StorageError> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| StorageError::MigrationFailed {
            version: 1,
            reason: String::from("store root is not an object"),
        })?;

    let mut memberships: Vec<(Value, Value)> = Vec::new();
    if let Some(lists) = obj.get_mut("lists").and_then(|l| l.as_array_mut()) {
        for list in lists {
            let Some(list_obj) = list.as_object_mut() else {
                continue;
            };
            let list_id = list_obj.get("id").cloned().unwrap_or(Value::Null);
            if let Some(Value::Array(task_ids)) = list_obj.remove("tasks") {
                memberships.extend(task_ids.into_iter().map(|id| (id, list_id.clone())));
            }
        }
    } else {
        obj.insert(String::from("lists"), Value::Array(vec![]));
    }

    if let Some(tasks) = obj.get_mut("tasks").and_then(|t| t.as_array_mut()) {
        for task in tasks {
            let Some(task_obj) = task.as_object_mut() else {
                continue;
            };
            let task_id = task_obj.get("id").cloned();
            let owner = memberships
                .iter()
                .find(|(member_id, _)| Some(member_id) == task_id.as_ref())
                .map(|(_, list_id)| list_id.clone());
            if let Some(list_id) = owner {
                task_obj.insert(String::from("list_id"), list_id);
            }
        }
    } else {
        obj.insert(String::from("tasks"), Value::Array(vec![]));
    }

    obj.insert(String::from("version"), Value::from(2));

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_version_with_version_field() {
        let data = json!({"version": 2, "tasks": [], "lists": []});
        assert_eq!(detect_version(&data).unwrap(), 2);
    }

    #[test]
    fn test_detect_version_without_version_field() {
        let data = json!({"tasks": [], "lists": []});
        assert_eq!(detect_version(&data).unwrap(), 1);
    }

    #[test]
    fn test_detect_version_malformed() {
        let data = json!({"version": "two"});
        assert!(matches!(
            detect_version(&data),
            Err(StorageError::MalformedVersion(_))
        ));
    }

    #[test]
    fn test_apply_migrations_same_version() {
        let data = json!({"version": 2});
        let result = apply_migrations(data.clone(), 2, 2).unwrap();
        assert_eq!(result, data);
    }

    #[test]
    fn test_apply_migrations_future_version() {
        let data = json!({"version": 5});
        let result = apply_migrations(data, 5, 2);
        assert!(matches!(result, Err(StorageError::FutureVersion(5))));
    }

    #[test]
    fn test_migrate_v1_moves_membership_to_tasks() {
        let data = json!({
            "tasks": [
                {"id": "t1", "title": "Milk"},
                {"id": "t2", "title": "Loose"}
            ],
            "lists": [
                {"id": "l1", "title": "Groceries", "tasks": ["t1"]}
            ]
        });

        let migrated = apply_migrations(data, 1, 2).unwrap();

        assert_eq!(migrated["version"], json!(2));
        assert_eq!(migrated["tasks"][0]["list_id"], json!("l1"));
        assert!(migrated["tasks"][1].get("list_id").is_none());
        assert!(migrated["lists"][0].get("tasks").is_none());
    }

    #[test]
    fn test_migrate_v1_fills_missing_collections() {
        let migrated = apply_migrations(json!({}), 1, 2).unwrap();
        assert_eq!(migrated["tasks"], json!([]));
        assert_eq!(migrated["lists"], json!([]));
    }
}
