use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

mod due_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub name: String,
    #[serde(with = "due_date")]
    pub due_date: DateTime<Utc>,
    pub is_complete: bool,
}
impl Todo {
    pub fn new(id: i32, name: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            due_date,
            is_complete: false,
        }
    }

    // the records every fresh store starts with
    pub fn seed(now: DateTime<Utc>) -> Vec<Todo> {
        vec![
            Todo::new(1, "Learn Rust", now + Duration::days(1)),
            Todo::new(2, "Build awesome apps", now + Duration::days(2)),
            Todo::new(3, "Contribute to OSS", now + Duration::days(3)),
        ]
    }

    pub fn location(&self) -> String {
        format!("/todos/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_json_uses_camel_case() -> anyhow::Result<()> {
        let due = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let todo = Todo::new(7, "Write docs", due);
        let json = serde_json::to_value(&todo)?;
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Write docs",
                "dueDate": "2030-01-02T03:04:05Z",
                "isComplete": false,
            })
        );
        Ok(())
    }

    #[test]
    fn test_seed_is_ordered_and_in_the_future() {
        let now = Utc::now();
        let seed = Todo::seed(now);
        let ids: Vec<i32> = seed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(seed.iter().all(|t| t.due_date > now && !t.is_complete));
    }

    #[test]
    fn test_location() {
        let todo = Todo::new(42, "Answer", Utc::now());
        assert_eq!(todo.location(), "/todos/42");
    }
}
