// JSONL encoding of a record collection

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::record::Record;

/// Encode records one JSON object per line, in collection order
pub fn encode<T: Serialize>(records: &[T]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decode a JSONL collection, keeping line order
///
/// Blank lines are ignored. Lines that fail to parse are skipped with a
/// warning, and a record whose id repeats an earlier line is dropped, so a
/// damaged slot degrades to whatever can still be read.
pub fn decode<T: Record>(content: &str) -> Vec<T> {
    let mut records: Vec<T> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record: T = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    collection = T::collection_name(),
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse JSON, skipping"
                );
                continue;
            }
        };

        if !seen.insert(record.id().to_string()) {
            warn!(
                collection = T::collection_name(),
                line = line_num + 1,
                id = record.id(),
                "Duplicate record id, skipping"
            );
            continue;
        }

        records.push(record);
    }

    debug!(collection = T::collection_name(), count = records.len(), "Decoded JSONL");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status, Task};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: "Test".to_string(),
            priority: Priority::P2,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            tags: vec!["ops".to_string()],
            status: Status::Backlog,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_encode_one_line_per_record() {
        let content = encode(&[task("test-1", "First task"), task("test-2", "Second task")]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"id\":\"test-1\""));
        assert!(lines[1].contains("\"title\":\"Second task\""));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_decode_keeps_order() {
        let content = encode(&[task("b", "Bravo task"), task("a", "Alpha task")]).unwrap();
        let records: Vec<Task> = decode(&content);
        let ids: Vec<&str> = records.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_encode_decode_encode_is_stable() {
        let first = encode(&[task("x", "Stable bytes")]).unwrap();
        let records: Vec<Task> = decode(&first);
        let second = encode(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_browser_written_line_round_trips_bytes() {
        let line = r#"{"id":"1718000000000_ab12c","title":"Legacy card","description":"","priority":"P2","dueDate":"2025-06-01","tags":["old"],"status":"Backlog","createdAt":"2025-05-20T10:00:00.000Z"}
"#;
        let records: Vec<Task> = decode(line);
        assert_eq!(records.len(), 1);

        let again = encode(&records).unwrap();
        assert_eq!(line, again);
    }

    #[test]
    fn test_decode_malformed_line() {
        let content = r#"{"id":"test-1","title":"Valid task","description":"","priority":"P1","dueDate":"2025-01-15","tags":[],"status":"Backlog","createdAt":"2025-01-01T08:00:00Z"}
{malformed json}
{"id":"test-2","title":"Also valid","description":"","priority":"P3","dueDate":"2025-01-16","tags":["x"],"status":"In Progress","createdAt":"2025-01-01T08:00:00Z"}
"#;

        let records: Vec<Task> = decode(content);
        // Should skip malformed line and load the two valid records
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].status, Status::InProgress);
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        let records: Vec<Task> = decode("not json at all");
        assert!(records.is_empty());

        let records: Vec<Task> = decode("");
        assert!(records.is_empty());
    }

    #[test]
    fn test_decode_duplicate_id_first_wins() {
        let content = encode(&[task("dup", "First copy"), task("dup", "Second copy")]).unwrap();
        let records: Vec<Task> = decode(&content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "First copy");
    }
}
