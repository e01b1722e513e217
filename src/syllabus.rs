//! Syllabus loading.
//!
//! The syllabus is an optional JSON document read once at startup and
//! attached to every request. The assistant must stay usable without one,
//! so a missing or unparseable file degrades to an empty context.

use serde_json::Value;
use std::path::Path;
use tracing::{error, info};

/// Load the syllabus document, or an empty object if unavailable.
pub fn load(path: &Path) -> Value {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            error!(path = %path.display(), error = %err, "failed to read syllabus file");
            return empty();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => {
            info!(path = %path.display(), "syllabus loaded");
            value
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "syllabus is not valid JSON");
            empty()
        }
    }
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let value = load(&dir.path().join("syllabus.json"));
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_malformed_file_yields_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{{ not json").unwrap();

        let value = load(&path);
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_valid_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"course": "Biology 101", "topics": ["cells", "genetics"]}}"#
        )
        .unwrap();

        let value = load(&path);
        assert_eq!(value["course"], "Biology 101");
        assert_eq!(value["topics"][1], "genetics");
    }
}
