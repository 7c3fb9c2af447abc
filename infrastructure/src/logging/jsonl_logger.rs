//! Append-only JSONL chat transcript.
//!
//! One line per [`ConversationEvent`]: the event payload's fields plus
//! `type`, `timestamp` (RFC 3339, UTC) and `session`, an id shared by every
//! line written during one run so transcripts from several runs can share a
//! file.

use chrono::{DateTime, SecondsFormat, Utc};
use parley_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Transcript logger writing to a JSONL file.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: String,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories
    /// when missing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let started = Utc::now();

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session: started.format("%Y%m%dT%H%M%S%.3fZ").to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every line of this run.
    pub fn session(&self) -> &str {
        &self.session
    }
}

/// Build the JSON object written for one event.
///
/// Object payloads are flattened into the record; anything else lands
/// under `data`.
fn record(event: ConversationEvent, session: &str, at: DateTime<Utc>) -> Value {
    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert(
        "timestamp".to_string(),
        Value::from(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    map.insert("session".to_string(), Value::from(session));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = record(event, &self.session, Utc::now()).to_string();

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Could not write transcript {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_application::ports::conversation_logger::event_types;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new(
            event_types::USER_MESSAGE,
            json!({ "text": "hello" }),
        ));
        logger.log(ConversationEvent::new(
            event_types::BOT_REPLY,
            json!({ "text": "hi", "fallback": false }),
        ));
        let session = logger.session().to_string();
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "user_message");
        assert_eq!(lines[0]["text"], "hello");
        assert_eq!(lines[1]["type"], "bot_reply");
        assert_eq!(lines[1]["fallback"], false);
        for line in &lines {
            assert_eq!(line["session"], session.as_str());
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[test]
    fn appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("chat.jsonl");

        for text in ["first", "second"] {
            let logger = JsonlConversationLogger::create(&path).unwrap();
            logger.log(ConversationEvent::new(
                event_types::USER_MESSAGE,
                json!({ "text": text }),
            ));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["text"], "first");
        assert_eq!(lines[1]["text"], "second");
    }

    #[test]
    fn create_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlConversationLogger::create(blocker.join("chat.jsonl")).is_err());
    }

    #[test]
    fn record_wraps_non_object_payloads() {
        let at = Utc::now();
        let event = ConversationEvent::new(event_types::SEND_FAILED, json!("boom"));

        let value = record(event, "s1", at);

        assert_eq!(value["type"], "send_failed");
        assert_eq!(value["data"], "boom");
        assert_eq!(value["session"], "s1");
    }

    #[test]
    fn record_with_null_payload_has_only_metadata() {
        let event = ConversationEvent::new(event_types::HISTORY_CLEARED, Value::Null);

        let value = record(event, "s1", Utc::now());

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"type"));
        assert!(keys.contains(&"timestamp"));
        assert!(keys.contains(&"session"));
    }
}
