//! JSONL layer.
//!
//! One object per event with `timestamp`, `level`, `service`, `target`,
//! `message` and the event's own fields. A field whose name marks it as a
//! credential is written as `"[redacted]"`, whatever its value.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

const REDACTED: &str = "[redacted]";

/// Name fragments that mark a field as a credential.
const SENSITIVE: [&str; 4] = ["token", "password", "authorization", "secret"];

fn is_sensitive(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SENSITIVE.iter().any(|fragment| name.contains(fragment))
}

#[derive(Serialize)]
struct LogLine<'a> {
    timestamp: String,
    level: &'a str,
    service: &'a str,
    target: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
}

#[derive(Default)]
struct EventFields {
    message: Option<String>,
    values: Map<String, Value>,
}

impl EventFields {
    fn insert(&mut self, field: &Field, value: Value) {
        let name = field.name();
        if name == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else if is_sensitive(name) {
            self.values
                .insert(name.to_string(), Value::String(REDACTED.to_string()));
        } else {
            self.values.insert(name.to_string(), value);
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }
}

/// Layer writing one JSON line per event.
pub(crate) struct JsonLayer<W> {
    service: String,
    make_writer: W,
}

impl<W> JsonLayer<W> {
    pub(crate) fn new(service: String, make_writer: W) -> Self {
        Self {
            service,
            make_writer,
        }
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        let line = LogLine {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: metadata.level().as_str(),
            service: &self.service,
            target: metadata.target(),
            message: fields.message.unwrap_or_default(),
            fields: fields.values,
        };

        if let Ok(mut json) = serde_json::to_string(&line) {
            json.push('\n');
            let mut writer = self.make_writer.make_writer();
            let _ = writer.write_all(json.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(emit: impl FnOnce()) -> Vec<serde_json::Value> {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(JsonLayer::new("auth".to_string(), captured.clone()));
        tracing::subscriber::with_default(subscriber, emit);

        let raw = String::from_utf8(captured.0.lock().clone()).unwrap();
        raw.lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_layer_writes_structured_fields() {
        let lines = capture(|| {
            tracing::info!(user_id = "u-1", generation = 2u64, restored = true, "Session restored");
        });

        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["service"], "auth");
        assert_eq!(entry["level"], "INFO");
        assert_eq!(entry["message"], "Session restored");
        assert_eq!(entry["fields"]["user_id"], "u-1");
        assert_eq!(entry["fields"]["generation"], 2);
        assert_eq!(entry["fields"]["restored"], true);
    }

    #[test]
    fn test_credentials_are_redacted() {
        let lines = capture(|| {
            tracing::warn!(
                access_token = "tok1",
                refreshToken = %"ref1",
                password = "hunter2",
                user_id = "u-1",
                "Login succeeded"
            );
        });

        let raw = lines[0].to_string();
        assert!(!raw.contains("tok1"));
        assert!(!raw.contains("ref1"));
        assert!(!raw.contains("hunter2"));
        assert_eq!(lines[0]["fields"]["access_token"], REDACTED);
        assert_eq!(lines[0]["fields"]["refreshToken"], REDACTED);
        assert_eq!(lines[0]["fields"]["password"], REDACTED);
        assert_eq!(lines[0]["fields"]["user_id"], "u-1");
    }

    #[test]
    fn test_events_without_fields_omit_the_map() {
        let lines = capture(|| tracing::debug!("Logged out"));
        assert_eq!(lines[0]["message"], "Logged out");
        assert!(lines[0].get("fields").is_none());
    }

    #[test]
    fn test_is_sensitive_matches_fragments() {
        assert!(is_sensitive("Authorization"));
        assert!(is_sensitive("client_secret"));
        assert!(!is_sensitive("email"));
    }
}
