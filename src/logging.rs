//! Unified JSON logging with custom format.
//!
//! Log format:
//! ```json
//! {"ts":"2026-01-28T15:04:05.123Z","level":"info","type":"app","msg":"evaluation finished","ctx":{"service":"sitehealth"},"data":{}}
//! ```
//!
//! Events with target `check` are typed `check` and summarised as
//! `"<check_id> <severity>"`, the original message moves to `data.event`.

use std::any::Any;
use std::collections::HashMap;

use chrono::Utc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Target used by the evaluator for per-check events.
pub const CHECK_TARGET: &str = "check";

/// Target used for panic reports.
pub const PANIC_TARGET: &str = "sitehealth::panic";

/// Install the global subscriber and the panic hook. Logs go to stderr;
/// stdout is reserved for rendered reports.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(&config.filter)
        .unwrap_or_else(|_| EnvFilter::new("sitehealth=info,check=info"));

    let json = (config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(JsonFormatter::new(config.service_name.clone()))
            .with_writer(std::io::stderr)
    });
    let text = (config.format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()?;

    install_panic_hook();
    Ok(())
}

/// Route panic reports through tracing, including panics the evaluator catches.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        log_panic(info.payload(), location.as_deref());
    }));
}

fn log_panic(payload: &(dyn Any + Send), location: Option<&str>) {
    let thread = std::thread::current();
    tracing::error!(
        target: PANIC_TARGET,
        location = location.unwrap_or("unknown"),
        thread = thread.name().unwrap_or("unnamed"),
        "panicked: {}",
        panic_message(payload)
    );
}

/// Extract the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Custom JSON formatter for tracing.
pub struct JsonFormatter {
    service_name: String,
}

impl JsonFormatter {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = match *meta.level() {
            Level::TRACE => "debug",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };

        // Determine log type from target
        let log_type = if meta.target() == CHECK_TARGET {
            "check"
        } else if *meta.level() == Level::ERROR {
            "error"
        } else {
            "app"
        };

        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let ts = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

        let message = visitor.message.take().unwrap_or_default();
        let mut data = visitor.fields;

        let msg = if log_type == "check" {
            let field = |name: &str| {
                data.get(name)
                    .and_then(|v| v.as_str())
                    .unwrap_or("?")
                    .to_string()
            };
            let summary = format!("{} {}", field("check_id"), field("severity"));
            if !message.is_empty() {
                data.insert("event".into(), serde_json::Value::String(message));
            }
            summary
        } else {
            message
        };

        let ctx = serde_json::json!({
            "service": &self.service_name
        });

        let entry = serde_json::json!({
            "ts": ts,
            "level": level,
            "type": log_type,
            "msg": msg,
            "ctx": ctx,
            "data": data,
        });

        writeln!(
            writer,
            "{}",
            serde_json::to_string(&entry).unwrap_or_default()
        )
    }
}

/// Field visitor for collecting tracing fields.
struct FieldVisitor {
    message: Option<String>,
    fields: HashMap<String, serde_json::Value>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: HashMap::new(),
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value).trim_matches('"').to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(format!("{:?}", value)),
            );
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(
                field.name().to_string(),
                serde_json::Value::String(value.to_string()),
            );
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::json!(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buf {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buf {
        type Writer = Buf;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<serde_json::Value> {
        let buf = Buf::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .event_format(JsonFormatter::new("sitehealth-test"))
            .with_writer(buf.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_check_events() {
        let lines = capture(|| {
            tracing::debug!(
                target: "check",
                check_id = "obj_cache",
                severity = "recommended",
                duration_us = 12u64,
                "check evaluated"
            );
        });

        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["type"], "check");
        assert_eq!(entry["level"], "debug");
        assert_eq!(entry["msg"], "obj_cache recommended");
        assert_eq!(entry["ctx"]["service"], "sitehealth-test");
        assert_eq!(entry["data"]["event"], "check evaluated");
        assert_eq!(entry["data"]["duration_us"], 12);
    }

    #[test]
    fn test_app_and_error_events() {
        let lines = capture(|| {
            tracing::info!(checks = 3u64, "evaluation finished");
            tracing::error!("context gathering failed");
        });

        assert_eq!(lines[0]["type"], "app");
        assert_eq!(lines[0]["msg"], "evaluation finished");
        assert_eq!(lines[0]["data"]["checks"], 3);
        assert!(lines[0]["data"].get("message").is_none());

        assert_eq!(lines[1]["type"], "error");
        assert_eq!(lines[1]["level"], "error");

        let ts = lines[0]["ts"].as_str().unwrap();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-01-28T15:04:05.123Z".len());
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 7");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(5u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_panic_is_logged_as_json_error() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("check exploded"));
        let lines = capture(|| log_panic(payload.as_ref(), Some("src/checks/opcache.rs:10:5")));

        assert_eq!(lines.len(), 1);
        let entry = &lines[0];
        assert_eq!(entry["level"], "error");
        assert_eq!(entry["type"], "error");
        assert_eq!(entry["msg"], "panicked: check exploded");
        assert_eq!(entry["data"]["location"], "src/checks/opcache.rs:10:5");
        assert!(entry["data"]["thread"].is_string());
    }
}
