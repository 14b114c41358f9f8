use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// One JSON log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredLogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Layer that writes every event as a single JSON line, stderr by default.
///
/// Fields of the enclosing spans (outermost first) are merged into each
/// line; an event field wins over a span field of the same name.
pub struct JsonFormatter<W = fn() -> io::Stderr> {
    make_writer: W,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            make_writer: io::stderr,
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> JsonFormatter<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    pub fn with_writer(make_writer: W) -> Self {
        Self { make_writer }
    }
}

/// Span fields recorded when the span was created.
struct SpanFields(HashMap<String, Value>);

impl<S, W> Layer<S> for JsonFormatter<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = JsonVisitor::default();
        values.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => fields.0.extend(visitor.fields),
            None => extensions.insert(SpanFields(visitor.fields)),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut fields = HashMap::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                if let Some(span_fields) = span.extensions().get::<SpanFields>() {
                    fields.extend(span_fields.0.clone());
                }
            }
        }
        fields.extend(visitor.fields);

        let duration_ms = fields.remove("duration_ms").and_then(|v| v.as_u64());
        let entry = StructuredLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            level: level_name(event.metadata().level()).to_string(),
            target: event.metadata().target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields,
            duration_ms,
        };

        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = writeln!(self.make_writer.make_writer(), "{}", json);
        }
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: HashMap<String, Value>,
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), Value::Bool(value));
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is not set.
    pub level: String,
    pub json_output: bool,
    pub color_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_output: false,
            color_output: true,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json_output {
        let subscriber = Registry::default().with(env_filter).with(JsonFormatter::new());
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .with_ansi(config.color_output);
        let subscriber = Registry::default().with(env_filter).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

/// Logs how long a backend call took once it finishes.
pub struct OperationTimer {
    start: std::time::Instant,
    operation_name: String,
}

impl OperationTimer {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation_name: operation_name.into(),
        }
    }

    pub fn finish_with_result<T, E: std::fmt::Display>(self, result: &Result<T, E>) {
        let duration_ms = self.start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => {
                tracing::debug!(
                    operation = %self.operation_name,
                    duration_ms = duration_ms,
                    success = true,
                    "Operation completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    operation = %self.operation_name,
                    duration_ms = duration_ms,
                    success = false,
                    error = %e,
                    "Operation failed"
                );
            }
        }
    }
}

/// Correlates the log lines of one CLI invocation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Error level so the span is enabled under any level filter.
    pub fn span(&self) -> tracing::Span {
        tracing::error_span!("request", request_id = %self.request_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_log_entry_serialization() {
        let mut fields = HashMap::new();
        fields.insert("email_id".to_string(), Value::String("42".to_string()));

        let entry = StructuredLogEntry {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            level: "INFO".to_string(),
            target: "api::client".to_string(),
            message: "Loaded email".to_string(),
            fields,
            duration_ms: Some(12),
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"email_id\":\"42\""));
        assert!(json.contains("\"duration_ms\":12"));
        assert!(json.contains("Loaded email"));
    }

    #[test]
    fn test_entry_omits_missing_duration() {
        let entry = StructuredLogEntry {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            level: "WARN".to_string(),
            target: "application".to_string(),
            message: "Auto-save failed".to_string(),
            fields: HashMap::new(),
            duration_ms: None,
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("duration_ms"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_lines_carry_request_span_fields() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = Registry::default()
            .with(EnvFilter::new("warn"))
            .with(JsonFormatter::with_writer(move || sink.clone()));

        let request = RequestContext::new();
        tracing::subscriber::with_default(subscriber, || {
            let _guard = request.span().entered();
            tracing::warn!(store = "pension-info", "Auto-save failed");
            OperationTimer::new("get_stats").finish_with_result(&Err::<(), _>("boom"));
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line["request_id"], Value::String(request.request_id.clone()));
        }
        assert_eq!(lines[0]["store"], "pension-info");
        assert_eq!(lines[0]["message"], "Auto-save failed");
        assert_eq!(lines[1]["level"], "WARN");
        assert!(lines[1]["duration_ms"].is_u64());
    }

    #[test]
    fn test_operation_timer_accepts_both_outcomes() {
        let ok: Result<(), String> = Ok(());
        OperationTimer::new("get_stats").finish_with_result(&ok);

        let err: Result<(), String> = Err("boom".into());
        OperationTimer::new("get_stats").finish_with_result(&err);
    }

    #[test]
    fn test_request_context_ids_are_unique() {
        let a = RequestContext::new();
        let b = RequestContext::default();
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert!(!config.json_output);
    }
}
