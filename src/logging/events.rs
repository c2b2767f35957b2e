//! Structured log helpers on top of the `tracing` macros.
//!
//! All of these are safe to call before [`Logger::init`](super::Logger::init):
//! without a subscriber, tracing drops the events.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::errors::{AppError, ServiceError, as_app_error};

/// A logger bound to extra key/value pairs, attached to every event it
/// emits as a single JSON `fields` value.
///
/// tracing field names are fixed at the call site, so runtime keys cannot
/// become top-level fields. The JSON sink writes them as one string,
/// e.g. `"fields":"{\"field\":\"email\"}"`, which log tooling has to
/// decode a second time. The same holds for `context` in [`log_app_error`].
#[derive(Debug, Clone, Default)]
pub struct FieldLogger {
    fields: BTreeMap<String, Value>,
}

/// Bind `fields` to a [`FieldLogger`].
pub fn with_fields<I, K, V>(fields: I) -> FieldLogger
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    FieldLogger {
        fields: fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    }
}

impl FieldLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite one field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    fn rendered(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    pub fn debug(&self, message: &str) {
        debug!(fields = %self.rendered(), "{message}");
    }

    pub fn info(&self, message: &str) {
        info!(fields = %self.rendered(), "{message}");
    }

    pub fn warn(&self, message: &str) {
        warn!(fields = %self.rendered(), "{message}");
    }

    pub fn error(&self, message: &str) {
        error!(fields = %self.rendered(), "{message}");
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// One line per completed HTTP request.
pub fn log_http_request(
    method: &str,
    path: &str,
    user_id: &str,
    status_code: u16,
    duration: Duration,
) {
    info!(
        method,
        path,
        user_id,
        status_code,
        duration_ms = millis(duration),
        "HTTP Request"
    );
}

/// Failed queries log at error level; successful ones at debug.
pub fn log_db_query(query: &str, duration: Duration, err: Option<&dyn StdError>) {
    match err {
        Some(err) => error!(
            query,
            duration_ms = millis(duration),
            error = %err,
            "Database Query Failed"
        ),
        None => debug!(query, duration_ms = millis(duration), "Database Query"),
    }
}

/// Log `err` with whatever stack is available: the captured trace for
/// taxonomy errors, the debug rendering otherwise.
pub fn error_with_stack(err: &(dyn StdError + 'static), message: &str) {
    let stack = match as_app_error(err) {
        Some(app) => app.stack_trace().to_string(),
        None => format!("{err:?}"),
    };
    error!(error = %err, stack = %stack, "{message}");
}

/// Full internal record of a taxonomy error, cause and stack included.
/// Never send this to clients.
pub fn log_app_error(err: &AppError) {
    let context = err
        .context()
        .map(|c| serde_json::to_string(c).unwrap_or_default());
    let cause = err.internal().map(|c| c.to_string());
    error!(
        code = err.code().value(),
        code_name = err.code().name().unwrap_or("UNKNOWN"),
        error_message = err.message(),
        details = err.details(),
        context = context.as_deref(),
        cause = cause.as_deref(),
        stack = err.stack_trace(),
        "Application error occurred"
    );
}

/// Taxonomy errors get the full record; anything else is logged as
/// unexpected.
pub fn log_service_error(err: &ServiceError) {
    match err {
        ServiceError::App(app) => log_app_error(app),
        ServiceError::Unexpected(other) => error!(error = %other, "Unexpected error"),
    }
}

/// Log at error level and terminate the process with status 1.
pub fn fatal(message: &str) -> ! {
    error!(fatal = true, "{message}");
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        sink.text()
    }

    #[inline(never)]
    fn raise_here() -> AppError {
        AppError::not_found("document 9 is gone")
    }

    #[test]
    fn live_trace_starts_at_the_raising_function() {
        let err = raise_here();
        let trace = err.stack_trace();
        let lines: Vec<&str> = trace.lines().collect();

        let frame = lines
            .iter()
            .position(|l| l.contains("logging::events::tests::raise_here"))
            .unwrap_or_else(|| panic!("raising frame missing from trace:\n{trace}"));
        let location = lines.get(frame + 1).expect("frame is followed by its location");
        assert!(location.trim_start().starts_with("at "), "{location}");
        assert!(location.contains("src/logging/events.rs"), "{location}");

        assert!(!trace.contains("smart_document::errors::"), "{trace}");
        assert!(lines[0].contains("raise_here"), "trace should start at the raiser:\n{trace}");
    }

    #[test]
    fn http_request_fields() {
        let out = capture(|| {
            log_http_request("GET", "/documents/42", "user-7", 200, Duration::from_millis(12));
        });
        assert!(out.contains("HTTP Request"));
        assert!(out.contains("GET"));
        assert!(out.contains("/documents/42"));
        assert!(out.contains("user-7"));
        assert!(out.contains("status_code=200"));
        assert!(out.contains("duration_ms=12"));
    }

    #[test]
    fn db_query_levels() {
        let ok = capture(|| log_db_query("SELECT 1", Duration::from_millis(3), None));
        assert!(ok.contains("DEBUG"));
        assert!(ok.contains("Database Query"));
        assert!(!ok.contains("Failed"));

        let cause = io::Error::new(io::ErrorKind::Other, "relation does not exist");
        let failed = capture(|| {
            log_db_query("SELECT * FROM nope", Duration::from_millis(3), Some(&cause))
        });
        assert!(failed.contains("ERROR"));
        assert!(failed.contains("Database Query Failed"));
        assert!(failed.contains("relation does not exist"));
    }

    #[test]
    fn field_logger_renders_bound_fields() {
        let out = capture(|| {
            with_fields([("service", "gateway"), ("version", "1.0.0")])
                .with("port", 8080)
                .info("Service configuration loaded");
        });
        assert!(out.contains("Service configuration loaded"));
        assert!(out.contains(r#""service":"gateway""#));
        assert!(out.contains(r#""port":8080"#));
    }

    #[test]
    fn field_logger_overwrites_keys() {
        let fl = FieldLogger::new().with("k", 1).with("k", 2);
        assert_eq!(fl.fields().len(), 1);
        assert_eq!(fl.fields()["k"], Value::from(2));
    }

    #[test]
    fn app_error_record_includes_internal_diagnostics() {
        let err = AppError::wrap("connection refused", ErrorCode::INTERNAL, "query failed")
            .with_context("table", "documents")
            .with_details("retry later");
        let out = capture(|| log_app_error(&err));
        assert!(out.contains("Application error occurred"));
        assert!(out.contains("code=1000"));
        assert!(out.contains("INTERNAL"));
        assert!(out.contains("connection refused"));
        assert!(out.contains("retry later"));
        assert!(out.contains("documents"));
    }

    #[test]
    fn unexpected_errors_are_labelled() {
        let err = ServiceError::unexpected("socket closed");
        let out = capture(|| log_service_error(&err));
        assert!(out.contains("Unexpected error"));
        assert!(out.contains("socket closed"));
    }

    #[test]
    fn error_with_stack_handles_opaque_errors() {
        let err = io::Error::new(io::ErrorKind::Other, "boom");
        let out = capture(|| error_with_stack(&err, "operation failed"));
        assert!(out.contains("operation failed"));
        assert!(out.contains("boom"));
    }

    #[test]
    fn helpers_are_noops_without_subscriber() {
        // No scoped subscriber here; must not panic whether or not a global one exists.
        log_http_request("POST", "/", "", 500, Duration::ZERO);
        log_db_query("SELECT 1", Duration::ZERO, None);
        with_fields([("a", 1)]).warn("nothing");
    }
}
