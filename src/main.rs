//! Gateway service entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (`./etc/gateway.toml`, environment overrides, `SD_*` vars)
//!   3. Install the error stack filter
//!   4. Init logger from `[logging]`
//!   5. Run the startup operation and report any failure

use std::process::ExitCode;

use smart_document::bootstrap::BootstrapError;
use smart_document::config;
use smart_document::errors::{self, AppError, ServiceError};
use smart_document::logging::{self, FieldLogger, Logger};
use tracing::{error, info};

const SERVICE_NAME: &str = "gateway";
const CONFIG_DIR: &str = "./etc";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, BootstrapError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let config = config::load(CONFIG_DIR, SERVICE_NAME)?;

    // Single install per process; the Err case only reports a repeat install.
    let _ = errors::install_stack_filter(
        config.errors.stack_filter().including(env!("CARGO_CRATE_NAME")),
    );

    let logger = Logger::init(&config.logging)?;

    info!("Starting Gateway Service");
    info!(environment = %config.environment, "config loaded");
    info!(addr = %config.server.bind_addr(), "server will listen");

    FieldLogger::new()
        .with("service", SERVICE_NAME)
        .with("version", env!("CARGO_PKG_VERSION"))
        .with("port", config.server.port)
        .info("Service configuration loaded");

    let code = match start() {
        Ok(()) => {
            info!("Gateway service started successfully");
            // No listener yet; the gateway only validates its wiring and exits.
            info!("Demo completed, shutting down...");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    };

    logger.close();
    Ok(code)
}

/// Outer-boundary handling: classify, log a one-line summary plus the
/// internal record, never print the cause or stack to the user.
fn report(err: &ServiceError) {
    match err.as_app_error() {
        Some(app) => {
            error!(
                code = app.code().value(),
                status = app.http_status().as_u16(),
                "Application error occurred: [{}] {}",
                app.code(),
                app.message()
            );
            logging::log_app_error(app);
        }
        None => logging::log_service_error(err),
    }
}

fn start() -> errors::Result<()> {
    validate_request("invalid-email")
}

fn validate_request(email: &str) -> errors::Result<()> {
    if email.contains('@') {
        return Ok(());
    }
    Err(AppError::validation("Invalid request format")
        .with_context("field", "email")
        .with_context("value", email)
        .with_details("Email format is not valid")
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn report_logs_summary_and_record_once() {
        let sink = Sink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let err = validate_request("invalid-email").unwrap_err();
        tracing::subscriber::with_default(subscriber, || report(&err));

        let out = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.matches("Application error occurred").count(), 2, "{out}");
        assert!(out.contains("Application error occurred: [1006] Invalid request format"));
        assert_eq!(out.matches("Email format is not valid").count(), 1);
        assert_eq!(out.matches("invalid-email").count(), 1);
        assert!(!out.contains("Error context"));
    }
}
