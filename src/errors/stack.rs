//! Call-stack capture for [`AppError`](super::AppError).
//!
//! A raw backtrace is mostly runtime and std noise. The filter keeps only the
//! frames whose symbol mentions one of the configured module prefixes, plus
//! the `at file:line` line that follows each kept frame. Frames inside this
//! `errors` module are always dropped so a trace starts at the code that
//! raised the error.
//!
//! The process-wide filter is installed once at startup with
//! [`install_stack_filter`]; until then [`StackFilter::default`] applies.

use std::backtrace::Backtrace;
use std::sync::OnceLock;

/// Module path of the error-construction machinery itself.
const CAPTURE_MODULE: &str = concat!(env!("CARGO_CRATE_NAME"), "::errors::");

static STACK_FILTER: OnceLock<StackFilter> = OnceLock::new();

/// Which frames of a captured backtrace are worth keeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFilter {
    include: Vec<String>,
    enabled: bool,
}

impl Default for StackFilter {
    fn default() -> Self {
        Self {
            include: vec![env!("CARGO_CRATE_NAME").to_string()],
            enabled: true,
        }
    }
}

impl StackFilter {
    /// Keep frames mentioning any of `prefixes`. Empty prefixes are ignored.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
            enabled: true,
        }
    }

    /// A filter that never captures; errors carry an empty trace.
    pub fn disabled() -> Self {
        Self {
            include: Vec::new(),
            enabled: false,
        }
    }

    /// Also keep frames mentioning `prefix`.
    pub fn including(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() && !self.include.contains(&prefix) {
            self.include.push(prefix);
        }
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn prefixes(&self) -> &[String] {
        &self.include
    }

    /// Capture the current thread's stack and filter it.
    pub fn capture(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        let raw = Backtrace::force_capture().to_string();
        self.apply(&raw)
    }

    /// Filter a rendered backtrace.
    pub fn apply(&self, raw: &str) -> String {
        let lines: Vec<&str> = raw.lines().collect();
        let mut kept = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !is_frame_line(line) || line.contains(CAPTURE_MODULE) {
                continue;
            }
            if !self.include.iter().any(|p| line.contains(p.as_str())) {
                continue;
            }
            kept.push(*line);
            if let Some(next) = lines.get(i + 1) {
                if next.trim_start().starts_with("at ") {
                    kept.push(*next);
                }
            }
        }

        kept.join("\n")
    }
}

/// Frame header lines look like `  12: some::symbol::path`.
fn is_frame_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    match trimmed.split_once(':') {
        Some((index, _)) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Install the process-wide filter. Returns the rejected filter if one was
/// already installed.
pub fn install_stack_filter(filter: StackFilter) -> Result<(), StackFilter> {
    STACK_FILTER.set(filter)
}

/// The installed filter, or the default one.
pub fn stack_filter() -> &'static StackFilter {
    STACK_FILTER.get_or_init(StackFilter::default)
}

/// Capture with the process-wide filter.
pub(crate) fn capture() -> String {
    stack_filter().capture()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:13
   1: smart_document::errors::stack::StackFilter::capture
             at ./src/errors/stack.rs:70:19
   2: smart_document::errors::app_error::AppError::new
             at ./src/errors/app_error.rs:40:25
   3: smart_document::documents::load
             at ./src/documents.rs:12:9
   4: gateway::run
             at ./src/main.rs:30:5
   5: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5
   6: smart_document::documents::no_debug_info
   7: std::rt::lang_start";

    #[test]
    fn keeps_matching_frames_with_location() {
        let out = StackFilter::default().apply(RAW);
        let expected = "   3: smart_document::documents::load\n             at ./src/documents.rs:12:9\n   6: smart_document::documents::no_debug_info";
        assert_eq!(out, expected);
    }

    #[test]
    fn drops_capture_machinery_frames() {
        let out = StackFilter::default().apply(RAW);
        assert!(!out.contains("errors::stack"));
        assert!(!out.contains("AppError::new"));
    }

    #[test]
    fn multiple_prefixes() {
        let out = StackFilter::new(["gateway", "smart_document"]).apply(RAW);
        assert!(out.contains("gateway::run"));
        assert!(out.contains("./src/main.rs:30:5"));
        assert!(out.contains("documents::load"));
        assert!(!out.contains("FnOnce"));
    }

    #[test]
    fn location_lines_alone_never_match() {
        // `at` lines mention the crate's source paths but are only kept after a frame.
        let out = StackFilter::new(["src/errors"]).apply(RAW);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_prefixes_are_ignored() {
        let f = StackFilter::new(["", "gateway"]);
        assert_eq!(f.prefixes(), ["gateway".to_string()]);
    }

    #[test]
    fn including_adds_once() {
        let f = StackFilter::default().including("gateway").including("gateway");
        assert_eq!(f.prefixes().len(), 2);
        assert!(f.apply(RAW).contains("gateway::run"));
    }

    #[test]
    fn disabled_filter_captures_nothing() {
        assert!(StackFilter::disabled().capture().is_empty());
        assert!(StackFilter::default().with_enabled(false).capture().is_empty());
    }

    #[test]
    fn live_capture_excludes_own_frames() {
        let trace = StackFilter::default().capture();
        assert!(!trace.contains(CAPTURE_MODULE));
    }

    #[test]
    fn frame_line_detection() {
        assert!(is_frame_line("  12: foo::bar"));
        assert!(!is_frame_line("             at ./src/main.rs:1:1"));
        assert!(!is_frame_line("no colon here"));
    }
}
