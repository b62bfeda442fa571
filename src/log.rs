//! Two-channel logging collaborator.
//!
//! Lines sent to [`Log::must`] are always emitted. Lines sent to
//! [`Log::may`] are emitted only when the client was built with
//! `verbose(true)`. Both channels write to the configured logger function,
//! or to `tracing` at `INFO` when none was configured.

use std::fmt;
use std::sync::Arc;

/// A custom log sink receiving one formatted line per call.
pub type LogFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Logging collaborator with `must` and `may` channels.
#[derive(Clone)]
pub struct Log {
    verbose: bool,
    sink: Option<LogFn>,
}

impl Log {
    /// Creates a logger.
    #[must_use]
    pub fn new(verbose: bool, sink: Option<LogFn>) -> Self {
        Self { verbose, sink }
    }

    /// Returns whether the `may` channel is enabled.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Emits a line unconditionally.
    pub fn must(&self, parts: &[&dyn fmt::Display]) {
        self.emit(parts);
    }

    /// Emits a line only in verbose mode.
    pub fn may(&self, parts: &[&dyn fmt::Display]) {
        if self.verbose {
            self.emit(parts);
        }
    }

    fn emit(&self, parts: &[&dyn fmt::Display]) {
        let line = parts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");

        match &self.sink {
            Some(sink) => sink(&line),
            None => tracing::info!("{}", line),
        }
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("verbose", &self.verbose)
            .field("sink", &self.sink.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn capturing(verbose: bool) -> (Log, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&lines);
        let sink: LogFn = Arc::new(move |line| captured.lock().unwrap().push(line.to_string()));
        (Log::new(verbose, Some(sink)), lines)
    }

    #[test]
    fn test_must_always_emits() {
        let (log, lines) = capturing(false);
        log.must(&[&"[Url]", &"https://example.com"]);
        assert_eq!(*lines.lock().unwrap(), vec!["[Url] https://example.com"]);
    }

    #[test]
    fn test_may_is_silent_unless_verbose() {
        let (quiet, quiet_lines) = capturing(false);
        quiet.may(&[&"hidden"]);
        assert!(quiet_lines.lock().unwrap().is_empty());

        let (loud, loud_lines) = capturing(true);
        loud.may(&[&"[Result]", &42]);
        assert_eq!(*loud_lines.lock().unwrap(), vec!["[Result] 42"]);
    }

    #[test]
    fn test_default_sink_does_not_panic() {
        let log = Log::new(true, None);
        log.must(&[&"to tracing"]);
        log.may(&[&"to tracing"]);
    }
}
