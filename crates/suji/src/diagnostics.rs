//! Warning reporting for recoverable input degeneracies.
//!
//! The tracing and fitting entry points never fail on degenerate but
//! well-formed input (an image smaller than 3x3, too few points for a
//! segment fit); they produce a benign result and report what happened
//! through a [`WarningSink`]. Callers choose where the messages go:
//! [`LogSink`] routes them to the `log` facade, [`NullSink`] discards them,
//! and `Vec<String>` collects them (handy in tests).

/// Destination for diagnostic warnings.
pub trait WarningSink {
    /// Report a single warning message.
    fn warn(&mut self, message: &str);
}

/// Sink that forwards warnings to [`log::warn!`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// Sink that discards all warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn warn(&mut self, _message: &str) {}
}

impl WarningSink for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_messages() {
        let mut sink = Vec::new();
        sink.warn("first");
        sink.warn("second");
        assert_eq!(sink, vec!["first".to_owned(), "second".to_owned()]);
    }

    #[test]
    fn null_sink_discards() {
        let mut sink = NullSink;
        sink.warn("nobody hears this");
    }
}
