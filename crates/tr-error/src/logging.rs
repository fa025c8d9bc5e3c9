// SPDX-License-Identifier: MIT OR Apache-2.0
//! Emitting a [`ReportingError`] as a structured `tracing` event.

use tr_config::ReportingConfig;
use tracing::Level;

use crate::error::ReportingError;

macro_rules! emit {
    ($level:expr, $err:expr, $trace:expr) => {
        tracing::event!(
            target: "tune_reporting",
            $level,
            code = $err.code.value(),
            name = %$err.name,
            origin = %$err.origin,
            status = $err.status,
            request_trace = $trace,
            "{}",
            $err
        )
    };
}

impl ReportingError {
    /// Emit one `error`-level event with the default [`ReportingConfig`].
    pub fn log(&self) {
        self.log_with(&ReportingConfig::default());
    }

    /// Emit one event at the configured level.
    ///
    /// The request trace is only attached when
    /// [`ReportingConfig::log_request_trace()`] returns true.
    pub fn log_with(&self, config: &ReportingConfig) {
        let trace = if config.log_request_trace() {
            self.request_trace.as_deref()
        } else {
            None
        };
        // Callsite levels must be constants.
        let level = event_level(config);
        if level == Level::TRACE {
            emit!(Level::TRACE, self, trace);
        } else if level == Level::DEBUG {
            emit!(Level::DEBUG, self, trace);
        } else if level == Level::INFO {
            emit!(Level::INFO, self, trace);
        } else if level == Level::WARN {
            emit!(Level::WARN, self, trace);
        } else {
            emit!(Level::ERROR, self, trace);
        }
    }
}

fn event_level(config: &ReportingConfig) -> Level {
    config
        .log_level
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::ERROR)
}
