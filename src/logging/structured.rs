use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Fields attached to every line a logger emits
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Component name (e.g., "api", "tariffs", "web")
    pub component: String,
    pub extra_fields: BTreeMap<String, String>,
}

impl LogContext {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            extra_fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.extra_fields.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component={}", self.component)?;
        for (key, value) in &self.extra_fields {
            write!(f, ",{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Logger that prefixes each event with its [`LogContext`]
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    pub(crate) context: LogContext,
}

impl StructuredLogger {
    pub fn new(context: LogContext) -> Self {
        Self { context }
    }

    /// Derived logger carrying one more field, e.g. the cache key of a fetch
    pub fn with_field(&self, key: &str, value: impl Into<String>) -> Self {
        Self::new(self.context.clone().with_field(key, value))
    }

    pub fn info(&self, message: &str) {
        info!(fields = %self.context, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(fields = %self.context, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(fields = %self.context, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!(fields = %self.context, "{}", message);
    }
}

/// Create a logger for a specific component
pub fn get_logger(component: &str) -> StructuredLogger {
    StructuredLogger::new(LogContext::new(component))
}

/// Create a logger with full context
pub fn get_logger_with_context(context: LogContext) -> StructuredLogger {
    StructuredLogger::new(context)
}
