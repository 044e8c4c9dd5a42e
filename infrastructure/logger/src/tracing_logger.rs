use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// Domain logger backed by `tracing`, tagging every event with the
/// component that emitted it.
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(component = self.component, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(component = self.component, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(component = self.component, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(component = self.component, "{}", message);
    }
}
