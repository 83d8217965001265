//! Listener that logs unknown items.

use provenance_db::UnknownItemListener;
use tracing::warn;

/// Reports misses as warnings: "X is not known".
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl UnknownItemListener for TracingListener {
    fn unknown_file(&self, label: &str) {
        warn!(item = label, "{} is not known", label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_usable_as_shared_listener() {
        let listener: Arc<dyn UnknownItemListener + Send + Sync> = Arc::new(TracingListener);
        listener.unknown_file("id: xxxx");
    }
}
