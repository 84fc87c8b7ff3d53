use super::Orchestrator;

impl Orchestrator {
    /// Clear every in-memory map and, if persistence is configured, truncate
    /// both mirror tables. Internal-only: not exposed over HTTP, no owner
    /// scoping. Used by tests and the CLI's `debug-reset` subcommand.
    pub fn debug_reset(&self) {
        {
            let mut inner = self.store.lock();
            inner.clear();
        }
        self.persist_truncate();
    }
}
