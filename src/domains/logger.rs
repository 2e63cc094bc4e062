use std::sync::Arc;

/// Domain-level logging port (Hexagonal port).
/// The placement engine reports degraded fetches, skipped geometry and
/// verdicts through it; none of these calls may fail.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
