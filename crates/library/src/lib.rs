pub mod associate;
pub mod diagnostic;
pub mod error;
pub mod merge;
mod output;

pub use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
pub use crate::output::write_associations;
use sidecar_config::{AssociateConfig, DEFAULT_MARKER};
use sidecar_record::RowPolicy;

/// Settings shared by every directory an engine processes.
///
/// Built from the loaded configuration by the binary and passed down
/// explicitly; nothing in this crate reads global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Literal marker identifying metadata sidecar file names.
    pub marker: String,
    /// Decides what multi-row metadata documents yield.
    pub rows: RowPolicy,
}
impl Default for Context {
    fn default() -> Self {
        Self { marker: DEFAULT_MARKER.to_string(), rows: RowPolicy::default() }
    }
}
impl From<&AssociateConfig> for Context {
    fn from(config: &AssociateConfig) -> Self {
        Self { marker: config.marker.clone(), rows: config.rows }
    }
}
