//! Core manifest logic for provcap.
//! This crate owns manifest content, provider selection and payload
//! validation; it knows nothing about raw pointers.

pub mod logging;
pub mod manifest;
pub mod model;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status, sanitize_message};
pub use manifest::{
    builtin_registry, render_comparison, Capability, CapabilityComparison, LossinessSeverity,
    ManifestError, ManifestRegistry, ManifestSchemaError, ProviderManifest,
};
pub use model::provider::{ProviderId, ProviderIdError};
pub use validate::{
    smoke_check, strict_check, InvalidReason, ValidationMode, ValidationResult, MANIFEST_PREFIX,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
