//! Provider capability manifests.
//!
//! # Responsibility
//! - Define the manifest document shape and built-in content.
//! - Select and render manifests through one parameterized registry.
//! - Compare two capability sets and report what a switch would lose.
//!
//! # Invariants
//! - Rendered manifests are complete JSON documents opening with `{"info"`.
//! - Adding a provider is a registry entry, not a new entrypoint.

mod builtin;
pub mod comparison;
pub mod registry;
pub mod schema;
pub mod types;

pub use comparison::{
    render_comparison, CapabilityComparison, ConstraintDifference, LossinessImpact, LossinessReport,
    LossinessSeverity, LossinessType,
};
pub use registry::{builtin_registry, ManifestBuilder, ManifestError, ManifestRegistry};
pub use schema::ManifestSchemaError;
pub use types::{
    AuthType, AuthenticationRequirements, Capability, ControlParameters, EndpointConfiguration,
    Modality, ModalitySupport, ModelFeatures, ModelManifest, ModelStatus, ParameterSupport,
    PricingInfo, ProviderInfo, ProviderManifest, RoleSupport, TokenLimits, FEATURE_NAMES,
};
