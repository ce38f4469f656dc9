//! Provider → manifest builder registry.
//!
//! # Responsibility
//! - Map each `ProviderId` to the function that builds its manifest.
//! - Render manifests to JSON text for the FFI layer.
//!
//! # Invariants
//! - One builder per provider; duplicate registration is rejected.
//! - Rendering has no side effects besides logging.
//! - The built-in registry is immutable after first access.

use crate::manifest::types::ProviderManifest;
use crate::model::provider::ProviderId;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Function that produces one provider's manifest.
pub type ManifestBuilder = fn() -> ProviderManifest;

static BUILTIN_REGISTRY: Lazy<ManifestRegistry> = Lazy::new(ManifestRegistry::with_builtins);

/// Returns the process-wide registry holding the built-in providers.
pub fn builtin_registry() -> &'static ManifestRegistry {
    &BUILTIN_REGISTRY
}

/// Registry of manifest builders keyed by provider.
#[derive(Debug, Default, Clone)]
pub struct ManifestRegistry {
    builders: BTreeMap<ProviderId, ManifestBuilder>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in provider registered.
    pub fn with_builtins() -> Self {
        let mut builders = BTreeMap::<ProviderId, ManifestBuilder>::new();
        builders.insert(ProviderId::OpenAi, ProviderManifest::openai);
        builders.insert(ProviderId::Anthropic, ProviderManifest::anthropic);
        Self { builders }
    }

    /// Registers one builder.
    pub fn register(
        &mut self,
        provider: ProviderId,
        builder: ManifestBuilder,
    ) -> Result<(), ManifestError> {
        if self.builders.contains_key(&provider) {
            return Err(ManifestError::DuplicateProvider(provider));
        }
        self.builders.insert(provider, builder);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Returns registered providers in ABI-code order.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.builders.keys().copied().collect()
    }

    /// Builds the manifest value for `provider`.
    pub fn manifest(&self, provider: ProviderId) -> Result<ProviderManifest, ManifestError> {
        self.builders
            .get(&provider)
            .map(|build| build())
            .ok_or(ManifestError::UnknownProvider(provider))
    }

    /// Renders the manifest for `provider` as compact JSON.
    ///
    /// # Side effects
    /// - Emits `manifest_render` logging events with size and duration.
    pub fn render(&self, provider: ProviderId) -> Result<String, ManifestError> {
        let started_at = Instant::now();
        let manifest = match self.manifest(provider) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(
                    "event=manifest_render module=manifest status=absent provider={} error={}",
                    provider, err
                );
                return Err(err);
            }
        };

        match serde_json::to_string(&manifest) {
            Ok(json) => {
                info!(
                    "event=manifest_render module=manifest status=ok provider={} bytes={} duration_ms={}",
                    provider,
                    json.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(json)
            }
            Err(err) => {
                error!(
                    "event=manifest_render module=manifest status=error provider={} error_code=serialize_failed error={}",
                    provider, err
                );
                Err(ManifestError::Serialize(err))
            }
        }
    }

    /// Renders one model's capability block as compact JSON.
    pub fn render_model_capabilities(
        &self,
        provider: ProviderId,
        model: &str,
    ) -> Result<String, ManifestError> {
        let manifest = self.manifest(provider)?;
        let capability =
            manifest
                .model_capabilities(model)
                .ok_or_else(|| ManifestError::ModelNotFound {
                    provider,
                    model: model.to_string(),
                })?;
        Ok(serde_json::to_string(capability)?)
    }
}

/// Manifest lookup and rendering errors.
#[derive(Debug)]
pub enum ManifestError {
    UnknownProvider(ProviderId),
    DuplicateProvider(ProviderId),
    ModelNotFound { provider: ProviderId, model: String },
    /// Caller-supplied JSON is not the expected document.
    Decode(serde_json::Error),
    Serialize(serde_json::Error),
}

impl Display for ManifestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProvider(provider) => {
                write!(f, "no manifest registered for provider: {provider}")
            }
            Self::DuplicateProvider(provider) => {
                write!(f, "manifest already registered for provider: {provider}")
            }
            Self::ModelNotFound { provider, model } => {
                write!(f, "model not found for provider {provider}: {model}")
            }
            Self::Decode(err) => write!(f, "capability document decode failed: {err}"),
            Self::Serialize(err) => write!(f, "manifest serialization failed: {err}"),
        }
    }
}

impl Error for ManifestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) | Self::Serialize(err) => Some(err),
            Self::UnknownProvider(_) | Self::DuplicateProvider(_) | Self::ModelNotFound { .. } => {
                None
            }
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
