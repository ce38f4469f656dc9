//! Structural validation for decoded provider manifests.
//!
//! # Invariants
//! - Validation never mutates the manifest.
//! - The first violated rule is reported; rule order is stable.

use crate::manifest::types::{ControlParameters, ProviderManifest};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_BASE_URL_SCHEME: &str = "https://";

impl ProviderManifest {
    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestSchemaError> {
        if self.info.name.trim().is_empty() {
            return Err(ManifestSchemaError::EmptyProviderName);
        }
        if self.info.version.trim().is_empty() {
            return Err(ManifestSchemaError::EmptyVersion);
        }
        if !is_semver_triplet(self.info.version.trim()) {
            return Err(ManifestSchemaError::InvalidVersion(
                self.info.version.clone(),
            ));
        }

        if self.models.is_empty() {
            return Err(ManifestSchemaError::MissingModels);
        }
        for (key, model) in &self.models {
            if model.model_id.trim().is_empty() {
                return Err(ManifestSchemaError::EmptyModelId(key.clone()));
            }
            if model.display_name.trim().is_empty() {
                return Err(ManifestSchemaError::EmptyDisplayName(key.clone()));
            }
            if let Some(name) = unordered_parameter(&model.capabilities.parameters) {
                return Err(ManifestSchemaError::InvertedBounds {
                    model: key.clone(),
                    parameter: name,
                });
            }
        }

        if !self
            .endpoints
            .base_url
            .trim()
            .starts_with(REQUIRED_BASE_URL_SCHEME)
        {
            return Err(ManifestSchemaError::InsecureBaseUrl(
                self.endpoints.base_url.clone(),
            ));
        }
        Ok(())
    }
}

fn unordered_parameter(parameters: &ControlParameters) -> Option<&'static str> {
    if !parameters.temperature.has_ordered_bounds() {
        return Some("temperature");
    }
    if !parameters.top_p.has_ordered_bounds() {
        return Some("top_p");
    }
    if !parameters.top_k.has_ordered_bounds() {
        return Some("top_k");
    }
    if !parameters.max_tokens.has_ordered_bounds() {
        return Some("max_tokens");
    }
    if !parameters.frequency_penalty.has_ordered_bounds() {
        return Some("frequency_penalty");
    }
    if !parameters.presence_penalty.has_ordered_bounds() {
        return Some("presence_penalty");
    }
    None
}

fn is_semver_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    if parts.len() != 3 {
        return false;
    }
    parts
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Manifest schema violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSchemaError {
    EmptyProviderName,
    EmptyVersion,
    InvalidVersion(String),
    MissingModels,
    EmptyModelId(String),
    EmptyDisplayName(String),
    InvertedBounds {
        model: String,
        parameter: &'static str,
    },
    InsecureBaseUrl(String),
}

impl Display for ManifestSchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProviderName => write!(f, "manifest info.name must not be empty"),
            Self::EmptyVersion => write!(f, "manifest info.version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest info.version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingModels => write!(f, "manifest models must not be empty"),
            Self::EmptyModelId(key) => write!(f, "model `{key}` has an empty model_id"),
            Self::EmptyDisplayName(key) => {
                write!(f, "model `{key}` has an empty display_name")
            }
            Self::InvertedBounds { model, parameter } => {
                write!(f, "model `{model}` parameter `{parameter}` has min > max")
            }
            Self::InsecureBaseUrl(value) => {
                write!(f, "endpoints.base_url must use https: {value}")
            }
        }
    }
}

impl Error for ManifestSchemaError {}
