//! Provider capability manifest shape.
//!
//! Field order matters: `info` is declared first on `ProviderManifest` so the
//! serialized document always opens with `{"info"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete capability manifest published by one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderManifest {
    pub info: ProviderInfo,
    /// Models keyed by the provider's short lookup name.
    pub models: BTreeMap<String, ModelManifest>,
    pub authentication: AuthenticationRequirements,
    pub endpoints: EndpointConfiguration,
}

/// Provider identity block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Display name, e.g. `OpenAI`.
    pub name: String,
    /// Manifest semantic version string (`major.minor.patch`).
    pub version: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub support: Option<String>,
}

/// One model entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Wire identifier sent to the provider API.
    pub model_id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub capabilities: Capability,
    pub pricing: Option<PricingInfo>,
    pub status: ModelStatus,
    /// ISO-8601 date (`YYYY-MM-DD`).
    pub release_date: Option<String>,
}

/// Capability set for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub version: String,
    pub modalities: ModalitySupport,
    pub features: ModelFeatures,
    pub parameters: ControlParameters,
    pub roles: RoleSupport,
    pub limits: TokenLimits,
}

/// Stable feature names accepted by [`Capability::supports_feature`].
pub const FEATURE_NAMES: &[&str] = &[
    "function_calling",
    "json_mode",
    "streaming",
    "logprobs",
    "multiple_responses",
    "stop_sequences",
    "seed",
    "tool_use",
    "vision",
];

impl Capability {
    /// Returns whether `feature` is supported. Unknown names are unsupported.
    pub fn supports_feature(&self, feature: &str) -> bool {
        let features = &self.features;
        match feature {
            "function_calling" => features.function_calling,
            "json_mode" => features.json_mode,
            "streaming" => features.streaming,
            "logprobs" => features.logprobs,
            "multiple_responses" => features.multiple_responses,
            "stop_sequences" => features.stop_sequences,
            "seed" => features.seed_support,
            "tool_use" => features.tool_use,
            "vision" => features.vision,
            _ => false,
        }
    }
}

/// Content kinds a model accepts or emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalitySupport {
    pub input: Vec<Modality>,
    pub output: Vec<Modality>,
}

impl ModalitySupport {
    pub fn text_only() -> Self {
        Self {
            input: vec![Modality::Text],
            output: vec![Modality::Text],
        }
    }

    pub fn text_and_image() -> Self {
        Self {
            input: vec![Modality::Text, Modality::Image],
            output: vec![Modality::Text],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFeatures {
    pub function_calling: bool,
    pub json_mode: bool,
    pub streaming: bool,
    pub logprobs: bool,
    /// `n > 1` completions per request.
    pub multiple_responses: bool,
    pub stop_sequences: bool,
    pub seed_support: bool,
    /// Anthropic-style tool blocks, distinct from `function_calling`.
    pub tool_use: bool,
    pub vision: bool,
}

/// Sampling and length controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlParameters {
    pub temperature: ParameterSupport<f32>,
    pub top_p: ParameterSupport<f32>,
    pub top_k: ParameterSupport<i32>,
    pub max_tokens: ParameterSupport<i32>,
    pub frequency_penalty: ParameterSupport<f32>,
    pub presence_penalty: ParameterSupport<f32>,
}

/// Support flag plus optional bounds for one control parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSupport<T> {
    pub supported: bool,
    pub min: Option<T>,
    pub max: Option<T>,
    pub default: Option<T>,
}

impl<T> Default for ParameterSupport<T> {
    fn default() -> Self {
        Self {
            supported: false,
            min: None,
            max: None,
            default: None,
        }
    }
}

impl<T> ParameterSupport<T> {
    /// Supported parameter with inclusive bounds.
    pub fn bounded(min: T, max: T, default: Option<T>) -> Self {
        Self {
            supported: true,
            min: Some(min),
            max: Some(max),
            default,
        }
    }
}

impl<T: PartialOrd> ParameterSupport<T> {
    /// Returns `false` when both bounds are set and `min > max`.
    pub fn has_ordered_bounds(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSupport {
    pub system: bool,
    pub user: bool,
    pub assistant: bool,
    pub function: bool,
    pub tool: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLimits {
    pub max_context_window: Option<u32>,
    pub max_output_tokens: Option<u32>,
    /// Tokenizer name, e.g. `cl100k_base`.
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInfo {
    pub input_price_per_1k: Option<f64>,
    pub output_price_per_1k: Option<f64>,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Available,
    Preview,
    Beta,
    Deprecated,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    ApiKey,
    BearerToken,
    #[serde(rename = "oauth2")]
    OAuth2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationRequirements {
    pub auth_type: AuthType,
    pub required_headers: Vec<String>,
    pub required_env_vars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfiguration {
    pub base_url: String,
    pub chat_endpoint: Option<String>,
    pub completions_endpoint: Option<String>,
    pub embeddings_endpoint: Option<String>,
}

impl ProviderManifest {
    /// Returns capabilities for one model lookup name.
    pub fn model_capabilities(&self, model: &str) -> Option<&Capability> {
        self.models.get(model).map(|entry| &entry.capabilities)
    }

    /// Returns sorted model lookup names.
    pub fn model_ids(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Returns whether `model` exists and supports `feature`.
    pub fn model_supports_feature(&self, model: &str, feature: &str) -> bool {
        self.model_capabilities(model)
            .map(|capability| capability.supports_feature(feature))
            .unwrap_or(false)
    }
}
