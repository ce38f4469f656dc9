//! Built-in manifest content for the known providers.
//!
//! Content is illustrative data; only its shape is relied upon.

use crate::manifest::types::{
    AuthType, AuthenticationRequirements, Capability, ControlParameters, EndpointConfiguration,
    ModalitySupport, ModelFeatures, ModelManifest, ModelStatus, ParameterSupport, PricingInfo,
    ProviderInfo, ProviderManifest, RoleSupport, TokenLimits,
};
use crate::model::provider::ProviderId;
use std::collections::BTreeMap;

const CAPABILITY_SCHEMA_VERSION: &str = "0.1.0";
const MANIFEST_VERSION: &str = "1.0.0";

impl ProviderManifest {
    /// Returns the built-in manifest for `provider`.
    pub fn builtin(provider: ProviderId) -> Self {
        match provider {
            ProviderId::OpenAi => Self::openai(),
            ProviderId::Anthropic => Self::anthropic(),
        }
    }

    pub fn openai() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "gpt-4-turbo".to_string(),
            ModelManifest {
                model_id: "gpt-4-turbo".to_string(),
                display_name: "GPT-4 Turbo".to_string(),
                description: Some(
                    "Most capable GPT-4 model with vision and function calling".to_string(),
                ),
                capabilities: Capability {
                    version: CAPABILITY_SCHEMA_VERSION.to_string(),
                    modalities: ModalitySupport::text_and_image(),
                    features: ModelFeatures {
                        vision: true,
                        ..openai_features()
                    },
                    parameters: openai_parameters(),
                    roles: openai_roles(),
                    limits: TokenLimits {
                        max_context_window: Some(128_000),
                        max_output_tokens: Some(4096),
                        encoding: Some("cl100k_base".to_string()),
                    },
                },
                pricing: Some(usd_pricing(0.01, 0.03)),
                status: ModelStatus::Available,
                release_date: Some("2024-04-09".to_string()),
            },
        );
        models.insert(
            "gpt-3.5-turbo".to_string(),
            ModelManifest {
                model_id: "gpt-3.5-turbo".to_string(),
                display_name: "GPT-3.5 Turbo".to_string(),
                description: Some("Fast and efficient model for most tasks".to_string()),
                capabilities: Capability {
                    version: CAPABILITY_SCHEMA_VERSION.to_string(),
                    modalities: ModalitySupport::text_only(),
                    features: openai_features(),
                    parameters: openai_parameters(),
                    roles: openai_roles(),
                    limits: TokenLimits {
                        max_context_window: Some(16_385),
                        max_output_tokens: Some(4096),
                        encoding: Some("cl100k_base".to_string()),
                    },
                },
                pricing: Some(usd_pricing(0.0005, 0.0015)),
                status: ModelStatus::Available,
                release_date: Some("2023-06-13".to_string()),
            },
        );

        Self {
            info: ProviderInfo {
                name: ProviderId::OpenAi.display_name().to_string(),
                version: MANIFEST_VERSION.to_string(),
                description: Some("OpenAI API provider for GPT models".to_string()),
                website: Some("https://openai.com".to_string()),
                support: Some("https://help.openai.com".to_string()),
            },
            models,
            authentication: AuthenticationRequirements {
                auth_type: AuthType::ApiKey,
                required_headers: vec!["Authorization".to_string()],
                required_env_vars: vec!["OPENAI_API_KEY".to_string()],
            },
            endpoints: EndpointConfiguration {
                base_url: "https://api.openai.com/v1".to_string(),
                chat_endpoint: Some("/chat/completions".to_string()),
                completions_endpoint: Some("/completions".to_string()),
                embeddings_endpoint: Some("/embeddings".to_string()),
            },
        }
    }

    pub fn anthropic() -> Self {
        let mut models = BTreeMap::new();
        // Lookup key is the short family name; model_id is the dated wire id.
        models.insert(
            "claude-3-opus".to_string(),
            ModelManifest {
                model_id: "claude-3-opus-20240229".to_string(),
                display_name: "Claude 3 Opus".to_string(),
                description: Some("Most capable Claude model for complex tasks".to_string()),
                capabilities: Capability {
                    version: CAPABILITY_SCHEMA_VERSION.to_string(),
                    modalities: ModalitySupport::text_and_image(),
                    features: ModelFeatures {
                        streaming: true,
                        stop_sequences: true,
                        tool_use: true,
                        vision: true,
                        ..ModelFeatures::default()
                    },
                    parameters: ControlParameters {
                        temperature: ParameterSupport::bounded(0.0, 1.0, Some(1.0)),
                        top_p: ParameterSupport::bounded(0.0, 1.0, None),
                        top_k: ParameterSupport::bounded(1, 100, None),
                        max_tokens: ParameterSupport::bounded(1, 4096, None),
                        ..ControlParameters::default()
                    },
                    roles: RoleSupport {
                        system: true,
                        user: true,
                        assistant: true,
                        function: false,
                        tool: true,
                    },
                    limits: TokenLimits {
                        max_context_window: Some(200_000),
                        max_output_tokens: Some(4096),
                        encoding: None,
                    },
                },
                pricing: Some(usd_pricing(0.015, 0.075)),
                status: ModelStatus::Available,
                release_date: Some("2024-02-29".to_string()),
            },
        );

        Self {
            info: ProviderInfo {
                name: ProviderId::Anthropic.display_name().to_string(),
                version: MANIFEST_VERSION.to_string(),
                description: Some("Anthropic API provider for Claude models".to_string()),
                website: Some("https://anthropic.com".to_string()),
                support: Some("https://support.anthropic.com".to_string()),
            },
            models,
            authentication: AuthenticationRequirements {
                auth_type: AuthType::ApiKey,
                required_headers: vec!["x-api-key".to_string(), "anthropic-version".to_string()],
                required_env_vars: vec!["ANTHROPIC_API_KEY".to_string()],
            },
            endpoints: EndpointConfiguration {
                base_url: "https://api.anthropic.com".to_string(),
                chat_endpoint: Some("/v1/messages".to_string()),
                completions_endpoint: None,
                embeddings_endpoint: None,
            },
        }
    }
}

fn openai_features() -> ModelFeatures {
    ModelFeatures {
        function_calling: true,
        json_mode: true,
        streaming: true,
        logprobs: true,
        multiple_responses: true,
        stop_sequences: true,
        seed_support: true,
        tool_use: false,
        vision: false,
    }
}

fn openai_parameters() -> ControlParameters {
    ControlParameters {
        temperature: ParameterSupport::bounded(0.0, 2.0, Some(1.0)),
        top_p: ParameterSupport::bounded(0.0, 1.0, Some(1.0)),
        top_k: ParameterSupport::default(),
        max_tokens: ParameterSupport::bounded(1, 4096, None),
        frequency_penalty: ParameterSupport::bounded(-2.0, 2.0, Some(0.0)),
        presence_penalty: ParameterSupport::bounded(-2.0, 2.0, Some(0.0)),
    }
}

fn openai_roles() -> RoleSupport {
    RoleSupport {
        system: true,
        user: true,
        assistant: true,
        function: true,
        tool: false,
    }
}

fn usd_pricing(input: f64, output: f64) -> PricingInfo {
    PricingInfo {
        input_price_per_1k: Some(input),
        output_price_per_1k: Some(output),
        currency: "USD".to_string(),
    }
}
