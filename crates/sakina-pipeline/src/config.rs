//! Environment-driven service configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. Environment variable overrides (e.g. `SAKINA_GENERATOR_MODEL`)
//! 2. Built-in defaults
//!
//! ## Model roles
//!
//! | Role      | Used by           | Default            | Temperature |
//! |-----------|-------------------|--------------------|-------------|
//! | generator | primary drafting  | gpt-4o             | 0.7         |
//! | validator | safety assessment | gpt-4-1106-preview | 0.0         |
//!
//! The validator runs deterministic (temperature 0.0) because its output must
//! be consistently machine-parseable, not creative.

use std::env;
use std::time::Duration;

use crate::client::ModelParams;

/// Default OpenAI-compatible endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default primary generation model.
const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o";
/// Default safety validation model.
const DEFAULT_VALIDATOR_MODEL: &str = "gpt-4-1106-preview";
/// Output bound for both stages; the persona enforces brevity anyway.
const DEFAULT_MAX_TOKENS: u64 = 512;
/// Per-call provider deadline in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// How many trailing history messages the validator sees as context.
const DEFAULT_CONTEXT_WINDOW: usize = 3;

const ENV_BASE_URL: &str = "SAKINA_BASE_URL";
const ENV_API_KEY: &str = "SAKINA_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "OPENAI_API_KEY";
const ENV_GENERATOR_MODEL: &str = "SAKINA_GENERATOR_MODEL";
const ENV_VALIDATOR_MODEL: &str = "SAKINA_VALIDATOR_MODEL";
const ENV_REQUEST_TIMEOUT_SECS: &str = "SAKINA_REQUEST_TIMEOUT_SECS";

/// Completion provider endpoint and credential.
#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    pub base_url: String,
    /// `None` means no credential is configured; requests must fail before
    /// any provider call in that case.
    pub api_key: Option<String>,
}

/// Top-level configuration consumed by the service binary.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub provider: ProviderEndpoint,
    /// Primary generation parameters (moderate randomness, bounded output).
    pub generator: ModelParams,
    /// Validation parameters (deterministic, bounded output).
    pub validator: ModelParams,
    pub request_timeout_secs: u64,
    /// Trailing history messages rendered into the validator context block.
    pub context_window: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider: ProviderEndpoint {
                base_url: env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
                api_key: env::var(ENV_API_KEY)
                    .or_else(|_| env::var(ENV_API_KEY_FALLBACK))
                    .ok(),
            },
            generator: ModelParams {
                model: env::var(ENV_GENERATOR_MODEL)
                    .unwrap_or_else(|_| DEFAULT_GENERATOR_MODEL.into()),
                temperature: 0.7,
                max_tokens: DEFAULT_MAX_TOKENS,
            },
            validator: ModelParams {
                model: env::var(ENV_VALIDATOR_MODEL)
                    .unwrap_or_else(|_| DEFAULT_VALIDATOR_MODEL.into()),
                temperature: 0.0,
                max_tokens: DEFAULT_MAX_TOKENS,
            },
            request_timeout_secs: env::var(ENV_REQUEST_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl ServiceConfig {
    /// Build from environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Validate the config; return an error string if invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (role, params) in [("generator", &self.generator), ("validator", &self.validator)] {
            if params.model.trim().is_empty() {
                return Err(format!("{role} model must not be empty"));
            }
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(format!(
                    "{role} temperature must be in [0, 2], got {}",
                    params.temperature
                ));
            }
            if params.max_tokens == 0 {
                return Err(format!("{role} max_tokens must be > 0"));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".into());
        }
        if self.provider.base_url.trim().is_empty() {
            return Err("provider base_url must not be empty".into());
        }
        Ok(())
    }
}

/// How long the startup reachability probe waits for the provider.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe whether the completion endpoint answers its model-listing route.
///
/// Startup diagnostic only — a dead endpoint is logged, not fatal, since the
/// provider may come up later.
pub async fn check_endpoint(base_url: &str) -> bool {
    let probe = format!("{base_url}/models");
    reqwest::Client::new()
        .get(&probe)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map(|resp| resp.status().is_success())
        .unwrap_or(false)
}
