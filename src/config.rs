use crate::error::{ProviderError, Result};

/// Tunable behavior of the resolution engine.
///
/// Defaults match the behavior of the original selection pipeline; the env
/// overrides exist so embedding hosts can reconfigure a deployment without
/// code changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Install the built-in JSON/text body converters into every registry's
    /// default-converter tier.
    pub install_default_converters: bool,
    /// Skip the per-candidate capability check when no request context is
    /// supplied and exactly one candidate survives filtering. Media-type and
    /// type-compatibility checks always run.
    pub single_candidate_fast_path: bool,
    /// Require non-`q` media type parameters to match exactly when both the
    /// requested and the declared type carry them.
    pub strict_parameter_matching: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            install_default_converters: true,
            single_candidate_fast_path: true,
            strict_parameter_matching: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("PROVIDER_CORE_INSTALL_DEFAULT_CONVERTERS") {
            config.install_default_converters = parse_bool("install_default_converters", &value)?;
        }

        if let Ok(value) = std::env::var("PROVIDER_CORE_SINGLE_CANDIDATE_FAST_PATH") {
            config.single_candidate_fast_path = parse_bool("single_candidate_fast_path", &value)?;
        }

        if let Ok(value) = std::env::var("PROVIDER_CORE_STRICT_PARAMETER_MATCHING") {
            config.strict_parameter_matching = parse_bool("strict_parameter_matching", &value)?;
        }

        Ok(config)
    }
}

fn parse_bool(setting: &str, value: &str) -> Result<bool> {
    value
        .trim()
        .parse()
        .map_err(|_| ProviderError::configuration(setting, format!("expected true/false, got '{value}'")))
}
