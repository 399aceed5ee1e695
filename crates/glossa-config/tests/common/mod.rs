// crates/glossa-config/tests/common/mod.rs
// =============================================================================
// Module: Glossa Config Test Helpers
// Description: TOML fixtures and assertion helpers for config tests.
// Purpose: Reduce duplication across glossa-config integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use glossa_config::ConfigError;
use glossa_config::GlossaConfig;

pub type TestResult = Result<(), String>;

/// Smallest valid configuration.
pub const MINIMAL_TOML: &str = r#"
[languages]
supported = ["en", "en-GB", "de"]
default = "en"
"#;

/// Language section with English only.
pub const ENGLISH_ONLY: &str = "[languages]\nsupported = [\"en\"]\ndefault = \"en\"\n";

/// Parses and validates `rest` appended to [`ENGLISH_ONLY`].
pub fn english_only(rest: &str) -> Result<GlossaConfig, ConfigError> {
    config_from_toml(&format!("{ENGLISH_ONLY}{rest}"))
}

/// Parses and validates `content`.
pub fn config_from_toml(content: &str) -> Result<GlossaConfig, ConfigError> {
    GlossaConfig::from_toml(content)
}

/// Returns the minimal configuration.
pub fn minimal_config() -> Result<GlossaConfig, String> {
    config_from_toml(MINIMAL_TOML).map_err(|err| err.to_string())
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
