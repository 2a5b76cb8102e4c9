//! User settings for AIMS
//!
//! Manages user preferences including the budget-to-transaction scoping rule,
//! where the field-encryption key comes from, and the nutrition lookup.

use serde::{Deserialize, Serialize};

use super::paths::AimsPaths;
use crate::crypto::SecretKey;
use crate::error::{AimsError, AimsResult};
use crate::reports::BudgetScope;

/// Default environment variable holding the field-encryption key
pub const DEFAULT_KEY_ENV: &str = "AIMS_FIELD_KEY";

/// Field-encryption settings
///
/// The key itself is never written to disk; only the name of the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionSettings {
    /// Environment variable holding the URL-safe base64 key
    #[serde(default = "default_key_env")]
    pub key_env: String,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
        }
    }
}

/// Nutrition lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionSettings {
    /// Whether food text is sent to the lookup service at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Natural-language nutrients endpoint
    #[serde(default = "default_nutrition_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the application id
    #[serde(default = "default_app_id_env")]
    pub app_id_env: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NutritionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_nutrition_endpoint(),
            app_id_env: default_app_id_env(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User settings for AIMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Diagnostic log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Which transactions count against a month's budget
    #[serde(default)]
    pub budget_scope: BudgetScope,

    /// Field-encryption settings
    #[serde(default)]
    pub encryption: EncryptionSettings,

    /// Nutrition lookup settings
    #[serde(default)]
    pub nutrition: NutritionSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_key_env() -> String {
    DEFAULT_KEY_ENV.to_string()
}

fn default_true() -> bool {
    true
}

fn default_nutrition_endpoint() -> String {
    "https://trackapi.nutritionix.com/v2/natural/nutrients".to_string()
}

fn default_app_id_env() -> String {
    "AIMS_NUTRITION_APP_ID".to_string()
}

fn default_api_key_env() -> String {
    "AIMS_NUTRITION_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
            budget_scope: BudgetScope::default(),
            encryption: EncryptionSettings::default(),
            nutrition: NutritionSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AimsPaths) -> Result<Self, AimsError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AimsError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| AimsError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AimsPaths) -> Result<(), AimsError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AimsError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AimsError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Load the field-encryption key named by these settings
    ///
    /// # Errors
    ///
    /// `Config` when the variable is unset or empty, `Encryption` when it
    /// does not hold a valid key. Both are fatal at startup.
    pub fn load_key(&self) -> AimsResult<SecretKey> {
        SecretKey::from_env(&self.encryption.key_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.budget_scope, BudgetScope::BudgetMonth);
        assert_eq!(settings.encryption.key_env, "AIMS_FIELD_KEY");
        assert!(settings.nutrition.enabled);
        assert_eq!(settings.nutrition.timeout_secs, 10);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.budget_scope = BudgetScope::AllTime;
        settings.nutrition.enabled = false;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.budget_scope, BudgetScope::AllTime);
        assert!(!loaded.nutrition.enabled);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "₹"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.budget_scope, BudgetScope::BudgetMonth);
    }

    #[test]
    fn test_load_key_missing_is_config_error() {
        let mut settings = Settings::default();
        settings.encryption.key_env = "AIMS_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let err = settings.load_key().unwrap_err();
        assert!(matches!(err, AimsError::Config(_)));
    }
}
