use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cohortlens_core::models::prompt::{ModelParameters, PromptTemplates};
use cohortlens_summarize::bedrock::DEFAULT_MODEL_ID;
use cohortlens_summarize::orchestrate::GenerateOptions;

/// Schema version written by [`save_config`].
/// Older files are upgraded by [`migrate`] on load.
const CURRENT_VERSION: u32 = 1;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub model_parameters: ModelParameters,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// `None` means no credential is configured; summarization then fails
    /// per call with the fixed error text instead of reaching AWS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialSource>,
    /// Saved template overrides. `None` = built-in defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptTemplates>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            region: default_region(),
            model_id: default_model_id(),
            model_parameters: ModelParameters::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            credentials: None,
            prompts: None,
        }
    }
}

impl AppConfig {
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            params: self.model_parameters.clone(),
            timeout: Duration::from_secs(self.effective_timeout_secs()),
        }
    }

    /// Configured per-call timeout; `0` falls back to the default.
    pub fn effective_timeout_secs(&self) -> u64 {
        match self.request_timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        }
    }

    pub fn prompt_templates(&self) -> PromptTemplates {
        self.prompts.clone().unwrap_or_default()
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    Inline {
        access_key_id: String,
        secret_access_key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_token: Option<String>,
    },
    Profile {
        profile_name: String,
    },
    DefaultChain,
}

/// Redacted config info safe to print.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub region: String,
    pub model_id: String,
    pub request_timeout_secs: u64,
    pub credential_type: String,
    pub profile_name: Option<String>,
    pub access_key_hint: Option<String>,
    pub custom_prompts: bool,
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.cohortlens").join("config.json"))
}

/// Load the config at `path`, or defaults if no file exists yet.
pub fn load_config(path: &Path) -> eyre::Result<AppConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version") {
        None | Some(serde_json::Value::Null) => 0,
        Some(value) => value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| eyre::eyre!("unsupported config_version: {value}"))?,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: AppConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update cohortlens."
        ));
    }

    // v0 → v1: same shape, only the version stamp is missing.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1");
    }

    Ok(json)
}

pub fn save_config(config: &AppConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // May hold an inline secret key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` is `std::env::var(..).ok()` in the binary; tests pass a map.
/// Inline AWS keys win over `AWS_PROFILE`, and either replaces whatever
/// credential the file named.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(region) = non_empty("COHORTLENS_REGION") {
        config.region = region;
    }
    if let Some(model_id) = non_empty("COHORTLENS_MODEL_ID") {
        config.model_id = model_id;
    }

    if let (Some(access_key_id), Some(secret_access_key)) = (
        non_empty("AWS_ACCESS_KEY_ID"),
        non_empty("AWS_SECRET_ACCESS_KEY"),
    ) {
        config.credentials = Some(CredentialSource::Inline {
            access_key_id,
            secret_access_key,
            session_token: non_empty("AWS_SESSION_TOKEN"),
        });
    } else if let Some(profile_name) = non_empty("AWS_PROFILE") {
        config.credentials = Some(CredentialSource::Profile { profile_name });
    }
}

pub fn config_info(config: &AppConfig) -> ConfigInfo {
    let (credential_type, profile_name, access_key_hint) = match &config.credentials {
        Some(CredentialSource::Inline {
            access_key_id,
            session_token,
            ..
        }) => {
            let cred_type = if session_token.is_some() {
                "temporary".to_string()
            } else {
                "inline".to_string()
            };
            (cred_type, None, Some(redact_access_key(access_key_id)))
        }
        Some(CredentialSource::Profile { profile_name }) => {
            ("profile".to_string(), Some(profile_name.clone()), None)
        }
        Some(CredentialSource::DefaultChain) => ("default_chain".to_string(), None, None),
        None => ("none".to_string(), None, None),
    };

    ConfigInfo {
        region: config.region.clone(),
        model_id: config.model_id.clone(),
        request_timeout_secs: config.effective_timeout_secs(),
        credential_type,
        profile_name,
        access_key_hint,
        custom_prompts: config.prompts.is_some(),
    }
}

fn redact_access_key(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}...{suffix}")
}
