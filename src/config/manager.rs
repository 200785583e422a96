use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY, RetryPolicy};
use crate::cache::DEFAULT_EXPIRATION_DAYS;
use crate::endpoint::{
    DEFAULT_TIMEOUT_SECONDS, EndpointCategory, EndpointGroup, MAX_ENDPOINTS,
};
use crate::paths;
use crate::speech::{GOOGLE_TTS_ENDPOINT, SpeechProvider};

const fn default_retry_count() -> u32 {
    DEFAULT_RETRY_COUNT
}

const fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY.as_millis() as u64
}

const fn default_expiration_days() -> u32 {
    DEFAULT_EXPIRATION_DAYS
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_language() -> String {
    "en".to_string()
}

fn default_google_endpoint() -> String {
    GOOGLE_TTS_ENDPOINT.to_string()
}

fn default_localai_model() -> String {
    "tts-1".to_string()
}

fn default_response_format() -> String {
    "mp3".to_string()
}

/// Endpoint groups, one per request category (`[endpoints.*]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default)]
    pub translate: EndpointGroup,
    #[serde(default)]
    pub fix_grammar: EndpointGroup,
    #[serde(default)]
    pub learn_grammar: EndpointGroup,
}

impl EndpointsConfig {
    pub const fn get(&self, category: EndpointCategory) -> &EndpointGroup {
        match category {
            EndpointCategory::Translate => &self.translate,
            EndpointCategory::FixGrammar => &self.fix_grammar,
            EndpointCategory::LearnGrammar => &self.learn_grammar,
        }
    }
}

/// Single-endpoint retry settings (`[retry]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_count")]
    pub count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            count: default_retry_count(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Which speech backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProviderKind {
    #[default]
    Google,
    LocalAi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleTtsConfig {
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAiTtsConfig {
    pub endpoint: String,
    #[serde(default = "default_localai_model")]
    pub model: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
}

/// Text-to-speech settings (`[tts]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default)]
    pub provider: TtsProviderKind,
    /// Language used when `speak` is not given one.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_expiration_days")]
    pub cache_expiration_days: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<GoogleTtsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localai: Option<LocalAiTtsConfig>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProviderKind::default(),
            language: default_language(),
            cache_expiration_days: default_expiration_days(),
            timeout_seconds: default_timeout_seconds(),
            google: None,
            localai: None,
        }
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/clipling/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub tts: TtsConfig,
}

impl ConfigFile {
    /// Returns the group for `category`, naming any unnamed endpoint
    /// `endpoint-{n}` after its 1-based position.
    pub fn group(&self, category: EndpointCategory) -> EndpointGroup {
        let mut group = self.endpoints.get(category).clone();
        for (position, endpoint) in group.endpoints.iter_mut().enumerate() {
            if endpoint.name.trim().is_empty() {
                endpoint.name = format!("endpoint-{}", position + 1);
            }
        }
        group
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.count,
            Duration::from_millis(self.retry.delay_ms),
        )
    }

    pub const fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.tts.timeout_seconds)
    }

    /// Resolves the configured speech backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider's section is missing or has
    /// no endpoint.
    pub fn speech_provider(&self) -> Result<SpeechProvider> {
        match self.tts.provider {
            TtsProviderKind::Google => {
                let endpoint = self
                    .tts
                    .google
                    .as_ref()
                    .map_or_else(default_google_endpoint, |google| google.endpoint.clone());
                if endpoint.trim().is_empty() {
                    bail!("[tts.google] endpoint must not be empty");
                }
                Ok(SpeechProvider::Google { endpoint })
            }
            TtsProviderKind::LocalAi => {
                let Some(local) = self.tts.localai.as_ref() else {
                    bail!(
                        "TTS provider 'localai' selected but [tts.localai] is missing\n\n\
                         Add it to ~/.config/clipling/config.toml:\n  \
                         [tts.localai]\n  \
                         endpoint = \"http://localhost:8080/v1/audio/speech\""
                    );
                };
                if local.endpoint.trim().is_empty() {
                    bail!("[tts.localai] endpoint must not be empty");
                }
                Ok(SpeechProvider::LocalAi {
                    endpoint: local.endpoint.clone(),
                    model: local.model.clone(),
                    response_format: local.response_format.clone(),
                })
            }
        }
    }

    /// Checks limits the file format cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending section.
    pub fn validate(&self) -> Result<()> {
        for category in EndpointCategory::ALL {
            let count = self.endpoints.get(category).endpoints.len();
            if count > MAX_ENDPOINTS {
                bail!(
                    "[endpoints.{category}] has {count} endpoints; at most {MAX_ENDPOINTS} are supported"
                );
            }
        }

        if self.tts.cache_expiration_days == 0 {
            bail!("[tts] cache_expiration_days must be at least 1");
        }

        Ok(())
    }
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/clipling/config.toml`
    /// or `~/.config/clipling/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;
        config_file.validate()?;

        Ok(config_file)
    }

    /// Loads the config, or the defaults when no file exists yet.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        match fs::metadata(&self.config_path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::default()),
            _ => self.load(),
        }
    }
}
