mod manager;

pub use manager::{
    ConfigFile, ConfigManager, EndpointsConfig, GoogleTtsConfig, LocalAiTtsConfig, RetryConfig,
    TtsConfig, TtsProviderKind,
};
