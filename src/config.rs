use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: String,
    pub namespace: String,  // prefix for every redis key
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub templates_dir: String,
    pub toast_dismiss_ms: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by the in-crate tests: memory storage and an auth
    /// endpoint nothing listens on.
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig { host: "127.0.0.1".into(), port: 0 },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis_url: String::new(),
                namespace: "test".into(),
            },
            auth: AuthConfig { base_url: "http://127.0.0.1:9/api/auth".into() },
            ui: UiConfig { templates_dir: "templates".into(), toast_dismiss_ms: 3000 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_deserializes() {
        let config = Config::load().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.ui.toast_dismiss_ms, 3000);
        assert!(config.auth.base_url.ends_with("/api/auth"));
    }
}
