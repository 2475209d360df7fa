use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the market data / auth service.
    pub base_url: String,
    /// Base URL of the AI orchestrator; defaults to `base_url` when the
    /// two are served together.
    #[serde(default)]
    pub ai_base_url: Option<String>,
}

impl BackendSettings {
    pub fn ai_base_url(&self) -> &str {
        self.ai_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// File holding the bearer token between runs.
    pub token_path: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { token_path: ".market_intel_token".to_string() }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .add_source(config::Environment::with_prefix("MARKET_INTEL").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_url_falls_back_to_base() {
        let settings = BackendSettings {
            base_url: "http://localhost:8000".to_string(),
            ai_base_url: None,
        };
        assert_eq!(settings.ai_base_url(), "http://localhost:8000");

        let settings = BackendSettings {
            base_url: "http://localhost:8000".to_string(),
            ai_base_url: Some("http://localhost:8001".to_string()),
        };
        assert_eq!(settings.ai_base_url(), "http://localhost:8001");
    }
}
