use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub bedrock: BedrockConfig,
    pub rag: RagSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// AWS Bedrock bindings: which model to invoke and which knowledge base
/// to retrieve from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BedrockConfig {
    /// AWS region override; SDK default chain applies when unset
    pub region: Option<String>,
    pub model_id: String,
    pub knowledge_base_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub top_k: u32,
    pub score_threshold: f32,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    /// Pause between streamed words, in milliseconds
    pub stream_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: None,
            model_id: String::new(),
            knowledge_base_id: String::new(),
        }
    }
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.0,
            max_tokens: 1024,
            temperature: 0.5,
            system_prompt: "You are a helpful assistant.".to_string(),
            stream_delay_ms: 50,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_env_overrides();

        Ok(config)
    }

    /// Deployment environments set these bare variable names; they win over
    /// file and `APP__`-prefixed values.
    fn apply_env_overrides(&mut self) {
        if let Ok(model_id) = std::env::var("MODEL_ID") {
            if !model_id.is_empty() {
                self.bedrock.model_id = model_id;
            }
        }

        if let Ok(kb_id) = std::env::var("KNOWLEDGE_BASE_ID") {
            if !kb_id.is_empty() {
                self.bedrock.knowledge_base_id = kb_id;
            }
        }

        if let Ok(region) = std::env::var("AWS_REGION") {
            if !region.is_empty() {
                self.bedrock.region = Some(region);
            }
        }
    }

    /// Validate that the Bedrock bindings required to serve requests are set
    pub fn validate(&self) -> Result<(), String> {
        if self.bedrock.model_id.is_empty() {
            return Err("bedrock.model_id is not configured (set MODEL_ID)".to_string());
        }

        if self.bedrock.knowledge_base_id.is_empty() {
            return Err(
                "bedrock.knowledge_base_id is not configured (set KNOWLEDGE_BASE_ID)".to_string(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.rag.max_tokens, 1024);
        assert_eq!(config.rag.temperature, 0.5);
        assert_eq!(config.rag.stream_delay_ms, 50);
        assert_eq!(config.rag.system_prompt, "You are a helpful assistant.");
    }

    #[test]
    fn test_validate_requires_bedrock_bindings() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_err());

        config.bedrock.model_id = "anthropic.claude-3-sonnet-20240229-v1:0".to_string();
        assert!(config.validate().is_err());

        config.bedrock.knowledge_base_id = "kb-12345".to_string();
        assert!(config.validate().is_ok());
    }
}
