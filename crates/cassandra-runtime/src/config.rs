//! Runtime configuration.
//!
//! Configuration is resolved once at startup, in this order (later wins):
//!
//! 1. Built-in defaults
//! 2. An optional YAML or JSON file, validated against
//!    `schema/config.schema.json`
//! 3. Environment variables
//!
//! Missing search or model keys are not errors here. The stage that needs the
//! key fails at call time and reports it in the verdict. A missing or
//! placeholder graph password switches the archive into `skipped_db` mode.

use cassandra_core::defaults::MAX_SOURCES;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::providers::{ApiCredential, CompletionConfig, CredentialSource};
use crate::search::{SearchDepth, SearchRequest};

/// Search API key.
pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";
/// Language-model API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Graph database URI.
pub const NEO4J_URI_ENV: &str = "NEO4J_URI";
/// Graph database user.
pub const NEO4J_USERNAME_ENV: &str = "NEO4J_USERNAME";
/// Graph database password.
pub const NEO4J_PASSWORD_ENV: &str = "NEO4J_PASSWORD";
/// Model name override.
pub const CASSANDRA_MODEL_ENV: &str = "CASSANDRA_MODEL";

/// Substring that marks a template password as unset.
pub const DEFAULT_PLACEHOLDER: &str = "xxxx";

const CONFIG_SCHEMA_JSON: &str = include_str!("../schema/config.schema.json");

static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Config does not match schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Invalid duration '{value}' for {field}: {message}")]
    Duration {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("Failed to load schema: {0}")]
    SchemaLoad(String),
}

/// Web search settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<ApiCredential>,
    pub max_results: usize,
    pub depth: SearchDepth,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: MAX_SOURCES,
            depth: SearchDepth::Advanced,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    /// Build the request for one claim.
    pub fn request(&self, query: &str) -> SearchRequest {
        SearchRequest::new(query)
            .depth(self.depth)
            .max_results(self.max_results)
    }
}

/// Language-model settings.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Registered provider name
    pub provider: String,
    pub api_key: Option<ApiCredential>,
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            provider: "gemini".to_string(),
            api_key: None,
            model: completion.model,
            base_url: None,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
        }
    }
}

impl ModelConfig {
    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

/// Graph database settings.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: Option<String>,
    pub user: String,
    pub password: Option<ApiCredential>,
    pub placeholder: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: None,
            user: "neo4j".to_string(),
            password: None,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl GraphConfig {
    /// Whether the archive should write to the graph at all.
    ///
    /// False when the password is absent, blank or still the template
    /// placeholder, or when no URI is set.
    pub fn is_configured(&self) -> bool {
        let password_ok = match &self.password {
            Some(p) => !p.is_empty() && !p.is_placeholder(&self.placeholder),
            None => false,
        };
        password_ok && self.uri.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub search: SearchConfig,
    pub model: ModelConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    search: FileSearch,
    model: FileModel,
    graph: FileGraph,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSearch {
    api_key: Option<String>,
    max_results: Option<usize>,
    depth: Option<SearchDepth>,
    timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileModel {
    provider: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileGraph {
    uri: Option<String>,
    user: Option<String>,
    password: Option<String>,
    placeholder: Option<String>,
}

fn get_validator() -> Result<&'static jsonschema::Validator, ConfigError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(CONFIG_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(ConfigError::SchemaLoad(e.clone())),
    }
}

/// Validate a config document against the embedded schema.
pub fn validate_config_schema(value: &serde_json::Value) -> Result<(), ConfigError> {
    let validator = get_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Schema(errors))
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::Duration {
        field,
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn credential(
    value: Option<String>,
    source: CredentialSource,
    name: &'static str,
) -> Option<ApiCredential> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| ApiCredential::new(v, source, name))
}

impl RuntimeConfig {
    /// Load configuration from an optional file plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                if is_json {
                    Self::from_json_str(&text)?
                } else {
                    Self::from_yaml_str(&text)?
                }
            }
            None => Self::default(),
        };

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        // An empty YAML document parses as null
        let value = if value.is_null() {
            serde_json::json!({})
        } else {
            value
        };
        validate_config_schema(&value)?;

        let file: FileConfig =
            serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut config = Self::default();

        let search = file.search;
        config.search.api_key =
            credential(search.api_key, CredentialSource::Config, "Tavily API key");
        if let Some(n) = search.max_results {
            config.search.max_results = n;
        }
        if let Some(depth) = search.depth {
            config.search.depth = depth;
        }
        if let Some(t) = search.timeout {
            config.search.timeout = parse_duration("search.timeout", &t)?;
        }

        let model = file.model;
        if let Some(p) = model.provider {
            config.model.provider = p;
        }
        config.model.api_key =
            credential(model.api_key, CredentialSource::Config, "Google API key");
        if let Some(m) = model.model {
            config.model.model = m;
        }
        config.model.base_url = model.base_url;
        if let Some(n) = model.max_tokens {
            config.model.max_tokens = n;
        }
        if let Some(t) = model.temperature {
            config.model.temperature = t;
        }
        if let Some(t) = model.timeout {
            config.model.timeout = parse_duration("model.timeout", &t)?;
        }

        let graph = file.graph;
        config.graph.uri = graph.uri.filter(|u| !u.trim().is_empty());
        if let Some(u) = graph.user {
            config.graph.user = u;
        }
        config.graph.password = graph
            .password
            .map(|p| ApiCredential::new(p, CredentialSource::Config, "Neo4j password"));
        if let Some(p) = graph.placeholder {
            config.graph.placeholder = p;
        }

        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Blank values are ignored, except `NEO4J_PASSWORD`, which is kept so
    /// that an explicitly empty password still reads as unconfigured.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env_key =
            |key: &str, name| credential(non_blank(key), CredentialSource::Environment, name);

        if let Some(key) = env_key(TAVILY_API_KEY_ENV, "Tavily API key") {
            self.search.api_key = Some(key);
        }
        if let Some(key) = env_key(GOOGLE_API_KEY_ENV, "Google API key") {
            self.model.api_key = Some(key);
        }
        if let Some(model) = non_blank(CASSANDRA_MODEL_ENV) {
            self.model.model = model.trim().to_string();
        }
        if let Some(uri) = non_blank(NEO4J_URI_ENV) {
            self.graph.uri = Some(uri.trim().to_string());
        }
        if let Some(user) = non_blank(NEO4J_USERNAME_ENV) {
            self.graph.user = user.trim().to_string();
        }
        if let Some(password) = lookup(NEO4J_PASSWORD_ENV) {
            self.graph.password = Some(ApiCredential::new(
                password,
                CredentialSource::Environment,
                "Neo4j password",
            ));
        }

        self
    }
}
