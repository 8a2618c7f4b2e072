//! Configuration of a hierarch system.
//!
//! Loaded from TOML (with `${VAR}` expansion) or from the environment.
//! Nothing reads the environment after a [`Config`] is built.

use compact_str::CompactString;
use hcore::{Error, Result};
use model::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the provider.
pub const PROVIDER_VAR: &str = "HIERARCH_PROVIDER";

/// Environment variable overriding the model.
pub const MODEL_VAR: &str = "HIERARCH_MODEL";

/// Environment variable holding the search API key.
pub const SEARCH_KEY_VAR: &str = "TAVILY_API_KEY";

/// Default config file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hierarch").join("hierarch.toml"))
}

/// Search tool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Results per query.
    pub max_results: usize,
    /// Search endpoint.
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: 3,
            endpoint: tools::TAVILY_ENDPOINT.to_owned(),
        }
    }
}

/// Immutable configuration of a [`System`](crate::System).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Preferred model provider.
    pub provider: ProviderKind,
    /// Model identifier, the provider default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Groq API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,
    /// OpenAI API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    /// Chat completions endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Time budget of model and tool calls, in seconds.
    pub timeout_secs: u64,
    /// Whether the research team gets a web scraper.
    pub scrape_enabled: bool,
    /// Routing ceiling of each team.
    pub max_team_steps: usize,
    /// Routing ceiling of the top supervisor.
    pub max_top_steps: usize,
    /// Tool rounds per agent turn.
    pub max_tool_calls: usize,
    /// Document directory, a temporary one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,
    /// Interpreter used by the python tool.
    pub python: String,
    /// Search tool settings.
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Groq,
            model: None,
            groq_api_key: None,
            openai_api_key: None,
            base_url: None,
            temperature: 0.0,
            timeout_secs: 60,
            scrape_enabled: true,
            max_team_steps: 10,
            max_top_steps: 6,
            max_tool_calls: hcore::MAX_TOOL_CALLS,
            workspace: None,
            python: "python3".to_owned(),
            search: SearchConfig::default(),
        }
    }
}

/// Treat empty values as unset.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Expand `${VAR}` references; unset variables expand to nothing.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

impl Config {
    /// Parse a TOML string, expanding `${VAR}` references first.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = expand_env_vars(toml_str);
        toml::from_str(&expanded).map_err(|e| Error::config(format!("invalid config: {e}")))
    }

    /// Load the config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Build the config from environment variables over the defaults.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let mut config = Self {
            groq_api_key: var(ProviderKind::Groq.key_var()),
            openai_api_key: var(ProviderKind::OpenAI.key_var()),
            model: var(MODEL_VAR),
            ..Default::default()
        };
        config.search.api_key = var(SEARCH_KEY_VAR);

        if let Some(provider) = var(PROVIDER_VAR) {
            config.provider = match provider.to_lowercase().as_str() {
                "groq" => ProviderKind::Groq,
                "openai" => ProviderKind::OpenAI,
                other => {
                    return Err(Error::config(format!(
                        "{PROVIDER_VAR}: unknown provider '{other}'"
                    )));
                }
            };
        }
        Ok(config)
    }

    /// A config file with every key spelled out, secrets read from the
    /// environment at load time.
    pub fn template() -> Self {
        let mut config = Self {
            groq_api_key: Some(format!("${{{}}}", ProviderKind::Groq.key_var())),
            openai_api_key: Some(format!("${{{}}}", ProviderKind::OpenAI.key_var())),
            ..Default::default()
        };
        config.search.api_key = Some(format!("${{{SEARCH_KEY_VAR}}}"));
        config
    }

    /// Write the config as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::config(format!("failed to create {}: {e}", parent.display())))?;
        }
        std::fs::write(path, contents)
            .map_err(|e| Error::config(format!("failed to write {}: {e}", path.display())))?;
        tracing::info!("configuration saved to {}", path.display());
        Ok(())
    }

    /// The search API key.
    pub fn search_key(&self) -> Result<&str> {
        present(&self.search.api_key)
            .ok_or_else(|| Error::config(format!("{SEARCH_KEY_VAR} is not set")))
    }

    /// Resolve the provider to use.
    ///
    /// Groq is primary: when it is selected but only an OpenAI key is
    /// present, OpenAI is used with its default model.
    pub fn provider(&self) -> Result<ProviderConfig> {
        let groq = present(&self.groq_api_key);
        let openai = present(&self.openai_api_key);
        let model = self.model.as_deref().map(CompactString::from);
        let temperature = Some(self.temperature);

        let (kind, api_key, model) = match (self.provider, groq, openai) {
            (ProviderKind::Groq, Some(key), _) => (ProviderKind::Groq, key, model),
            (ProviderKind::Groq, None, Some(key)) => {
                tracing::warn!("GROQ_API_KEY is not set, falling back to OpenAI");
                (ProviderKind::OpenAI, key, None)
            }
            (ProviderKind::OpenAI, _, Some(key)) => (ProviderKind::OpenAI, key, model),
            (kind, _, _) => {
                return Err(Error::config(format!("{} is not set", kind.key_var())));
            }
        };

        Ok(ProviderConfig {
            kind,
            model,
            api_key: api_key.to_owned(),
            base_url: self.base_url.clone(),
            temperature,
        })
    }

    /// Check the settings every system needs, whatever its model.
    pub fn check(&self) -> Result<()> {
        self.search_key()?;
        for (name, value) in [
            ("max_team_steps", self.max_team_steps),
            ("max_top_steps", self.max_top_steps),
            ("max_tool_calls", self.max_tool_calls),
            ("timeout_secs", self.timeout_secs as usize),
            ("search.max_results", self.search.max_results),
        ] {
            if value == 0 {
                return Err(Error::config(format!("{name} must be at least 1")));
            }
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::config(format!(
                "temperature {} is outside 0..=2",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Fail fast on anything that would break a run.
    pub fn validate(&self) -> Result<()> {
        self.check()?;
        self.provider()?;
        Ok(())
    }
}
