//! Configuration for edubot.
//!
//! Everything is resolved once at startup from environment variables, with
//! compiled-in defaults that match a stock local Ollama install.

use std::path::PathBuf;

/// Default Ollama generate endpoint.
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";

/// Default model to prompt.
const DEFAULT_MODEL: &str = "mistral";

/// Syllabus document looked up in the working directory.
const SYLLABUS_FILE: &str = "syllabus.json";

/// Append-mode log file in the working directory.
const LOG_FILE: &str = "output.log";

/// Runtime configuration, built once in `main` and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ollama generate endpoint URL.
    pub ollama_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Path to the optional syllabus document.
    pub syllabus_path: PathBuf,
    /// Path to the diagnostic log file.
    pub log_path: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            ollama_url: lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model: lookup("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            syllabus_path: PathBuf::from(SYLLABUS_FILE),
            log_path: PathBuf::from(LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_absent() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.ollama_url, "http://localhost:11434/api/generate");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.syllabus_path, PathBuf::from("syllabus.json"));
        assert_eq!(config.log_path, PathBuf::from("output.log"));
    }

    #[test]
    fn test_env_overrides_win() {
        let config = Config::from_lookup(|key| match key {
            "OLLAMA_URL" => Some("http://10.0.0.2:11434/api/generate".to_string()),
            "MODEL_NAME" => Some("llama3.2:3b".to_string()),
            _ => None,
        });
        assert_eq!(config.ollama_url, "http://10.0.0.2:11434/api/generate");
        assert_eq!(config.model, "llama3.2:3b");
    }
}
