use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_TRANSLATE_API_URL: &str = "https://www.googleapis.com/language/translate/v2";

#[derive(Debug, Clone)]
pub struct Config {
    // Google Translate
    pub translate_api_key: String,
    pub translate_api_url: String,

    // Greeter defaults
    pub language: String,
    pub display_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let display_delay_ms = match std::env::var("GREETR_DISPLAY_DELAY_MS") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("GREETR_DISPLAY_DELAY_MS is not a number: '{}'", v))?,
            Err(_) => 100,
        };

        Ok(Self {
            // Google Translate
            translate_api_key: std::env::var("GOOGLE_TRANSLATE_API_KEY")
                .context("GOOGLE_TRANSLATE_API_KEY not set")?,
            translate_api_url: std::env::var("GOOGLE_TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_API_URL.to_string()),

            // Greeter defaults
            language: std::env::var("GREETR_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),
            display_delay: Duration::from_millis(display_delay_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "GOOGLE_TRANSLATE_API_KEY",
            "GOOGLE_TRANSLATE_API_URL",
            "GREETR_LANGUAGE",
            "GREETR_DISPLAY_DELAY_MS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("GOOGLE_TRANSLATE_API_KEY", "test-key");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.translate_api_key, "test-key");
        assert_eq!(config.translate_api_url, DEFAULT_TRANSLATE_API_URL);
        assert_eq!(config.language, "en");
        assert_eq!(config.display_delay, Duration::from_millis(100));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_api_key() {
        clear_env();

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_TRANSLATE_API_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("GOOGLE_TRANSLATE_API_KEY", "k");
        std::env::set_var("GOOGLE_TRANSLATE_API_URL", "http://localhost:9999/translate");
        std::env::set_var("GREETR_LANGUAGE", "es");
        std::env::set_var("GREETR_DISPLAY_DELAY_MS", "5");

        let config = Config::from_env().expect("Should load");
        assert_eq!(config.translate_api_url, "http://localhost:9999/translate");
        assert_eq!(config.language, "es");
        assert_eq!(config.display_delay, Duration::from_millis(5));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_bad_delay() {
        clear_env();
        std::env::set_var("GOOGLE_TRANSLATE_API_KEY", "k");
        std::env::set_var("GREETR_DISPLAY_DELAY_MS", "soon");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("GREETR_DISPLAY_DELAY_MS"));

        clear_env();
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            translate_api_key: "k".to_string(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            language: "fr".to_string(),
            display_delay: Duration::from_millis(10),
        };
        let cloned = config.clone();
        assert_eq!(cloned.language, "fr");
        assert_eq!(cloned.translate_api_key, config.translate_api_key);
    }
}
