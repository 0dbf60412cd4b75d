//! Configuração do waitlist carregada a partir de `waitlist.toml`.
//!
//! A struct [`WaitlistConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `WEB3FORMS_KEY` tem precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::WaitlistError;
use crate::forms::{DEFAULT_TIMEOUT, FORMS_URL};
use crate::notification::DEFAULT_DISPLAY;
use crate::widget::ChatWidget;

/// Arquivo lido quando `--config` não é informado.
pub const DEFAULT_CONFIG_FILE: &str = "waitlist.toml";

/// Variável de ambiente com a chave de acesso do formulário.
pub const ACCESS_KEY_ENV: &str = "WEB3FORMS_KEY";

/// Configuração de nível superior carregada de `waitlist.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitlistConfig {
    /// Chave de acesso do serviço de formulários. Ausente = inscrições desligadas.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Endpoint que recebe o POST da inscrição.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Prazo máximo de uma requisição, em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Tempo de exibição da notificação, em segundos.
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,

    #[serde(default = "default_subject")]
    pub subject: Option<String>,

    #[serde(default = "default_from_name")]
    pub from_name: Option<String>,

    #[serde(default = "default_source")]
    pub source: Option<String>,

    /// Envia o campo honeypot vazio.
    #[serde(default = "default_true")]
    pub honeypot: bool,

    /// Registra o evento de analytics em caso de sucesso.
    #[serde(default = "default_true")]
    pub analytics: bool,

    #[serde(default)]
    pub chat_widget: ChatWidget,
}

fn default_endpoint() -> String {
    FORMS_URL.to_string()
}

// Valor padrão do prazo: 10s.
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

// Valor padrão da exibição: 6s.
fn default_display_secs() -> u64 {
    DEFAULT_DISPLAY.as_secs()
}

fn default_subject() -> Option<String> {
    Some("Nova inscrição - Lista de Acesso SeuEstúdio.ai".to_string())
}

fn default_from_name() -> Option<String> {
    Some("SeuEstúdio.ai Landing Page".to_string())
}

fn default_source() -> Option<String> {
    Some("waitlist_form".to_string())
}

fn default_true() -> bool {
    true
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            display_secs: default_display_secs(),
            subject: default_subject(),
            from_name: default_from_name(),
            source: default_source(),
            honeypot: true,
            analytics: true,
            chat_widget: ChatWidget::default(),
        }
    }
}

impl WaitlistConfig {
    /// Carrega `waitlist.toml` do diretório atual e aplica `WEB3FORMS_KEY`.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
            .map(|config| config.with_env_key(std::env::var(ACCESS_KEY_ENV).ok()))
    }

    /// Lê a configuração de `path`. Usa os valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<WaitlistConfig>(&contents)
                .map_err(WaitlistError::from)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Lê um arquivo indicado explicitamente. Ao contrário de [`Self::load_from`],
    /// um arquivo ausente é erro.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        anyhow::ensure!(path.exists(), "config file {} not found", path.display());
        Self::load_from(path)
    }

    /// A chave do ambiente tem precedência sobre a do arquivo quando não vazia.
    pub fn with_env_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.access_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), WaitlistError> {
        if self.timeout_secs == 0 {
            return Err(WaitlistError::Config(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        if self.display_secs == 0 {
            return Err(WaitlistError::Config(
                "display_secs must be greater than zero".into(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(WaitlistError::Config("endpoint must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_secs(self.display_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_values() {
        let config = WaitlistConfig::default();
        assert!(config.access_key.is_none());
        assert_eq!(config.endpoint, FORMS_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.display_duration(), Duration::from_secs(6));
        assert_eq!(config.source.as_deref(), Some("waitlist_form"));
        assert!(config.honeypot);
        assert!(config.analytics);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            access_key = "key-123"
            timeout_secs = 15

            [chat_widget]
            token = "bot-token"
        "#;
        let config: WaitlistConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.access_key.as_deref(), Some("key-123"));
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.display_secs, 6);
        assert_eq!(config.chat_widget.token, "bot-token");
        assert!(config.subject.is_some());
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WaitlistConfig::load_from(&dir.path().join("waitlist.toml")).unwrap();
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn load_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");
        let err = WaitlistConfig::load_explicit(&path).unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
        assert!(err.to_string().contains("typo.toml"), "{err}");
    }

    #[test]
    fn load_explicit_reads_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 4").unwrap();

        let config = WaitlistConfig::load_explicit(file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(4));
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "display_secs = 3\nhoneypot = false").unwrap();

        let config = WaitlistConfig::load_from(file.path()).unwrap();
        assert_eq!(config.display_duration(), Duration::from_secs(3));
        assert!(!config.honeypot);
    }

    #[test]
    fn load_from_rejects_zero_timeout() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 0").unwrap();

        let err = WaitlistConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn load_from_reports_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = \"ten\"").unwrap();

        let err = WaitlistConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let config = WaitlistConfig {
            access_key: Some("from-file".into()),
            ..Default::default()
        };
        let config = config.with_env_key(Some("from-env".into()));
        assert_eq!(config.access_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn empty_env_key_is_ignored() {
        let config = WaitlistConfig {
            access_key: Some("from-file".into()),
            ..Default::default()
        };
        let config = config.with_env_key(Some("  ".into()));
        assert_eq!(config.access_key.as_deref(), Some("from-file"));
    }
}
