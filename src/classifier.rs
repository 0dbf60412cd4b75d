use std::fmt;

use serde::{Deserialize, Serialize};

use crate::forms::{Reply, SubmitError};

/// Message shown after a successful signup.
pub const SUCCESS_MESSAGE: &str =
    "🎉 Sucesso! Você está na lista de acesso VIP. Verifique seu e-mail.";

/// User-facing failure categories. Each one renders exactly one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Timeout,
    Validation,
    Server,
    Spam,
    InvalidCredential,
    Configuration,
    Default,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 8] = [
        ErrorCategory::Network,
        ErrorCategory::Timeout,
        ErrorCategory::Validation,
        ErrorCategory::Server,
        ErrorCategory::Spam,
        ErrorCategory::InvalidCredential,
        ErrorCategory::Configuration,
        ErrorCategory::Default,
    ];

    /// The fixed, pre-localized text for this category.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "Problema de conexão. Verifique sua internet e tente novamente."
            }
            ErrorCategory::Timeout => "A requisição demorou demais. Tente novamente.",
            ErrorCategory::Validation => "Por favor, insira um e-mail válido.",
            ErrorCategory::Server => "Nossos servidores estão ocupados. Aguarde um momento.",
            ErrorCategory::Spam => {
                "Sua inscrição foi bloqueada pelo filtro anti-spam. Tente novamente mais tarde."
            }
            ErrorCategory::InvalidCredential => {
                "O formulário está temporariamente indisponível. Tente novamente mais tarde."
            }
            ErrorCategory::Configuration => {
                "Inscrições indisponíveis no momento. Tente novamente mais tarde."
            }
            ErrorCategory::Default => "Algo deu errado. Tente novamente em instantes.",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Server => "server",
            ErrorCategory::Spam => "spam",
            ErrorCategory::InvalidCredential => "invalid_credential",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Default => "default",
        };
        f.pad(name)
    }
}

/// Every way a submission attempt can fail, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    InvalidEmail,
    MissingCredential,
    Timeout,
    Transport,
    Parse {
        status: u16,
    },
    /// The service answered with a non-2xx status or `success: false`.
    Rejected {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },
}

impl From<&SubmitError> for Failure {
    fn from(err: &SubmitError) -> Self {
        match err {
            SubmitError::Timeout(_) => Failure::Timeout,
            SubmitError::Transport(_) => Failure::Transport,
            SubmitError::Parse { status, .. } => Failure::Parse { status: *status },
        }
    }
}

impl From<Reply> for Failure {
    fn from(reply: Reply) -> Self {
        Failure::Rejected {
            status: reply.status,
            code: reply.body.code,
            message: reply.body.message,
        }
    }
}

const SPAM_CODES: &[&str] = &["spam", "spam_detected"];
const CREDENTIAL_CODES: &[&str] = &["invalid_access_key", "invalid_credential"];
const CREDENTIAL_PHRASES: &[&str] = &["access key", "access_key"];

/// Map a failure to its category. First match wins.
pub fn classify(failure: &Failure) -> ErrorCategory {
    match failure {
        Failure::InvalidEmail => ErrorCategory::Validation,
        Failure::MissingCredential => ErrorCategory::Configuration,
        Failure::Timeout => ErrorCategory::Timeout,
        Failure::Transport => ErrorCategory::Network,
        Failure::Parse { status } if *status >= 500 => ErrorCategory::Server,
        Failure::Parse { .. } => ErrorCategory::Default,
        Failure::Rejected {
            status,
            code,
            message,
        } => classify_rejection(*status, code.as_deref(), message.as_deref()),
    }
}

fn classify_rejection(status: u16, code: Option<&str>, message: Option<&str>) -> ErrorCategory {
    let code = code.map(str::to_ascii_lowercase);
    let code = code.as_deref();
    let message = message.map(str::to_lowercase);
    let message = message.as_deref().filter(|m| !m.trim().is_empty());

    // Structured signals before wording.
    if code.is_some_and(|c| SPAM_CODES.contains(&c)) || status == 429 {
        return ErrorCategory::Spam;
    }
    if code.is_some_and(|c| CREDENTIAL_CODES.contains(&c)) || matches!(status, 401 | 403) {
        return ErrorCategory::InvalidCredential;
    }

    if let Some(text) = message {
        if text.contains("spam") {
            return ErrorCategory::Spam;
        }
        if CREDENTIAL_PHRASES.iter().any(|p| text.contains(p)) {
            return ErrorCategory::InvalidCredential;
        }
    }

    if status == 422 {
        return ErrorCategory::Validation;
    }
    if message.is_some() || status >= 500 {
        return ErrorCategory::Server;
    }
    ErrorCategory::Default
}
