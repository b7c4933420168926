use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

use self::patterns::{BEARER_REGEX, EMAIL_REGEX, IP_REGEX, JWT_REGEX};

/// Patterns compiled on first use
#[allow(clippy::expect_used)]
mod patterns {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub(super) static ref EMAIL_REGEX: Regex =
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
        pub(super) static ref BEARER_REGEX: Regex =
            Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9\-_.=]+").expect("bearer pattern");
        pub(super) static ref JWT_REGEX: Regex =
            Regex::new(r"\beyJ[A-Za-z0-9\-_]+\.[A-Za-z0-9\-_]+\.[A-Za-z0-9\-_]+").expect("jwt pattern");
        pub(super) static ref IP_REGEX: Regex =
            Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("ip pattern");
    }
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_tokens: bool,
    pub redact_ip_addresses: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_tokens: true,
            redact_ip_addresses: true,
            hash_for_correlation: true,
        }
    }
}

impl RedactionConfig {
    /// Configuration that leaves every message untouched
    pub fn disabled() -> Self {
        Self {
            redact_emails: false,
            redact_tokens: false,
            redact_ip_addresses: false,
            hash_for_correlation: false,
        }
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Tokens first: a JWT never contains an '@', but a bearer header may carry one
        if self.config.redact_tokens {
            result = self.redact_tokens(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_ip_addresses {
            result = self.redact_ip_addresses(&result);
        }

        result
    }

    /// Redact a value known to be an email address, such as a registration field
    pub fn redact_email(&self, email: &str) -> String {
        if !self.config.redact_emails {
            return email.to_string();
        }
        if self.config.hash_for_correlation {
            return format!("EMAIL[{}]", self.hash_value(email));
        }
        match email.split_once('@') {
            Some((local, domain)) => format!(
                "{}***@{}***",
                local.chars().next().map(String::from).unwrap_or_default(),
                domain.chars().next().map(String::from).unwrap_or_default()
            ),
            None => "***@***".to_string(),
        }
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| self.redact_email(&caps[0]))
            .to_string()
    }

    fn redact_tokens(&self, text: &str) -> String {
        let without_bearer = BEARER_REGEX.replace_all(text, "Bearer [REDACTED]");
        JWT_REGEX
            .replace_all(&without_bearer, "[REDACTED_TOKEN]")
            .to_string()
    }

    fn redact_ip_addresses(&self, text: &str) -> String {
        IP_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("IP[{}]", self.hash_value(&caps[0]))
                } else {
                    let parts: Vec<&str> = caps[0].split('.').collect();
                    match (parts.first(), parts.last()) {
                        (Some(first), Some(last)) if parts.len() == 4 => {
                            format!("{}.***.***.{}", first, last)
                        }
                        _ => "***.***.***.***".to_string(),
                    }
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        // First 8 bytes keep the correlation id short
        general_purpose::STANDARD.encode(&digest[..8])
    }
}
