use regex::Regex;
use std::fmt;

/// Redacts Vault credentials from text before it reaches an error message or
/// a log line
#[derive(Clone)]
pub struct SecretScrubber {
    vault_token_pattern: Regex,
    token_header_pattern: Regex,
    bearer_pattern: Regex,
    field_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new scrubber
    ///
    /// # Errors
    /// Returns an error if a redaction pattern fails to compile
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Service and batch tokens (hvs., hvb., hvr.); legacy tokens have a 24-character body
            vault_token_pattern: Regex::new(
                r"\bhv[sbr]\.[A-Za-z0-9_-]{8,}|\b[sbr]\.[A-Za-z0-9]{24}\b",
            )?,
            token_header_pattern: Regex::new(r"(?i)(x-vault-token\s*[:=]\s*)\S+")?,
            bearer_pattern: Regex::new(r"Bearer\s+[A-Za-z0-9\-_.]+")?,
            field_pattern: Regex::new(
                r#"(?i)(["']?(?:client_token|token|secret_id|password)["']?\s*[:=]\s*)["']?[^"'\s,}]+["']?"#,
            )?,
        })
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self.field_pattern.replace_all(message, "${1}[REDACTED]");
        // Header last: the field pattern also matches the `Token:` suffix
        let scrubbed = self
            .token_header_pattern
            .replace_all(&scrubbed, "${1}[TOKEN_REDACTED]");
        let scrubbed = self
            .bearer_pattern
            .replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
        self.vault_token_pattern
            .replace_all(&scrubbed, "[TOKEN_REDACTED]")
            .into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
