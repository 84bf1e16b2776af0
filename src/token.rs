use std::fmt;

/// Opaque bearer token issued by Vault.
///
/// Has no `Display` and a redacted `Debug`, so the credential cannot leak
/// through diagnostics. The only way out is `as_bytes`, used once for the
/// handoff to the configured output.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}
