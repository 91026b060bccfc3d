use crate::domain::ports::credentials::CredentialVerifier;

/// Plain equality against one configured shared secret.
pub struct StaticKeyVerifier {
    key: String,
}

impl StaticKeyVerifier {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CredentialVerifier for StaticKeyVerifier {
    fn validate(&self, token: &str) -> bool {
        token == self.key
    }
}
