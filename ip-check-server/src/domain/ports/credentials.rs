/// Decides whether a caller-supplied token may use protected routes.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn validate(&self, token: &str) -> bool;
}
