use secrecy::{ExposeSecret, SecretString};

/// An opaque bearer token proving an authenticated session.
///
/// The secret is redacted from `Debug` output. Only the session layer
/// persists it; the resource client sees it per request through a
/// [`RequestContext`].
#[derive(Debug, Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header or persistence.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for Credential {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

/// Per-call request context.
///
/// Carries the credential for exactly one request, so two sessions can
/// share a `ResourceClient` without seeing each other's headers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    credential: Option<Credential>,
}

impl RequestContext {
    /// A context that sends no `Authorization` header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let cred = Credential::new("super-secret-token");
        let rendered = format!("{:?}", RequestContext::with_credential(cred));
        assert!(!rendered.contains("super-secret-token"));
    }

    #[test]
    fn anonymous_context_has_no_credential() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(ctx.credential().is_none());
    }
}
