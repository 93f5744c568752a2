// Account endpoints
//
// Email/password login returns a bearer token; the profile endpoint
// resolves that token to a user.

use reqwest::Method;
use serde_json::json;
use tracing::debug;

use crate::auth::RequestContext;
use crate::client::ResourceClient;
use crate::error::Error;
use crate::models::{Tokens, User};

impl ResourceClient {
    /// Exchange email/password for tokens.
    ///
    /// `POST <auth>/login`. Always sent anonymously.
    pub async fn login(&self, email: &str, password: &str) -> Result<Tokens, Error> {
        debug!(email, "logging in");
        let endpoint = self.endpoints().login();
        let body = json!({ "email": email, "password": password });
        self.send_json(&RequestContext::anonymous(), Method::POST, &endpoint, &body)
            .await
    }

    /// Fetch the profile of the user owning the context's credential.
    ///
    /// `GET <auth>/profile`. Fails with [`Error::MissingCredential`]
    /// without touching the network when `ctx` is anonymous.
    pub async fn profile(&self, ctx: &RequestContext) -> Result<User, Error> {
        if !ctx.is_authenticated() {
            return Err(Error::MissingCredential);
        }
        let endpoint = self.endpoints().profile();
        self.get(ctx, &endpoint).await
    }
}
