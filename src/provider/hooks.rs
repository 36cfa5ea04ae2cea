//! Provider hooks consumed by the generic authorization-code plumbing.
//!
//! A provider answers a handful of questions (where do the endpoints live, which scopes
//! are requested, how is a token presented, what does a response mean) and
//! [`crate::oauth`] does the rest without knowing which provider it talks to.

// crates.io
use oauth2::http::{HeaderName, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, SCOPE_SEPARATOR, ScopeList},
	error::{DecodeError, IdentityProviderError},
};

/// Capability set an OAuth 2.0 provider adapter exposes.
///
/// Only the endpoint, scope, and owner hooks are required. The remaining hooks default
/// to generic OAuth 2.0 behavior and are overridden where a provider deviates from it.
pub trait ProviderHooks: Send + Sync {
	/// Account representation produced by [`ProviderHooks::create_resource_owner`].
	type Owner;

	/// URL users are redirected to, before any query parameters are appended.
	fn base_authorization_url(&self) -> Result<Url>;

	/// Token endpoint URL for the given form parameters.
	fn base_access_token_url(&self, params: &BTreeMap<String, String>) -> Result<Url>;

	/// Scopes requested when the caller does not choose any.
	fn default_scopes(&self) -> ScopeList;

	/// Character placed between scopes in the `scope` query parameter.
	fn scope_separator(&self) -> char {
		SCOPE_SEPARATOR
	}

	/// Account endpoint URL for `token`.
	fn resource_owner_details_url(&self, token: &AccessToken) -> Result<Url>;

	/// Headers that present `token` to the account endpoint.
	fn authorization_headers(&self, token: &AccessToken) -> Vec<(HeaderName, String)> {
		vec![(AUTHORIZATION, format!("Bearer {}", token.token()))]
	}

	/// Rejects decoded bodies that carry a provider error.
	///
	/// A top-level `error` field is an error whatever the HTTP status says.
	fn check_response(&self, status: u16, body: &Value) -> Result<()> {
		match IdentityProviderError::from_body(status, body) {
			Some(err) => Err(err.into()),
			None => Ok(()),
		}
	}

	/// Turns a successful token endpoint body into an [`AccessToken`].
	fn create_access_token(
		&self,
		body: Value,
		issued_at: OffsetDateTime,
	) -> Result<AccessToken, DecodeError> {
		AccessToken::from_response(body, None, issued_at)
	}

	/// Wraps a successful account endpoint body.
	fn create_resource_owner(&self, body: Value, token: &AccessToken) -> Self::Owner;
}
