//! Provider-agnostic authorization-code plumbing.
//!
//! The functions here know the OAuth 2.0 protocol (authorize URL layout, the
//! `authorization_code` form POST, JSON decoding) but nothing about a particular
//! provider: every endpoint, scope, header, and response mapping comes from a
//! [`ProviderHooks`] implementation.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use rand::{Rng, distr::Alphanumeric};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeList, Secret},
	config::EndpointKind,
	error::{ConfigError, TransportError},
	http::ProviderHttpClient,
	obs::FlowKind,
	provider::ProviderHooks,
};

const STATE_LEN: usize = 32;
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `endpoint`.
	fn map_transport_error(&self, endpoint: EndpointKind, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: EndpointKind,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { endpoint, message }.into(),
			_ => TransportError::Other { endpoint, message: "unrecognized client failure".into() }
				.into(),
		}
	}
}

/// Client credentials sent along with authorization and token requests.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
}

/// Caller overrides for [`authorization_url`].
#[derive(Clone, Debug, Default)]
pub struct AuthorizationOptions {
	/// Opaque `state` value; a random one is generated when unset.
	pub state: Option<String>,
	/// Scopes to request instead of the provider defaults.
	pub scopes: Option<ScopeList>,
}
impl AuthorizationOptions {
	/// Uses a caller-chosen `state` value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Requests `scopes` instead of the provider defaults.
	pub fn with_scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = Some(scopes);

		self
	}
}

/// Authorize URL plus the `state` value embedded in it.
///
/// Verifying `state` when the user returns is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// URL the user should be sent to.
	pub url: Url,
	/// `state` query parameter carried by [`AuthorizationRequest::url`].
	pub state: String,
}

/// Builds the authorize URL from the provider's base authorization URL.
pub fn authorization_url<H>(
	hooks: &H,
	client: &ClientCredentials,
	options: AuthorizationOptions,
) -> Result<AuthorizationRequest>
where
	H: ?Sized + ProviderHooks,
{
	let state = options.state.unwrap_or_else(random_state);
	let scopes = options.scopes.unwrap_or_else(|| hooks.default_scopes());
	let mut url = hooks.base_authorization_url()?;
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &client.client_id);
	pairs.append_pair("redirect_uri", client.redirect_uri.as_str());

	if let Some(scope_value) = scopes.join(hooks.scope_separator()) {
		pairs.append_pair("scope", &scope_value);
	}

	pairs.append_pair("state", &state);

	drop(pairs);

	Ok(AuthorizationRequest { url, state })
}

/// Exchanges an authorization code at the provider's token endpoint.
pub async fn exchange_authorization_code<H, C, M>(
	hooks: &H,
	client: &ClientCredentials,
	http_client: &C,
	mapper: &M,
	code: &str,
) -> Result<AccessToken>
where
	H: ?Sized + ProviderHooks,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	const KIND: FlowKind = FlowKind::AuthorizationCode;

	let mut params = BTreeMap::new();

	params.insert("client_id".to_owned(), client.client_id.clone());
	params.insert("client_secret".to_owned(), client.client_secret.expose().to_owned());
	params.insert("redirect_uri".to_owned(), client.redirect_uri.to_string());
	params.insert("grant_type".to_owned(), "authorization_code".to_owned());
	params.insert("code".to_owned(), code.to_owned());

	let url = hooks.base_access_token_url(&params)?;
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(&params).finish();
	let request = Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, JSON_CONTENT_TYPE)
		.body(body.into_bytes())
		.map_err(ConfigError::from)?;
	let (status, body) = send(http_client, mapper, KIND, request).await?;

	hooks.check_response(status, &body)?;
	hooks.create_access_token(body, OffsetDateTime::now_utc()).map_err(|source| {
		TransportError::MalformedResponse { endpoint: KIND.endpoint(), status, source }.into()
	})
}

/// Fetches the resource owner the token was issued for.
pub async fn fetch_resource_owner<H, C, M>(
	hooks: &H,
	http_client: &C,
	mapper: &M,
	token: &AccessToken,
) -> Result<H::Owner>
where
	H: ?Sized + ProviderHooks,
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let url = hooks.resource_owner_details_url(token)?;
	let mut builder =
		Request::builder().method(Method::GET).uri(url.as_str()).header(ACCEPT, JSON_CONTENT_TYPE);

	for (name, value) in hooks.authorization_headers(token) {
		builder = builder.header(name, value);
	}

	let request = builder.body(Vec::new()).map_err(ConfigError::from)?;
	let (status, body) = send(http_client, mapper, FlowKind::ResourceOwner, request).await?;

	hooks.check_response(status, &body)?;

	Ok(hooks.create_resource_owner(body, token))
}

async fn send<C, M>(
	http_client: &C,
	mapper: &M,
	kind: FlowKind,
	request: HttpRequest,
) -> Result<(u16, Value)>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let endpoint = kind.endpoint();
	let handle = http_client.handle();
	let response =
		handle.call(request).await.map_err(|err| mapper.map_transport_error(endpoint, err))?;
	let status = response.status().as_u16();
	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| TransportError::MalformedResponse { endpoint, status, source })?;

	Ok((status, body))
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: EndpointKind, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(endpoint, err).into();
	}

	TransportError::network(endpoint, err).into()
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{ResourceOwner, ScopeList};

	struct StaticHooks;
	impl ProviderHooks for StaticHooks {
		type Owner = ResourceOwner;

		fn base_authorization_url(&self) -> Result<Url> {
			Ok(Url::parse("https://id.example.com/authorize?prompt=none")
				.expect("Fixture URL should parse."))
		}

		fn base_access_token_url(&self, _params: &BTreeMap<String, String>) -> Result<Url> {
			Ok(Url::parse("https://id.example.com/token").expect("Fixture URL should parse."))
		}

		fn default_scopes(&self) -> ScopeList {
			ScopeList::new(["login", "vote"]).expect("Fixture scopes should be valid.")
		}

		fn resource_owner_details_url(&self, _token: &AccessToken) -> Result<Url> {
			Ok(Url::parse("https://id.example.com/me").expect("Fixture URL should parse."))
		}

		fn create_resource_owner(&self, body: Value, _token: &AccessToken) -> Self::Owner {
			ResourceOwner::new(body)
		}
	}

	fn client() -> ClientCredentials {
		ClientCredentials {
			client_id: "hernandev.app".into(),
			client_secret: Secret::new("secret"),
			redirect_uri: Url::parse("https://return-to.me/callback")
				.expect("Redirect fixture should parse."),
		}
	}

	#[test]
	fn authorization_url_carries_protocol_parameters() {
		let request = authorization_url(&StaticHooks, &client(), AuthorizationOptions::default())
			.expect("Authorize URL should build.");
		let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();

		assert_eq!(request.url.path(), "/authorize");
		assert_eq!(pairs[0], ("prompt".into(), "none".into()));
		assert!(pairs.contains(&("response_type".into(), "code".into())));
		assert!(pairs.contains(&("client_id".into(), "hernandev.app".into())));
		assert!(pairs.contains(&("redirect_uri".into(), "https://return-to.me/callback".into())));
		assert!(pairs.contains(&("scope".into(), "login,vote".into())));
		assert!(pairs.contains(&("state".into(), request.state.clone())));
		assert_eq!(request.state.len(), STATE_LEN);
		assert!(request.state.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[test]
	fn authorization_url_honours_overrides() {
		let options = AuthorizationOptions::default()
			.with_state("fixed-state")
			.with_scopes(ScopeList::default());
		let request = authorization_url(&StaticHooks, &client(), options)
			.expect("Authorize URL should build.");

		assert_eq!(request.state, "fixed-state");
		assert!(request.url.query_pairs().all(|(key, _)| key != "scope"));
	}

	#[test]
	fn random_states_differ() {
		assert_ne!(random_state(), random_state());
	}
}
