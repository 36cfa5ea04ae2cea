//! SteemConnect provider adapter.

// crates.io
use oauth2::http::{HeaderName, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ResourceOwner, ScopeList},
	config::{Config, EndpointKind},
	error::DecodeError,
	http::ProviderHttpClient,
	oauth::{
		self, AuthorizationOptions, AuthorizationRequest, ClientCredentials, TransportErrorMapper,
	},
	obs::{self, FlowKind},
	provider::ProviderHooks,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Token response field holding the SteemConnect username.
pub const RESOURCE_OWNER_ID_FIELD: &str = "username";

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestProvider = Provider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// SteemConnect OAuth 2.0 provider.
///
/// Holds the [`Config`] plus the transport and its error mapper. Every call is
/// independent: nothing is cached between [`Provider::parse_return`] and
/// [`Provider::resource_owner`], and each issues exactly one HTTP request.
#[derive(Clone)]
pub struct Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	config: Config,
}
impl<C, M> Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self { http_client: http_client.into(), transport_mapper: mapper.into(), config }
	}

	/// Configuration driving every URL the provider builds.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Mutable access for adjusting the return URL or scopes between flows.
	pub fn config_mut(&mut self) -> &mut Config {
		&mut self.config
	}

	/// Builds the authorize URL with the configured scopes and a fresh random `state`.
	pub fn authorization_url(&self) -> Result<AuthorizationRequest> {
		self.authorization_url_with(AuthorizationOptions::default())
	}

	/// Builds the authorize URL with caller overrides for `state` and scopes.
	pub fn authorization_url_with(
		&self,
		options: AuthorizationOptions,
	) -> Result<AuthorizationRequest> {
		oauth::authorization_url(self, &self.client_credentials()?, options)
	}

	/// Handles the user's return from the authorize page.
	///
	/// An absent or empty `code` means the user has not come back yet: the call returns
	/// `Ok(None)` without touching the network. Otherwise the code is exchanged as in
	/// [`Provider::access_token`].
	pub async fn parse_return(&self, code: Option<&str>) -> Result<Option<AccessToken>> {
		match code.filter(|code| !code.is_empty()) {
			Some(code) => self.access_token(code).await.map(Some),
			None => Ok(None),
		}
	}

	/// Exchanges an authorization code for an [`AccessToken`].
	pub async fn access_token(&self, code: &str) -> Result<AccessToken> {
		obs::observe(FlowKind::AuthorizationCode, async {
			let client = self.client_credentials()?;

			oauth::exchange_authorization_code(
				self,
				&client,
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				code,
			)
			.await
		})
		.await
	}

	/// Fetches the account `token` was issued for.
	pub async fn resource_owner(&self, token: &AccessToken) -> Result<ResourceOwner> {
		obs::observe(
			FlowKind::ResourceOwner,
			oauth::fetch_resource_owner(
				self,
				self.http_client.as_ref(),
				self.transport_mapper.as_ref(),
				token,
			),
		)
		.await
	}

	fn client_credentials(&self) -> Result<ClientCredentials> {
		Ok(ClientCredentials {
			client_id: self.config.application_id().to_string(),
			client_secret: self.config.application_secret().clone(),
			redirect_uri: self.config.return_url()?,
		})
	}
}
#[cfg(feature = "reqwest")]
impl Provider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider backed by a default reqwest client.
	pub fn new(config: Config) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> ProviderHooks for Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	type Owner = ResourceOwner;

	fn base_authorization_url(&self) -> Result<Url> {
		Ok(self.config.build_url(EndpointKind::Authorization)?)
	}

	fn base_access_token_url(&self, _params: &BTreeMap<String, String>) -> Result<Url> {
		Ok(self.config.build_url(EndpointKind::AccessToken)?)
	}

	fn default_scopes(&self) -> ScopeList {
		self.config.scopes()
	}

	fn resource_owner_details_url(&self, _token: &AccessToken) -> Result<Url> {
		Ok(self.config.build_url(EndpointKind::Account)?)
	}

	// SteemConnect expects the bare token, without a `Bearer` prefix.
	fn authorization_headers(&self, token: &AccessToken) -> Vec<(HeaderName, String)> {
		vec![(AUTHORIZATION, token.token().to_owned())]
	}

	fn create_access_token(
		&self,
		body: Value,
		issued_at: OffsetDateTime,
	) -> Result<AccessToken, DecodeError> {
		AccessToken::from_response(body, Some(RESOURCE_OWNER_ID_FIELD), issued_at)
	}

	fn create_resource_owner(&self, body: Value, _token: &AccessToken) -> Self::Owner {
		ResourceOwner::new(body)
	}
}
impl<C, M> Debug for Provider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provider").field("config", &self.config).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
	use serde_json::json;
	// self
	use super::*;
	use crate::error::{ConfigError, TransportError};

	const APPLICATION_ID: &str = "hernandev.app";
	const RETURN_URL: &str = "https://return-to.me/callback";

	#[derive(Debug, ThisError)]
	#[error("Canned transport failure.")]
	struct CannedError;

	/// Transport that answers every request with a fixed body and counts calls.
	#[derive(Default)]
	struct CannedHttpClient {
		status: u16,
		body: Vec<u8>,
		calls: Arc<AtomicUsize>,
	}
	impl CannedHttpClient {
		fn json(status: u16, body: Value) -> Self {
			Self { status, body: body.to_string().into_bytes(), calls: Default::default() }
		}
	}
	impl ProviderHttpClient for CannedHttpClient {
		type Handle = CannedHandle;
		type TransportError = CannedError;

		fn handle(&self) -> Self::Handle {
			CannedHandle { status: self.status, body: self.body.clone(), calls: self.calls.clone() }
		}
	}

	struct CannedHandle {
		status: u16,
		body: Vec<u8>,
		calls: Arc<AtomicUsize>,
	}
	impl<'c> AsyncHttpClient<'c> for CannedHandle {
		type Error = HttpClientError<CannedError>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			self.calls.fetch_add(1, Ordering::SeqCst);

			let mut response = HttpResponse::new(self.body.clone());

			*response.status_mut() = oauth2::http::StatusCode::from_u16(self.status)
				.expect("Canned status should be valid.");

			Box::pin(async move { Ok(response) })
		}
	}

	struct CannedMapper;
	impl TransportErrorMapper<CannedError> for CannedMapper {
		fn map_transport_error(
			&self,
			endpoint: EndpointKind,
			err: HttpClientError<CannedError>,
		) -> Error {
			TransportError::Other { endpoint, message: err.to_string() }.into()
		}
	}

	fn provider(client: CannedHttpClient) -> Provider<CannedHttpClient, CannedMapper> {
		let config = Config::new(APPLICATION_ID, "4c90e2e77840b97ac001b37236be966cf73ce1373f4b4b5a")
			.expect("Fixture credentials should be valid.")
			.with_return_url(RETURN_URL);

		Provider::with_http_client(config, client, CannedMapper)
	}

	#[tokio::test]
	async fn parse_return_without_code_stays_offline() {
		let client = CannedHttpClient::json(200, json!({ "access_token": "unused" }));
		let calls = client.calls.clone();
		let provider = provider(client);

		assert!(provider.parse_return(None).await.expect("No code should be fine.").is_none());
		assert!(
			provider.parse_return(Some("")).await.expect("Empty code should be fine.").is_none()
		);
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn parse_return_maps_username_and_expiry() {
		let client = CannedHttpClient::json(
			200,
			json!({
				"access_token": "mock-access-token",
				"scopes": ["mock-scopes"],
				"expires_in": 3600,
				"username": "dummy-user",
				"refresh_token": "mock-refresh-token",
				"token_type": "bearer",
			}),
		);
		let calls = client.calls.clone();
		let provider = provider(client);
		let before = OffsetDateTime::now_utc();
		let token = provider
			.parse_return(Some("mock-access-code"))
			.await
			.expect("Exchange should succeed.")
			.expect("A code should yield a token.");
		let expires_at = token.expires_at.expect("Expiry should be set.");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(token.token(), "mock-access-token");
		assert_eq!(token.resource_owner_id(), Some("dummy-user"));
		assert_eq!(token.refresh_token(), Some("mock-refresh-token"));
		assert!(expires_at >= before + Duration::seconds(3600));
		assert!(expires_at <= OffsetDateTime::now_utc() + Duration::seconds(3600));
	}

	#[tokio::test]
	async fn error_bodies_fail_the_exchange() {
		let provider =
			provider(CannedHttpClient::json(200, json!({ "error": "invalid-access-code" })));
		let err = provider
			.parse_return(Some("mock-access-code"))
			.await
			.expect_err("Error payloads must not yield a token.");

		assert!(matches!(
			err,
			Error::IdentityProvider(ref inner) if inner.message == "invalid-access-code"
		));
	}

	#[tokio::test]
	async fn non_json_bodies_are_malformed() {
		let mut client = CannedHttpClient::json(502, json!(null));

		client.body = b"<html>Bad Gateway</html>".to_vec();

		let err = provider(client).access_token("code").await.expect_err("HTML must not decode.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedResponse {
				endpoint: EndpointKind::AccessToken,
				status: 502,
				..
			})
		));
	}

	#[tokio::test]
	async fn missing_return_url_fails_before_io() {
		let client = CannedHttpClient::json(200, json!({ "access_token": "unused" }));
		let calls = client.calls.clone();
		let config = Config::new(APPLICATION_ID, "secret").expect("Config should build.");
		let provider = Provider::with_http_client(config, client, CannedMapper);

		assert!(matches!(
			provider.access_token("code").await,
			Err(Error::Config(ConfigError::MissingReturnUrl))
		));
		assert!(matches!(
			provider.authorization_url(),
			Err(Error::Config(ConfigError::MissingReturnUrl))
		));
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn resource_owner_wraps_account_payload() {
		let provider = provider(CannedHttpClient::json(
			200,
			json!({ "user": "dummy-name", "account": { "name": "dummy-name", "foo": "bar" } }),
		));
		let owner = provider
			.resource_owner(&AccessToken::new("mock-access-token"))
			.await
			.expect("Account lookup should succeed.");

		assert_eq!(owner.id(), Some("dummy-name"));
		assert_eq!(owner.get_str("foo"), Some("bar"));
		assert_eq!(owner.get("missing"), None);
	}

	#[test]
	fn authorization_url_targets_steemconnect() {
		let provider = provider(CannedHttpClient::default());
		let request = provider.authorization_url().expect("Authorize URL should build.");
		let pairs: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();

		assert_eq!(request.url.origin().ascii_serialization(), "https://v2.steemconnect.com");
		assert_eq!(request.url.path(), "/oauth2/authorize");
		assert_eq!(pairs["client_id"], APPLICATION_ID);
		assert_eq!(pairs["redirect_uri"], RETURN_URL);
		assert_eq!(pairs["response_type"], "code");
		assert_eq!(pairs["state"], request.state);
		assert_eq!(
			pairs["scope"],
			"login,offline,vote,comment,comment_delete,comment_options,custom_json,claim_reward_balance"
		);
	}

	#[test]
	fn hooks_delegate_to_config() {
		let provider = provider(CannedHttpClient::default());
		let config = provider.config();
		let token = AccessToken::new("abc");
		let mut params = BTreeMap::new();

		params.insert("code".to_owned(), "ignored".to_owned());

		assert_eq!(provider.default_scopes(), config.scopes());
		assert_eq!(
			provider.base_authorization_url().expect("URL should build."),
			config.build_url(EndpointKind::Authorization).expect("URL should build.")
		);
		assert_eq!(
			provider.base_access_token_url(&params).expect("URL should build."),
			config.build_url(EndpointKind::AccessToken).expect("URL should build.")
		);
		assert_eq!(
			provider.base_access_token_url(&BTreeMap::new()).expect("URL should build."),
			provider.base_access_token_url(&params).expect("URL should build.")
		);
		assert_eq!(
			provider.resource_owner_details_url(&token).expect("URL should build."),
			config.build_url(EndpointKind::Account).expect("URL should build.")
		);
	}

	#[test]
	fn authorization_header_is_the_raw_token() {
		let provider = provider(CannedHttpClient::default());

		assert_eq!(
			provider.authorization_headers(&AccessToken::new("abc")),
			vec![(AUTHORIZATION, "abc".to_owned())]
		);
		assert!(!format!("{provider:?}").contains("4c90e2e7"));
	}
}
