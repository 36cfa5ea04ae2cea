//! Application credentials, return URL, scopes, and the endpoint path table.
//!
//! [`Config`] is the only place that knows where SteemConnect lives. Endpoint URLs are
//! built by appending the fixed path for an [`EndpointKind`] to the host, so the three
//! URLs always share the same origin.

mod endpoint;

pub use endpoint::*;

// self
use crate::{
	_prelude::*,
	auth::{ApplicationId, ScopeList, Secret},
	error::ConfigError,
};

/// Production SteemConnect host.
pub const DEFAULT_HOST: &str = "https://v2.steemconnect.com";
/// Scopes requested when the caller does not configure any.
pub const DEFAULT_SCOPES: [&str; 8] = [
	"login",
	"offline",
	"vote",
	"comment",
	"comment_delete",
	"comment_options",
	"custom_json",
	"claim_reward_balance",
];

/// Per-flow SteemConnect client configuration.
///
/// Credentials and host are fixed at construction; the return URL and scopes may be
/// changed until the first URL is built. Deserializes from any serde format with the same
/// validation as [`Config::new`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
	application_id: ApplicationId,
	application_secret: Secret,
	return_url: Option<String>,
	scopes: Option<ScopeList>,
	host: Url,
}
impl Config {
	/// Creates a configuration for the production host.
	pub fn new(
		application_id: impl AsRef<str>,
		application_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let application_id = ApplicationId::new(application_id)?;
		let application_secret = Secret::new(application_secret);

		if application_secret.is_empty() {
			return Err(ConfigError::MissingApplicationSecret);
		}

		let host = parse_host(DEFAULT_HOST)?;

		Ok(Self { application_id, application_secret, return_url: None, scopes: None, host })
	}

	/// Sets the return (callback) URL; stored verbatim and parsed on use.
	pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
		self.return_url = Some(url.into());

		self
	}

	/// Replaces the return (callback) URL in place.
	pub fn set_return_url(&mut self, url: impl Into<String>) -> &mut Self {
		self.return_url = Some(url.into());

		self
	}

	/// Overrides the requested scopes.
	pub fn with_scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = Some(scopes);

		self
	}

	/// Replaces the requested scopes in place.
	pub fn set_scopes(&mut self, scopes: ScopeList) -> &mut Self {
		self.scopes = Some(scopes);

		self
	}

	/// Points every endpoint at another host (staging deployments, local mocks).
	///
	/// Endpoint paths are appended to the host, so hosts carrying a query or fragment are
	/// rejected along with those that cannot be a base.
	pub fn with_host(mut self, host: Url) -> Result<Self, ConfigError> {
		if host.cannot_be_a_base()
			|| host.host_str().is_none()
			|| host.query().is_some()
			|| host.fragment().is_some()
		{
			return Err(ConfigError::InvalidHost { host: host.to_string() });
		}

		self.host = host;

		Ok(self)
	}

	/// Application (OAuth client) identifier.
	pub fn application_id(&self) -> &ApplicationId {
		&self.application_id
	}

	/// Application (OAuth client) secret.
	pub fn application_secret(&self) -> &Secret {
		&self.application_secret
	}

	/// Endpoint host.
	pub fn host(&self) -> &Url {
		&self.host
	}

	/// Parsed return URL.
	pub fn return_url(&self) -> Result<Url, ConfigError> {
		let raw = self.return_url.as_deref().ok_or(ConfigError::MissingReturnUrl)?;

		Url::parse(raw)
			.map_err(|source| ConfigError::InvalidReturnUrl { url: raw.to_owned(), source })
	}

	/// Configured scopes, or [`DEFAULT_SCOPES`] when none were set.
	pub fn scopes(&self) -> ScopeList {
		match &self.scopes {
			Some(scopes) => scopes.clone(),
			None => default_scopes(),
		}
	}

	/// Builds the URL of `kind` as `host + path`.
	pub fn build_url(&self, kind: EndpointKind) -> Result<Url, ConfigError> {
		let base = self.host.as_str().trim_end_matches('/');

		Url::parse(&format!("{base}{}", kind.path()))
			.map_err(|source| ConfigError::InvalidEndpoint { kind, source })
	}

	/// Builds the URL for an endpoint given by name.
	///
	/// Names outside `authorization`, `access_token`, and `account` fail with
	/// [`ConfigError::UnknownEndpoint`].
	pub fn build_named_url(&self, kind: &str) -> Result<Url, ConfigError> {
		self.build_url(kind.parse()?)
	}
}
impl TryFrom<RawConfig> for Config {
	type Error = ConfigError;

	fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
		let mut config = Config::new(raw.application_id, raw.application_secret)?;

		config.return_url = raw.return_url;
		config.scopes = raw.scopes;

		if let Some(host) = raw.host {
			config = config.with_host(parse_host(&host)?)?;
		}

		Ok(config)
	}
}

#[derive(Deserialize)]
struct RawConfig {
	application_id: String,
	application_secret: String,
	#[serde(default)]
	return_url: Option<String>,
	#[serde(default)]
	scopes: Option<ScopeList>,
	#[serde(default)]
	host: Option<String>,
}

fn parse_host(host: &str) -> Result<Url, ConfigError> {
	Url::parse(host).map_err(|_| ConfigError::InvalidHost { host: host.to_owned() })
}

fn default_scopes() -> ScopeList {
	// `DEFAULT_SCOPES` always validates.
	ScopeList::new(DEFAULT_SCOPES).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::IdentifierError;

	fn config() -> Config {
		Config::new("hernandev.app", "4c90e2e77840b97ac001b37236be966cf73ce1373f4b4b5a")
			.expect("Fixture credentials should be valid.")
	}

	#[test]
	fn builds_the_fixed_path_table() {
		let config = config();

		assert_eq!(
			config.build_url(EndpointKind::Authorization).expect("URL should build.").as_str(),
			"https://v2.steemconnect.com/oauth2/authorize"
		);
		assert_eq!(
			config.build_url(EndpointKind::AccessToken).expect("URL should build.").as_str(),
			"https://v2.steemconnect.com/api/oauth2/token"
		);
		assert_eq!(
			config.build_named_url("account").expect("URL should build.").as_str(),
			"https://v2.steemconnect.com/api/me"
		);
	}

	#[test]
	fn unknown_endpoint_names_never_fall_back() {
		let err = config().build_named_url("broadcast").expect_err("Unknown kinds must fail.");

		assert!(matches!(err, ConfigError::UnknownEndpoint { .. }));
		assert!(config().build_named_url("").is_err());
	}

	#[test]
	fn host_override_keeps_path_prefix() {
		let config = config()
			.with_host(Url::parse("http://127.0.0.1:8080/sc2/").expect("Host should parse."))
			.expect("Host should be accepted.");

		assert_eq!(
			config.build_url(EndpointKind::Account).expect("URL should build.").as_str(),
			"http://127.0.0.1:8080/sc2/api/me"
		);

		let err = config
			.clone()
			.with_host(Url::parse("mailto:ops@example.com").expect("Mailto URL should parse."))
			.expect_err("Non-base URLs must be rejected.");

		assert!(matches!(err, ConfigError::InvalidHost { .. }));

		for host in [
			"https://staging.example.com/?tenant=a",
			"https://staging.example.com/?",
			"https://staging.example.com/#x",
		] {
			let err = config
				.clone()
				.with_host(Url::parse(host).expect("Host should parse."))
				.expect_err("Hosts with a query or fragment must be rejected.");

			assert!(matches!(err, ConfigError::InvalidHost { .. }), "Unexpected error for {host}.");
		}
	}

	#[test]
	fn credentials_are_validated() {
		assert!(matches!(
			Config::new("", "secret"),
			Err(ConfigError::InvalidApplicationId(IdentifierError::Empty))
		));
		assert!(matches!(
			Config::new("hernandev.app", ""),
			Err(ConfigError::MissingApplicationSecret)
		));
		assert!(!format!("{:?}", config()).contains("4c90e2e7"));
	}

	#[test]
	fn return_url_is_stored_verbatim_and_parsed_on_use() {
		let mut config = config();

		assert!(matches!(config.return_url(), Err(ConfigError::MissingReturnUrl)));

		config.set_return_url("not a url");

		assert!(matches!(config.return_url(), Err(ConfigError::InvalidReturnUrl { .. })));

		config.set_return_url("https://return-to.me/callback");

		assert_eq!(
			config.return_url().expect("Return URL should parse.").as_str(),
			"https://return-to.me/callback"
		);
	}

	#[test]
	fn scopes_default_until_overridden() {
		let mut config = config();

		assert_eq!(config.scopes().iter().collect::<Vec<_>>(), DEFAULT_SCOPES.to_vec());

		config.set_scopes(ScopeList::new(["login", "vote"]).expect("Scopes should be valid."));

		assert_eq!(config.scopes().iter().collect::<Vec<_>>(), vec!["login", "vote"]);
	}

	#[test]
	fn deserializes_with_validation() {
		let config: Config = serde_json::from_str(
			r#"{
				"application_id": "hernandev.app",
				"application_secret": "secret",
				"return_url": "https://return-to.me/callback",
				"scopes": ["login"],
				"host": "https://staging.steemconnect.com"
			}"#,
		)
		.expect("Config should deserialize.");

		assert_eq!(config.application_id().as_ref(), "hernandev.app");
		assert_eq!(config.scopes().to_string(), "login");
		assert_eq!(config.host().as_str(), "https://staging.steemconnect.com/");
		assert!(
			serde_json::from_str::<Config>(
				r#"{ "application_id": "hernandev.app", "application_secret": "" }"#
			)
			.is_err()
		);

		let err = serde_json::from_str::<Config>(
			r#"{
				"application_id": "hernandev.app",
				"application_secret": "secret",
				"host": "https://h.example.com/#x"
			}"#,
		)
		.expect_err("Hosts with a fragment must be rejected.");

		assert!(err.to_string().contains("https://h.example.com/#x"));
	}
}
