//! Crate-level error types shared by the configuration, provider, and transport layers.

// self
use crate::{_prelude::*, auth::ScopeValidationError, config::EndpointKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// JSON decoding failure annotated with the path of the offending field.
pub type DecodeError = serde_path_to_error::Error<serde_json::Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; raised before any I/O.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider answered with an `error` payload.
	#[error(transparent)]
	IdentityProvider(#[from] IdentityProviderError),
	/// Transport failure (DNS, TCP, TLS, timeouts) or an undecodable response body.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Endpoint name outside the fixed path table.
	#[error("Unknown endpoint kind `{kind}`; expected authorization, access_token, or account.")]
	UnknownEndpoint {
		/// Name supplied by the caller.
		kind: String,
	},
	/// Application identifier failed validation.
	#[error(transparent)]
	InvalidApplicationId(#[from] crate::auth::IdentifierError),
	/// Application secret was empty.
	#[error("Application secret cannot be empty.")]
	MissingApplicationSecret,
	/// Return URL was never configured.
	#[error("Return URL is not configured.")]
	MissingReturnUrl,
	/// Return URL cannot be parsed.
	#[error("Return URL `{url}` is invalid.")]
	InvalidReturnUrl {
		/// Verbatim value stored on the config.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint host cannot serve as a base for endpoint paths.
	#[error("Endpoint host `{host}` must be a base URL without a query or fragment.")]
	InvalidHost {
		/// Offending host value.
		host: String,
	},
	/// Host plus endpoint path did not form a valid URL.
	#[error("The {kind} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Endpoint that failed to build.
		kind: EndpointKind,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Scope list failed validation.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Error payload returned by the identity provider.
///
/// Raised whenever a decoded response carries a top-level `error` field, whatever the
/// HTTP status. The raw body is kept for diagnostics.
#[derive(Debug, ThisError)]
#[error("Identity provider returned an error (HTTP {status}): {message}.")]
pub struct IdentityProviderError {
	/// Value of the `error` field.
	pub message: String,
	/// Value of the optional `error_description` field.
	pub description: Option<String>,
	/// HTTP status code of the response.
	pub status: u16,
	/// Decoded response body.
	pub body: Value,
}
impl IdentityProviderError {
	/// Builds the error from a decoded body, if that body carries an `error` field.
	pub fn from_body(status: u16, body: &Value) -> Option<Self> {
		let error = body.get("error")?;
		let message = match error {
			Value::String(text) => text.to_owned(),
			other => other.to_string(),
		};
		let description =
			body.get("error_description").and_then(Value::as_str).map(ToOwned::to_owned);

		Some(Self { message, description, status, body: body.to_owned() })
	}
}

/// Transport-level failures (network, IO, undecodable bodies).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint being called.
		endpoint: EndpointKind,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request timed out before the provider answered.
	#[error("Request to the {endpoint} endpoint timed out.")]
	Timeout {
		/// Endpoint being called.
		endpoint: EndpointKind,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// HTTP client failure that carries only a message.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint being called.
		endpoint: EndpointKind,
		/// Client-supplied message.
		message: String,
	},
	/// Response body is not JSON or lacks required fields.
	#[error("The {endpoint} endpoint returned a malformed response (HTTP {status}).")]
	MalformedResponse {
		/// Endpoint being called.
		endpoint: EndpointKind,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: DecodeError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: EndpointKind,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout.
	pub fn timeout(
		endpoint: EndpointKind,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Timeout { endpoint, source: Box::new(src) }
	}
}
