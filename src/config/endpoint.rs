// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoints exposed by the SteemConnect host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
	/// Authorization page the user is redirected to.
	Authorization,
	/// Token endpoint used for the authorization-code exchange.
	AccessToken,
	/// Account (resource owner) endpoint.
	Account,
}
impl EndpointKind {
	/// Every endpoint, in path-table order.
	pub const ALL: [EndpointKind; 3] =
		[EndpointKind::Authorization, EndpointKind::AccessToken, EndpointKind::Account];

	/// Returns the stable name used in configuration and errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			EndpointKind::Authorization => "authorization",
			EndpointKind::AccessToken => "access_token",
			EndpointKind::Account => "account",
		}
	}

	/// Returns the path appended to the host for this endpoint.
	pub const fn path(self) -> &'static str {
		match self {
			EndpointKind::Authorization => "/oauth2/authorize",
			EndpointKind::AccessToken => "/api/oauth2/token",
			EndpointKind::Account => "/api/me",
		}
	}
}
impl Display for EndpointKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for EndpointKind {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		EndpointKind::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| ConfigError::UnknownEndpoint { kind: s.to_owned() })
	}
}
