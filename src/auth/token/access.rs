//! Access token values decoded from token endpoint responses.

// self
use crate::{_prelude::*, auth::token::secret::Secret, error::DecodeError};

/// Lifecycle status of an [`AccessToken`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// Token is usable (or the provider never declared an expiry).
	Active,
	/// Token reached its expiry instant.
	Expired,
}

/// Token issued by the provider's token endpoint.
#[derive(Clone)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<Secret>,
	/// Token type announced by the provider (`bearer` for SteemConnect).
	pub token_type: Option<String>,
	/// Expiry instant computed from `expires_in` against the local clock at parse time.
	pub expires_at: Option<OffsetDateTime>,
	/// Identifier of the resource owner the token was issued for.
	pub resource_owner_id: Option<String>,
	/// Every response field not mapped onto a dedicated member.
	pub values: Map<String, Value>,
}
impl AccessToken {
	/// Creates a bare token carrying only the access token string.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			refresh_token: None,
			token_type: None,
			expires_at: None,
			resource_owner_id: None,
			values: Map::new(),
		}
	}

	/// Decodes a token endpoint response.
	///
	/// `expires_in` is applied to `issued_at` (saturating), never trusted as an absolute
	/// instant. When `resource_owner_id_field` is set, the named field (string or number)
	/// becomes [`AccessToken::resource_owner_id`].
	pub fn from_response(
		body: Value,
		resource_owner_id_field: Option<&str>,
		issued_at: OffsetDateTime,
	) -> Result<Self, DecodeError> {
		let raw: RawTokenResponse = serde_path_to_error::deserialize(body)?;
		let resource_owner_id = resource_owner_id_field
			.and_then(|field| raw.values.get(field))
			.and_then(|value| match value {
				Value::String(text) => Some(text.to_owned()),
				Value::Number(number) => Some(number.to_string()),
				_ => None,
			});
		let expires_at =
			raw.expires_in.map(|secs| issued_at.saturating_add(Duration::seconds(secs)));

		Ok(Self {
			access_token: Secret::new(raw.access_token),
			refresh_token: raw.refresh_token.map(Secret::new),
			token_type: raw.token_type,
			expires_at,
			resource_owner_id,
			values: raw.values,
		})
	}

	/// Returns the access token string. Callers must avoid logging it.
	pub fn token(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns the refresh token string, if any.
	pub fn refresh_token(&self) -> Option<&str> {
		self.refresh_token.as_ref().map(Secret::expose)
	}

	/// Returns the resource owner identifier, if the response carried one.
	pub fn resource_owner_id(&self) -> Option<&str> {
		self.resource_owner_id.as_deref()
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match self.expires_at {
			Some(expires_at) if instant >= expires_at => TokenStatus::Expired,
			_ => TokenStatus::Active,
		}
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.field("resource_owner_id", &self.resource_owner_id)
			.finish()
	}
}

#[derive(Deserialize)]
struct RawTokenResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(flatten)]
	values: Map<String, Value>,
}
