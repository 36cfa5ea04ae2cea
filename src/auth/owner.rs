//! SteemConnect account profile returned by the `/api/me` endpoint.

// self
use crate::_prelude::*;

/// Read-only view over the decoded account payload.
///
/// The payload is kept whole; [`ResourceOwner::get`] reads fields of its nested `account`
/// object and [`ResourceOwner::to_value`] hands back everything else.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceOwner {
	payload: Value,
}
impl ResourceOwner {
	/// Wraps a decoded `/api/me` response.
	pub fn new(payload: Value) -> Self {
		Self { payload }
	}

	/// Account name, i.e. `account.name`.
	pub fn id(&self) -> Option<&str> {
		self.get_str("name")
	}

	/// Looks up `account[field]`; absent fields yield `None`.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.account()?.get(field)
	}

	/// Looks up `account[field]` when it holds a string.
	pub fn get_str(&self, field: &str) -> Option<&str> {
		self.get(field).and_then(Value::as_str)
	}

	/// The nested `account` object, if present.
	pub fn account(&self) -> Option<&Map<String, Value>> {
		self.payload.get("account")?.as_object()
	}

	/// Full payload, including fields outside `account`.
	pub fn to_value(&self) -> &Value {
		&self.payload
	}

	/// Consumes the owner and returns the full payload.
	pub fn into_value(self) -> Value {
		self.payload
	}
}
