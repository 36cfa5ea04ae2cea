//! SteemConnect OAuth 2.0 provider: endpoint URLs, the authorization-code exchange, and
//! account lookups over a pluggable transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{config::Config, http::ReqwestHttpClient, provider::ReqwestProvider};

	/// Application identifier shared by test fixtures.
	pub const TEST_APPLICATION_ID: &str = "hernandev.app";
	/// Application secret shared by test fixtures.
	pub const TEST_APPLICATION_SECRET: &str = "4c90e2e77840b97ac001b37236be966cf73ce1373f4b4b5a";
	/// Return URL shared by test fixtures.
	pub const TEST_RETURN_URL: &str = "https://return-to.me/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds the fixture [`Config`] pointed at `host`.
	pub fn test_config(host: &str) -> Config {
		let host = Url::parse(host).expect("Test host should parse successfully.");

		Config::new(TEST_APPLICATION_ID, TEST_APPLICATION_SECRET)
			.expect("Test credentials should be valid.")
			.with_return_url(TEST_RETURN_URL)
			.with_host(host)
			.expect("Test host should be a valid base URL.")
	}

	/// Constructs a [`ReqwestProvider`] whose endpoints live on `host` and whose transport
	/// accepts `httpmock` certificates.
	pub fn build_reqwest_test_provider(host: &str) -> ReqwestProvider {
		ReqwestProvider::with_http_client(
			test_config(host),
			test_reqwest_http_client(),
			crate::oauth::ReqwestTransportErrorMapper,
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
