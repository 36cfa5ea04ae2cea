//! Prints a SteemConnect authorize URL and, when a code is passed as the first argument,
//! exchanges it and prints the account it belongs to.
//!
//! Credentials come from `STEEMCONNECT_APP_ID`, `STEEMCONNECT_APP_SECRET`, and
//! `STEEMCONNECT_RETURN_URL`; demo values are used when they are unset.

// std
use std::env;
// crates.io
use color_eyre::Result;
// self
use steemconnect_oauth2::{auth::ScopeList, config::Config, provider::ReqwestProvider};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::new(
		env::var("STEEMCONNECT_APP_ID").unwrap_or_else(|_| "demo.app".into()),
		env::var("STEEMCONNECT_APP_SECRET").unwrap_or_else(|_| "demo-secret".into()),
	)?
	.with_return_url(
		env::var("STEEMCONNECT_RETURN_URL")
			.unwrap_or_else(|_| "https://app.example.com/oauth/callback".into()),
	)
	.with_scopes(ScopeList::new(["login", "vote"])?);
	let provider = ReqwestProvider::new(config);
	let request = provider.authorization_url()?;

	println!("Send your user to {}.", request.url);
	println!("Keep state `{}` to compare against the callback.", request.state);

	let code = env::args().nth(1);
	let Some(token) = provider.parse_return(code.as_deref()).await? else {
		println!("No authorization code given; pass the `code` query value to exchange it.");

		return Ok(());
	};

	println!(
		"Issued token for {} (expires at {:?}).",
		token.resource_owner_id().unwrap_or("<unknown>"),
		token.expires_at
	);

	let owner = provider.resource_owner(&token).await?;

	println!("Account name: {}.", owner.id().unwrap_or("<missing>"));

	Ok(())
}
