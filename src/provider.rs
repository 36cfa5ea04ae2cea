//! Provider hooks (behavior) and the SteemConnect adapter built on them.
//!
//! `hooks` defines [`ProviderHooks`], the HTTP-client-agnostic capability set the
//! [`crate::oauth`] plumbing calls into. `steemconnect` supplies [`Provider`], which fills
//! those hooks from a [`crate::config::Config`] and drives the authorization-code flow.

pub mod hooks;

mod steemconnect;

pub use hooks::*;
pub use steemconnect::*;
