//! Access token values and the redacting secret wrapper they are built from.

pub mod access;
pub mod secret;
