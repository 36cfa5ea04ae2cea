//! Auth-domain identifiers, scope lists, token values, and resource owners.

pub mod id;
pub mod owner;
pub mod scope;
pub mod token;

pub use id::*;
pub use owner::*;
pub use scope::*;
pub use token::{access::*, secret::*};
