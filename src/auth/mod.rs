//! Authentication and scope-based authorization primitives.

pub mod middleware;
pub mod models;
pub mod scope;

pub use models::{AuthContext, AuthError, ClientRegistry};
pub use scope::{required_scope, satisfies, Scope, SecretAction, LIST_SCOPE};
