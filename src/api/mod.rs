//! HTTP binding for the secret store: routes, handlers, error responses.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use handlers::ApiState;
pub use routes::build_router;
pub use server::start_api_server;
