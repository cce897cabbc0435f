pub mod auth;
pub mod handlers;
pub mod insights;
pub mod middleware;
pub mod profile;
pub mod responses;
pub mod routes;
pub mod search;
pub mod works;
pub mod ws;

pub use responses::{ApiError, ErrorResponse};
pub use routes::create_router;
