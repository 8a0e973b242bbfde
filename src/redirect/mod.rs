pub mod error;
pub mod handlers;
pub mod middleware;
pub mod resolver;
pub mod routes;
pub mod static_files;

pub use error::ConfigurationError;
pub use resolver::RedirectResolver;
pub use routes::create_redirect_router;
