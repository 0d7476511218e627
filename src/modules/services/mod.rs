pub mod handlers;
pub mod routes;

pub use routes::service_routes;
