pub mod handlers;
pub mod routes;

pub use routes::working_hours_routes;
