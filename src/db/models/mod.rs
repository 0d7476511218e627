mod appointment;
mod service;
mod working_hours;

pub use appointment::*;
pub use service::*;
pub use working_hours::*;
