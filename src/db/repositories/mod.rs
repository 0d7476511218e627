mod appointment_repository;
mod service_repository;
mod working_hours_repository;

pub use appointment_repository::AppointmentRepository;
pub use service_repository::ServiceRepository;
pub use working_hours_repository::WorkingHoursRepository;
