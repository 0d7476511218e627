pub mod appointments;
pub mod i18n;
pub mod services;
pub mod working_hours;
