//! Appointment booking backend for a salon: scheduling rules, storage and
//! the REST surface around them.

pub mod app;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod modules;
pub mod scheduling;
pub mod telemetry;
pub mod websocket;
