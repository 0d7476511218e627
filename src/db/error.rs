use thiserror::Error;

use crate::scheduling::{AppointmentStatus, ExistingAppointment};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Time slot already taken")]
    SlotTaken {
        conflict: Option<Box<ExistingAppointment>>,
    },

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

pub(crate) const EXCLUSION_VIOLATION: &str = "23P01";
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE of a failed statement, if any.
pub(crate) fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}
