use serde::Deserialize;

use crate::db::DatabaseError;
use crate::scheduling::{TimeOfDay, WorkingHours};

/// Raw `working_hours` row.
#[derive(Debug, sqlx::FromRow)]
pub struct WorkingHoursRow {
    pub day_of_week: i16,
    pub is_open: bool,
    pub start_time: time::Time,
    pub end_time: time::Time,
}

impl TryFrom<WorkingHoursRow> for WorkingHours {
    type Error = DatabaseError;

    fn try_from(row: WorkingHoursRow) -> Result<Self, Self::Error> {
        let day_of_week = u8::try_from(row.day_of_week)
            .map_err(|_| DatabaseError::InvalidInput(format!("day_of_week {}", row.day_of_week)))?;
        Ok(WorkingHours {
            day_of_week,
            is_open: row.is_open,
            start_time: row.start_time.into(),
            end_time: row.end_time.into(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkingHours {
    pub is_open: bool,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl UpdateWorkingHours {
    pub fn for_day(&self, day_of_week: u8) -> WorkingHours {
        WorkingHours {
            day_of_week,
            is_open: self.is_open,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}
