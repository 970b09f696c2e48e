// src/models/time_record.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Row,
    models::collection::{encode_row, Collection, Record},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Diurno,
    Noturno,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Diurno => "diurno",
            Shift::Noturno => "noturno",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TimeRecordRow {
    pub id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub employee_name: Option<String>,
    pub date: Option<String>,
    pub shift: Option<String>,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub observations: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    /// Nome no momento do registro; não acompanha renomeações.
    pub employee_name: String,
    #[schema(example = "2025-03-05")]
    pub date: String,
    pub shift: Option<Shift>,
    #[schema(example = "07:00")]
    pub entry_time: String,
    #[schema(example = "19:00")]
    pub exit_time: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "normal")]
    pub kind: String,
    pub observations: String,
    pub created_at: Option<String>,
}

impl Record for TimeRecord {
    const COLLECTION: Collection = Collection::TimeRecords;
    type Row = TimeRecordRow;

    fn from_row(row: TimeRecordRow) -> Self {
        let shift = match row.shift.as_deref() {
            Some("diurno") => Some(Shift::Diurno),
            Some("noturno") => Some(Shift::Noturno),
            _ => None,
        };
        Self {
            id: row.id.unwrap_or_default(),
            employee_id: row.employee_id,
            employee_name: row.employee_name.unwrap_or_default(),
            date: row.date.unwrap_or_default(),
            shift,
            entry_time: row.entry_time.unwrap_or_default(),
            exit_time: row.exit_time,
            kind: row.kind.unwrap_or_default(),
            observations: row.observations.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecordForm {
    pub employee_id: Uuid,
    #[validate(custom(function = "validate_date"))]
    #[schema(example = "2025-03-05")]
    pub date: String,
    pub shift: Shift,
    #[validate(custom(function = "validate_clock_time"))]
    #[schema(example = "07:00")]
    pub entry_time: String,
    pub exit_time: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "normal")]
    pub kind: String,
    #[serde(default)]
    pub observations: String,
}

fn validate_date(value: &str) -> Result<(), validator::ValidationError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            let mut err = validator::ValidationError::new("date");
            err.message = Some("invalid_date".into());
            err
        })
}

fn validate_clock_time(value: &str) -> Result<(), validator::ValidationError> {
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| {
            let mut err = validator::ValidationError::new("time");
            err.message = Some("invalid_time".into());
            err
        })
}

impl TimeRecordForm {
    /// `employee_name` é o nome do funcionário no momento da gravação.
    pub fn to_row(&self, employee_name: &str) -> Result<Row, AppError> {
        encode_row(&json!({
            "employee_id": self.employee_id,
            "employee_name": employee_name,
            "date": self.date,
            "shift": self.shift,
            "entry_time": self.entry_time,
            "exit_time": self.exit_time,
            "type": self.kind,
            "observations": self.observations,
        }))
    }
}
