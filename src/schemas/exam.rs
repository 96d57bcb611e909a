use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use validator::Validate;

use crate::core::time::{format_primitive, to_primitive_utc};
use crate::db::models::Exam;
use crate::schemas::question::QuestionResponse;
use crate::store::ExamFields;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamPayload {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be at least 1"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "numberOfQuestions")]
    #[validate(range(min = 1, message = "number_of_questions must be at least 1"))]
    pub(crate) number_of_questions: i32,
    #[serde(alias = "startDate", deserialize_with = "deserialize_datetime_flexible")]
    pub(crate) start_date: OffsetDateTime,
    #[serde(alias = "endDate", deserialize_with = "deserialize_datetime_flexible")]
    pub(crate) end_date: OffsetDateTime,
    #[serde(default, alias = "passPercentage")]
    #[validate(range(min = 0.0, max = 100.0, message = "pass_percentage must be within 0..100"))]
    pub(crate) pass_percentage: Option<f64>,
}

impl ExamPayload {
    pub(crate) fn into_fields(self, default_pass_percentage: f64) -> ExamFields {
        ExamFields {
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            duration_minutes: self.duration_minutes,
            number_of_questions: self.number_of_questions,
            start_date: to_primitive_utc(self.start_date),
            end_date: to_primitive_utc(self.end_date),
            pass_percentage: self.pass_percentage.unwrap_or(default_pass_percentage),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: i64,
    pub(crate) category_id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) duration_minutes: i32,
    pub(crate) number_of_questions: i32,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) pass_percentage: f64,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam, now: PrimitiveDateTime) -> Self {
        Self {
            is_active: exam.is_active_at(now),
            id: exam.id,
            category_id: exam.category_id,
            name: exam.name,
            description: exam.description,
            duration_minutes: exam.duration_minutes,
            number_of_questions: exam.number_of_questions,
            start_date: format_primitive(exam.start_date),
            end_date: format_primitive(exam.end_date),
            pass_percentage: exam.pass_percentage,
            created_at: format_primitive(exam.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamDetailResponse {
    pub(crate) exam: ExamResponse,
    pub(crate) questions: Vec<QuestionResponse>,
}

fn parse_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // Browser datetime-local inputs omit seconds and zone; treat them as UTC.
    if raw.len() == 16 && raw.as_bytes().get(10) == Some(&b'T') {
        if let Ok(value) = OffsetDateTime::parse(&format!("{raw}:00Z"), &Rfc3339) {
            return Some(value);
        }
    }

    if raw.len() == 19 && raw.as_bytes().get(10) == Some(&b'T') {
        if let Ok(value) = OffsetDateTime::parse(&format!("{raw}Z"), &Rfc3339) {
            return Some(value);
        }
    }

    PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

fn deserialize_datetime_flexible<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime_flexible(raw.trim())
        .ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}
