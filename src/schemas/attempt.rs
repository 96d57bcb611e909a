use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::config::MediaSettings;
use crate::core::time::format_primitive;
use crate::db::models::AttemptListRow;
use crate::db::types::OptionLabel;
use crate::schemas::question::AttemptQuestionResponse;
use crate::services::attempts::{AttemptResult, AttemptView, StartOutcome, TakeOutcome};

#[derive(Debug, Serialize)]
pub(crate) struct StartAttemptResponse {
    pub(crate) code: String,
    pub(crate) exam_id: i64,
    pub(crate) resumed: bool,
    pub(crate) start_time: String,
    pub(crate) question_count: usize,
    pub(crate) total_marks: f64,
}

impl StartAttemptResponse {
    pub(crate) fn from_outcome(outcome: StartOutcome) -> Self {
        let attempt = outcome.attempt;
        Self {
            question_count: attempt.question_ids().len(),
            code: attempt.code,
            exam_id: attempt.exam_id,
            resumed: outcome.resumed,
            start_time: format_primitive(attempt.start_time),
            total_marks: attempt.total_marks,
        }
    }
}

/// Body of `POST /attempts/{code}/answers`; keys are question ids.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnswersPayload {
    #[serde(default)]
    pub(crate) answers: BTreeMap<i64, String>,
    #[serde(default)]
    pub(crate) submit: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptSessionResponse {
    pub(crate) code: String,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) duration_minutes: i32,
    pub(crate) remaining_seconds: i64,
    pub(crate) start_time: String,
    pub(crate) questions: Vec<AttemptQuestionResponse>,
    pub(crate) answers: BTreeMap<i64, OptionLabel>,
}

impl AttemptSessionResponse {
    pub(crate) fn from_view(view: AttemptView, media: &MediaSettings) -> Self {
        Self {
            code: view.attempt.code,
            exam_id: view.exam.id,
            exam_name: view.exam.name,
            duration_minutes: view.exam.duration_minutes,
            remaining_seconds: view.remaining_seconds,
            start_time: format_primitive(view.attempt.start_time),
            questions: view
                .questions
                .into_iter()
                .map(|question| AttemptQuestionResponse::from_db(question, media))
                .collect(),
            answers: view.answers,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResultResponse {
    pub(crate) code: String,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) username: String,
    pub(crate) score: f64,
    pub(crate) total_marks: f64,
    pub(crate) percentage: f64,
    pub(crate) pass_percentage: f64,
    pub(crate) passed: bool,
    pub(crate) is_completed: bool,
    pub(crate) start_time: String,
    pub(crate) end_time: Option<String>,
}

impl AttemptResultResponse {
    pub(crate) fn from_result(result: AttemptResult) -> Self {
        let attempt = result.attempt;
        Self {
            code: attempt.code,
            exam_id: result.exam.id,
            exam_name: result.exam.name,
            username: result.username,
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: round_percentage(attempt.percentage),
            pass_percentage: result.exam.pass_percentage,
            passed: result.passed,
            is_completed: attempt.is_completed,
            start_time: format_primitive(attempt.start_time),
            end_time: attempt.end_time.map(format_primitive),
        }
    }
}

/// Either the open session or, once the attempt is over, its result.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum AttemptStateResponse {
    InProgress(AttemptSessionResponse),
    Completed(AttemptResultResponse),
}

impl AttemptStateResponse {
    pub(crate) fn from_outcome(outcome: TakeOutcome, media: &MediaSettings) -> Self {
        match outcome {
            TakeOutcome::InProgress(view) => {
                Self::InProgress(AttemptSessionResponse::from_view(view, media))
            }
            TakeOutcome::Completed(result) => {
                Self::Completed(AttemptResultResponse::from_result(result))
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptListItem {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) username: String,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) score: f64,
    pub(crate) total_marks: f64,
    pub(crate) percentage: f64,
    pub(crate) is_completed: bool,
    pub(crate) start_time: String,
    pub(crate) end_time: Option<String>,
}

impl AttemptListItem {
    pub(crate) fn from_row(row: AttemptListRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            username: row.username,
            exam_id: row.exam_id,
            exam_name: row.exam_name,
            score: row.score,
            total_marks: row.total_marks,
            percentage: round_percentage(row.percentage),
            is_completed: row.is_completed,
            start_time: format_primitive(row.start_time),
            end_time: row.end_time.map(format_primitive),
        }
    }
}

fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_payload_reads_numeric_string_keys() {
        let payload: AnswersPayload =
            serde_json::from_value(serde_json::json!({"answers": {"12": "a", "7": "D"}}))
                .expect("payload");

        assert!(!payload.submit);
        assert_eq!(payload.answers.get(&12).map(String::as_str), Some("a"));
        assert_eq!(payload.answers.get(&7).map(String::as_str), Some("D"));
    }

    #[test]
    fn empty_body_means_no_answers() {
        let payload: AnswersPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(payload.answers.is_empty());
        assert!(!payload.submit);
    }

    #[test]
    fn percentage_is_rounded_to_two_places() {
        assert_eq!(round_percentage(100.0 / 3.0), 33.33);
        assert_eq!(round_percentage(50.0), 50.0);
    }
}
