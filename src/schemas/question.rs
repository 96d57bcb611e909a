use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::config::MediaSettings;
use crate::db::models::{Question, QuestionOptions};
use crate::db::types::{OptionKind, OptionLabel};
use crate::services::content_rules;
use crate::services::error::PortalError;
use crate::store::QuestionFields;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionPayload {
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub(crate) question_text: String,
    #[serde(default = "default_option_kind", alias = "optionKind")]
    pub(crate) option_kind: OptionKind,
    #[serde(default)]
    pub(crate) option_a: Option<String>,
    #[serde(default)]
    pub(crate) option_b: Option<String>,
    #[serde(default)]
    pub(crate) option_c: Option<String>,
    #[serde(default)]
    pub(crate) option_d: Option<String>,
    #[serde(default)]
    pub(crate) option_a_image: Option<String>,
    #[serde(default)]
    pub(crate) option_b_image: Option<String>,
    #[serde(default)]
    pub(crate) option_c_image: Option<String>,
    #[serde(default)]
    pub(crate) option_d_image: Option<String>,
    #[serde(alias = "correctAnswer")]
    pub(crate) correct_answer: String,
    #[serde(default)]
    pub(crate) marks: Option<f64>,
}

impl QuestionPayload {
    pub(crate) fn into_fields(
        self,
        allowed_extensions: &[String],
    ) -> Result<QuestionFields, PortalError> {
        let correct_answer = OptionLabel::parse(&self.correct_answer).ok_or_else(|| {
            PortalError::validation("correct_answer must be one of A, B, C or D")
        })?;
        let marks = self.marks.unwrap_or(1.0);
        content_rules::validate_marks(marks)?;

        let options = content_rules::build_options(
            self.option_kind,
            [self.option_a, self.option_b, self.option_c, self.option_d],
            [self.option_a_image, self.option_b_image, self.option_c_image, self.option_d_image],
            allowed_extensions,
        )?;

        Ok(QuestionFields {
            question_text: self.question_text.trim().to_string(),
            options,
            correct_answer,
            marks,
        })
    }
}

/// One option as rendered to clients: inline text or a resolved image URL.
#[derive(Debug, Serialize)]
pub(crate) struct OptionView {
    pub(crate) label: OptionLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image_url: Option<String>,
}

fn option_views(question: &Question, media: &MediaSettings) -> Vec<OptionView> {
    let options = question.options();
    OptionLabel::ALL
        .into_iter()
        .zip(options.values().iter())
        .map(|(label, value)| match &options {
            QuestionOptions::Text(_) => {
                OptionView { label, text: Some(value.clone()), image_url: None }
            }
            QuestionOptions::Image(_) => {
                OptionView { label, text: None, image_url: Some(media.url_for(value)) }
            }
        })
        .collect()
}

/// Admin view, including the correct answer.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) question_text: String,
    pub(crate) option_kind: OptionKind,
    pub(crate) options: Vec<OptionView>,
    pub(crate) correct_answer: OptionLabel,
    pub(crate) marks: f64,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question, media: &MediaSettings) -> Self {
        Self {
            options: option_views(&question, media),
            id: question.id,
            exam_id: question.exam_id,
            question_text: question.question_text,
            option_kind: question.option_kind,
            correct_answer: question.correct_answer,
            marks: question.marks,
        }
    }
}

/// Taker view; never exposes the correct answer.
#[derive(Debug, Serialize)]
pub(crate) struct AttemptQuestionResponse {
    pub(crate) id: i64,
    pub(crate) question_text: String,
    pub(crate) option_kind: OptionKind,
    pub(crate) options: Vec<OptionView>,
    pub(crate) marks: f64,
}

impl AttemptQuestionResponse {
    pub(crate) fn from_db(question: Question, media: &MediaSettings) -> Self {
        Self {
            options: option_views(&question, media),
            id: question.id,
            question_text: question.question_text,
            option_kind: question.option_kind,
            marks: question.marks,
        }
    }
}

fn default_option_kind() -> OptionKind {
    OptionKind::Text
}
