use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{OptionKind, OptionLabel, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl User {
    pub(crate) fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Category {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: i64,
    pub(crate) category_id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) duration_minutes: i32,
    pub(crate) number_of_questions: i32,
    pub(crate) start_date: PrimitiveDateTime,
    pub(crate) end_date: PrimitiveDateTime,
    pub(crate) pass_percentage: f64,
    pub(crate) created_at: PrimitiveDateTime,
}

impl Exam {
    /// Whether `now` falls inside the inclusive activity window.
    pub(crate) fn is_active_at(&self, now: PrimitiveDateTime) -> bool {
        self.start_date <= now && now <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) exam_id: i64,
    pub(crate) question_text: String,
    pub(crate) option_kind: OptionKind,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) option_a_image: Option<String>,
    pub(crate) option_b_image: Option<String>,
    pub(crate) option_c_image: Option<String>,
    pub(crate) option_d_image: Option<String>,
    pub(crate) correct_answer: OptionLabel,
    pub(crate) marks: f64,
    pub(crate) created_at: PrimitiveDateTime,
}

/// The four options of a question, either inline text or image references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QuestionOptions {
    Text([String; 4]),
    Image([String; 4]),
}

impl QuestionOptions {
    pub(crate) fn kind(&self) -> OptionKind {
        match self {
            Self::Text(_) => OptionKind::Text,
            Self::Image(_) => OptionKind::Image,
        }
    }

    pub(crate) fn values(&self) -> &[String; 4] {
        match self {
            Self::Text(values) | Self::Image(values) => values,
        }
    }

    /// Flattens into the column layout: four text columns and four image columns.
    pub(crate) fn into_columns(self) -> ([String; 4], [Option<String>; 4]) {
        match self {
            Self::Text(values) => (values, [None, None, None, None]),
            Self::Image([a, b, c, d]) => {
                (Default::default(), [Some(a), Some(b), Some(c), Some(d)])
            }
        }
    }
}

impl Question {
    pub(crate) fn options(&self) -> QuestionOptions {
        match self.option_kind {
            OptionKind::Text => QuestionOptions::Text([
                self.option_a.clone(),
                self.option_b.clone(),
                self.option_c.clone(),
                self.option_d.clone(),
            ]),
            OptionKind::Image => QuestionOptions::Image([
                self.option_a_image.clone().unwrap_or_default(),
                self.option_b_image.clone().unwrap_or_default(),
                self.option_c_image.clone().unwrap_or_default(),
                self.option_d_image.clone().unwrap_or_default(),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamAttempt {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) user_id: String,
    pub(crate) exam_id: i64,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) score: f64,
    pub(crate) total_marks: f64,
    pub(crate) percentage: f64,
    pub(crate) is_completed: bool,
    pub(crate) question_ids: Json<Vec<i64>>,
}

impl ExamAttempt {
    pub(crate) fn question_ids(&self) -> &[i64] {
        &self.question_ids.0
    }

    pub(crate) fn contains_question(&self, question_id: i64) -> bool {
        self.question_ids.0.contains(&question_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) id: i64,
    pub(crate) attempt_id: i64,
    pub(crate) question_id: i64,
    pub(crate) selected_answer: OptionLabel,
    pub(crate) is_correct: bool,
    pub(crate) marks_obtained: f64,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AttemptListRow {
    pub(crate) id: i64,
    pub(crate) code: String,
    pub(crate) username: String,
    pub(crate) exam_id: i64,
    pub(crate) exam_name: String,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) end_time: Option<PrimitiveDateTime>,
    pub(crate) score: f64,
    pub(crate) total_marks: f64,
    pub(crate) percentage: f64,
    pub(crate) is_completed: bool,
}
