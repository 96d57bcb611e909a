//! Persistence seam for the portal.
//!
//! Handlers and the attempt engine talk to storage only through these traits.
//! `PgStore` backs them with Postgres; tests use an in-memory implementation.

mod postgres;

use async_trait::async_trait;
use time::PrimitiveDateTime;

use crate::db::models::{
    Answer, AttemptListRow, Category, Exam, ExamAttempt, Question, QuestionOptions, User,
};
use crate::db::types::{OptionLabel, UserRole};

pub(crate) use postgres::PgStore;

pub(crate) type StoreResult<T> = Result<T, sqlx::Error>;

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryFields {
    pub(crate) name: String,
    pub(crate) description: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ExamFields {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) duration_minutes: i32,
    pub(crate) number_of_questions: i32,
    pub(crate) start_date: PrimitiveDateTime,
    pub(crate) end_date: PrimitiveDateTime,
    pub(crate) pass_percentage: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct QuestionFields {
    pub(crate) question_text: String,
    pub(crate) options: QuestionOptions,
    pub(crate) correct_answer: OptionLabel,
    pub(crate) marks: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct NewAttempt {
    pub(crate) code: String,
    pub(crate) user_id: String,
    pub(crate) exam_id: i64,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) total_marks: f64,
    pub(crate) question_ids: Vec<i64>,
}

/// A fully derived answer row, ready to be written.
#[derive(Debug, Clone)]
pub(crate) struct AnswerUpsert {
    pub(crate) attempt_id: i64,
    pub(crate) question_id: i64,
    pub(crate) selected_answer: OptionLabel,
    pub(crate) is_correct: bool,
    pub(crate) marks_obtained: f64,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct AttemptCompletion {
    pub(crate) attempt_id: i64,
    pub(crate) score: f64,
    pub(crate) percentage: f64,
    pub(crate) end_time: PrimitiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DashboardCounts {
    pub(crate) categories: i64,
    pub(crate) exams: i64,
    pub(crate) attempts: i64,
}

#[async_trait]
pub(crate) trait IdentityStore: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Inserts the user, returning `None` when the username is already taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<Option<User>>;

    async fn update_user_credentials(
        &self,
        id: &str,
        hashed_password: &str,
        role: UserRole,
        is_active: bool,
        updated_at: PrimitiveDateTime,
    ) -> StoreResult<()>;
}

#[async_trait]
pub(crate) trait ContentStore: Send + Sync {
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;

    async fn create_category(
        &self,
        fields: CategoryFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Category>;

    async fn update_category(&self, id: i64, fields: CategoryFields)
        -> StoreResult<Option<Category>>;

    /// Removes the category together with its exams, questions, attempts and answers.
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;

    async fn list_exams(&self, category_id: i64) -> StoreResult<Vec<Exam>>;

    async fn list_active_exams(
        &self,
        category_id: i64,
        now: PrimitiveDateTime,
    ) -> StoreResult<Vec<Exam>>;

    async fn find_exam(&self, id: i64) -> StoreResult<Option<Exam>>;

    async fn create_exam(
        &self,
        category_id: i64,
        fields: ExamFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Exam>;

    async fn update_exam(&self, id: i64, fields: ExamFields) -> StoreResult<Option<Exam>>;

    async fn delete_exam(&self, id: i64) -> StoreResult<bool>;

    async fn list_questions(&self, exam_id: i64) -> StoreResult<Vec<Question>>;

    /// Questions with the given ids, in the order of `ids`. Unknown ids are skipped.
    async fn find_questions_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Question>>;

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>>;

    async fn create_question(
        &self,
        exam_id: i64,
        fields: QuestionFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Question>;

    async fn update_question(&self, id: i64, fields: QuestionFields)
        -> StoreResult<Option<Question>>;

    async fn delete_question(&self, id: i64) -> StoreResult<bool>;

    async fn dashboard_counts(&self) -> StoreResult<DashboardCounts>;
}

#[async_trait]
pub(crate) trait AttemptStore: Send + Sync {
    async fn find_attempt_by_code(&self, code: &str) -> StoreResult<Option<ExamAttempt>>;

    /// Most recent attempt of `user_id` on `exam_id` with the given completion state.
    async fn find_attempt_for_user(
        &self,
        user_id: &str,
        exam_id: i64,
        completed: bool,
    ) -> StoreResult<Option<ExamAttempt>>;

    async fn attempt_code_exists(&self, code: &str) -> StoreResult<bool>;

    /// Inserts the attempt, returning `None` when the code is already taken.
    async fn insert_attempt(&self, attempt: NewAttempt) -> StoreResult<Option<ExamAttempt>>;

    /// Inserts or overwrites the answer for `(attempt_id, question_id)`. Returns `None`
    /// without writing when the attempt is already completed.
    async fn upsert_answer(&self, answer: AnswerUpsert) -> StoreResult<Option<Answer>>;

    async fn list_answers(&self, attempt_id: i64) -> StoreResult<Vec<Answer>>;

    /// Marks the attempt completed if it is still open. Returns `false` when
    /// another caller already completed it.
    async fn complete_attempt(&self, completion: AttemptCompletion) -> StoreResult<bool>;

    async fn completed_exam_ids(&self, user_id: &str, exam_ids: &[i64]) -> StoreResult<Vec<i64>>;

    async fn list_attempts(
        &self,
        exclude_superusers: bool,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<AttemptListRow>>;

    async fn count_attempts(&self, exclude_superusers: bool) -> StoreResult<i64>;
}

#[async_trait]
pub(crate) trait PortalStore: IdentityStore + ContentStore + AttemptStore {
    async fn ping(&self) -> StoreResult<()>;
}
