use async_trait::async_trait;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use super::{
    AnswerUpsert, AttemptCompletion, AttemptStore, CategoryFields, ContentStore, DashboardCounts,
    ExamFields, IdentityStore, NewAttempt, NewUser, PortalStore, QuestionFields, StoreResult,
};
use crate::db::models::{Answer, AttemptListRow, Category, Exam, ExamAttempt, Question, User};
use crate::db::types::UserRole;
use crate::repositories;

#[derive(Clone)]
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        repositories::users::find_by_id(&self.pool, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        repositories::users::find_by_username(&self.pool, username).await
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<Option<User>> {
        repositories::users::create(
            &self.pool,
            repositories::users::CreateUser {
                id: &user.id,
                username: &user.username,
                hashed_password: &user.hashed_password,
                role: user.role,
                is_active: user.is_active,
                created_at: user.created_at,
            },
        )
        .await
    }

    async fn update_user_credentials(
        &self,
        id: &str,
        hashed_password: &str,
        role: UserRole,
        is_active: bool,
        updated_at: PrimitiveDateTime,
    ) -> StoreResult<()> {
        repositories::users::update_credentials(
            &self.pool,
            id,
            repositories::users::UpdateCredentials { hashed_password, role, is_active, updated_at },
        )
        .await
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        repositories::categories::list(&self.pool).await
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        repositories::categories::find_by_id(&self.pool, id).await
    }

    async fn create_category(
        &self,
        fields: CategoryFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Category> {
        repositories::categories::create(&self.pool, &fields.name, &fields.description, created_at)
            .await
    }

    async fn update_category(
        &self,
        id: i64,
        fields: CategoryFields,
    ) -> StoreResult<Option<Category>> {
        repositories::categories::update(&self.pool, id, &fields.name, &fields.description).await
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        repositories::categories::delete_by_id(&self.pool, id).await
    }

    async fn list_exams(&self, category_id: i64) -> StoreResult<Vec<Exam>> {
        repositories::exams::list_by_category(&self.pool, category_id).await
    }

    async fn list_active_exams(
        &self,
        category_id: i64,
        now: PrimitiveDateTime,
    ) -> StoreResult<Vec<Exam>> {
        repositories::exams::list_active_by_category(&self.pool, category_id, now).await
    }

    async fn find_exam(&self, id: i64) -> StoreResult<Option<Exam>> {
        repositories::exams::find_by_id(&self.pool, id).await
    }

    async fn create_exam(
        &self,
        category_id: i64,
        fields: ExamFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Exam> {
        repositories::exams::create(&self.pool, category_id, &fields, created_at).await
    }

    async fn update_exam(&self, id: i64, fields: ExamFields) -> StoreResult<Option<Exam>> {
        repositories::exams::update(&self.pool, id, &fields).await
    }

    async fn delete_exam(&self, id: i64) -> StoreResult<bool> {
        repositories::exams::delete_by_id(&self.pool, id).await
    }

    async fn list_questions(&self, exam_id: i64) -> StoreResult<Vec<Question>> {
        repositories::questions::list_by_exam(&self.pool, exam_id).await
    }

    async fn find_questions_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Question>> {
        repositories::questions::list_by_ids(&self.pool, ids).await
    }

    async fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        repositories::questions::find_by_id(&self.pool, id).await
    }

    async fn create_question(
        &self,
        exam_id: i64,
        fields: QuestionFields,
        created_at: PrimitiveDateTime,
    ) -> StoreResult<Question> {
        repositories::questions::create(&self.pool, exam_id, fields, created_at).await
    }

    async fn update_question(
        &self,
        id: i64,
        fields: QuestionFields,
    ) -> StoreResult<Option<Question>> {
        repositories::questions::update(&self.pool, id, fields).await
    }

    async fn delete_question(&self, id: i64) -> StoreResult<bool> {
        repositories::questions::delete_by_id(&self.pool, id).await
    }

    async fn dashboard_counts(&self) -> StoreResult<DashboardCounts> {
        let categories = repositories::categories::count(&self.pool).await?;
        let exams = repositories::exams::count(&self.pool).await?;
        let attempts = repositories::attempts::count(&self.pool, false).await?;
        Ok(DashboardCounts { categories, exams, attempts })
    }
}

#[async_trait]
impl AttemptStore for PgStore {
    async fn find_attempt_by_code(&self, code: &str) -> StoreResult<Option<ExamAttempt>> {
        repositories::attempts::find_by_code(&self.pool, code).await
    }

    async fn find_attempt_for_user(
        &self,
        user_id: &str,
        exam_id: i64,
        completed: bool,
    ) -> StoreResult<Option<ExamAttempt>> {
        repositories::attempts::find_for_user(&self.pool, user_id, exam_id, completed).await
    }

    async fn attempt_code_exists(&self, code: &str) -> StoreResult<bool> {
        repositories::attempts::code_exists(&self.pool, code).await
    }

    async fn insert_attempt(&self, attempt: NewAttempt) -> StoreResult<Option<ExamAttempt>> {
        repositories::attempts::create(&self.pool, attempt).await
    }

    async fn upsert_answer(&self, answer: AnswerUpsert) -> StoreResult<Option<Answer>> {
        repositories::answers::upsert(&self.pool, answer).await
    }

    async fn list_answers(&self, attempt_id: i64) -> StoreResult<Vec<Answer>> {
        repositories::answers::list_by_attempt(&self.pool, attempt_id).await
    }

    async fn complete_attempt(&self, completion: AttemptCompletion) -> StoreResult<bool> {
        repositories::attempts::complete(&self.pool, completion).await
    }

    async fn completed_exam_ids(&self, user_id: &str, exam_ids: &[i64]) -> StoreResult<Vec<i64>> {
        repositories::attempts::completed_exam_ids(&self.pool, user_id, exam_ids).await
    }

    async fn list_attempts(
        &self,
        exclude_superusers: bool,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<AttemptListRow>> {
        repositories::attempts::list_with_names(&self.pool, exclude_superusers, skip, limit).await
    }

    async fn count_attempts(&self, exclude_superusers: bool) -> StoreResult<i64> {
        repositories::attempts::count(&self.pool, exclude_superusers).await
    }
}

#[async_trait]
impl PortalStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        repositories::health::ping(&self.pool).await
    }
}
