use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Category;
use crate::schemas::exam::ExamResponse;
use crate::store::CategoryFields;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CategoryPayload {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

impl CategoryPayload {
    pub(crate) fn into_fields(self) -> CategoryFields {
        CategoryFields {
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) created_at: String,
}

impl CategoryResponse {
    pub(crate) fn from_db(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: format_primitive(category.created_at),
        }
    }
}

/// Category as seen by a taker: active exams and which of them are already done.
#[derive(Debug, Serialize)]
pub(crate) struct CatalogCategoryResponse {
    pub(crate) category: CategoryResponse,
    pub(crate) exams: Vec<ExamResponse>,
    pub(crate) completed_exam_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminCategoryDetailResponse {
    pub(crate) category: CategoryResponse,
    pub(crate) exams: Vec<ExamResponse>,
}
