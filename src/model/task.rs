use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of the work log kept under an attendance day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[schema(example = 3)]
    pub id: u64,
    /// The attendance day the task is logged under
    #[serde(rename = "taskGroupId")]
    #[schema(example = 1)]
    pub attendance_id: u64,
    #[schema(example = "Invoice export")]
    pub name: String,
    #[schema(example = "10:00 AM - 11:30 AM")]
    pub timing: String,
    #[schema(example = "")]
    pub issue: String,
    #[schema(example = "Done")]
    pub status: String,
}

/// Fields of a new task; anything missing is stored blank.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct NewTask {
    #[schema(example = "Invoice export")]
    pub name: String,
    #[schema(example = "10:00 AM - 11:30 AM")]
    pub timing: String,
    #[schema(example = "")]
    pub issue: String,
    #[schema(example = "In progress")]
    pub status: String,
}
