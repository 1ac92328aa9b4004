use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::task::{NewTask, Task};
use crate::services::task::{TaskLog, TaskService};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskLogResponse {
    #[schema(example = 1)]
    pub task_group_id: u64,
    pub tasks: Vec<Task>,
}

impl From<TaskLog> for TaskLogResponse {
    fn from(log: TaskLog) -> Self {
        Self {
            task_group_id: log.attendance_id,
            tasks: log.tasks,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDelete {
    #[schema(example = json!([3, 4]))]
    pub selected_tasks: Vec<u64>,
}

/// The caller's work log for one attendance day
#[utoipa::path(
    get,
    path = "/api/attendance/{id}/tasks",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Tasks of the day", body = TaskLogResponse),
        (status = 404, description = "Not found or not owned by the caller", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn list_tasks(
    auth: AuthUser,
    service: web::Data<TaskService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let log = service.list(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskLogResponse::from(log)))
}

/// Log a task under an attendance day
#[utoipa::path(
    post,
    path = "/api/attendance/{id}/tasks",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    request_body = NewTask,
    responses(
        (status = 201, description = "Task added", body = TaskLogResponse),
        (status = 404, description = "Not found or not owned by the caller", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn add_task(
    auth: AuthUser,
    service: web::Data<TaskService>,
    path: web::Path<u64>,
    payload: web::Json<NewTask>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();
    tracing::debug!(attendance_id, username = %auth.username, "Adding task");
    let log = service.add(auth.user_id, attendance_id, &payload).await?;
    Ok(HttpResponse::Created().json(TaskLogResponse::from(log)))
}

/// Update some fields of a task (auto-save)
#[utoipa::path(
    patch,
    path = "/api/attendance/{id}/tasks/{task_id}",
    params(
        ("id" = u64, Path, description = "Attendance record id"),
        ("task_id" = u64, Path, description = "Task id")
    ),
    request_body(
        content = Object,
        description = "Any of name, timing, issue, status",
        content_type = "application/json",
        example = json!({"status": "Done"})
    ),
    responses(
        (status = 200, description = "Task updated", body = TaskLogResponse),
        (status = 400, description = "Unknown or malformed field", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn update_task(
    auth: AuthUser,
    service: web::Data<TaskService>,
    path: web::Path<(u64, u64)>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let (attendance_id, task_id) = path.into_inner();
    let log = service
        .update(auth.user_id, attendance_id, task_id, &payload)
        .await?;
    Ok(HttpResponse::Ok().json(TaskLogResponse::from(log)))
}

/// Delete one task
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}/tasks/{task_id}",
    params(
        ("id" = u64, Path, description = "Attendance record id"),
        ("task_id" = u64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Remaining tasks", body = TaskLogResponse),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn delete_task(
    auth: AuthUser,
    service: web::Data<TaskService>,
    path: web::Path<(u64, u64)>,
) -> Result<HttpResponse, AppError> {
    let (attendance_id, task_id) = path.into_inner();
    let log = service.delete(auth.user_id, attendance_id, task_id).await?;
    Ok(HttpResponse::Ok().json(TaskLogResponse::from(log)))
}

/// Delete several tasks at once
#[utoipa::path(
    put,
    path = "/api/attendance/{id}/tasks/delete",
    params(
        ("id" = u64, Path, description = "Attendance record id")
    ),
    request_body = BulkDelete,
    responses(
        (status = 200, description = "Remaining tasks", body = TaskLogResponse),
        (status = 400, description = "Malformed id list", body = MessageResponse),
        (status = 404, description = "Not found or not owned by the caller", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
pub async fn delete_tasks(
    auth: AuthUser,
    service: web::Data<TaskService>,
    path: web::Path<u64>,
    payload: web::Json<BulkDelete>,
) -> Result<HttpResponse, AppError> {
    let attendance_id = path.into_inner();
    tracing::debug!(
        attendance_id,
        username = %auth.username,
        selected = payload.selected_tasks.len(),
        "Bulk task delete"
    );
    let log = service
        .delete_many(auth.user_id, attendance_id, &payload.selected_tasks)
        .await?;
    Ok(HttpResponse::Ok().json(TaskLogResponse::from(log)))
}
