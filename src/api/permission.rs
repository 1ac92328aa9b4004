use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::permission::Permission;
use crate::services::attendance::validate_period;
use crate::utils::db_utils::{Updatable, build_update_sql, execute_update, parse_patch};

const SELECT_PERMISSION: &str = r#"
    SELECT id, user_id, date, permission_in, permission_out, reason, created_at
    FROM permissions
"#;

const UPDATABLE: &[Updatable] = &[
    Updatable { field: "date", column: "date" },
    Updatable { field: "permissionIn", column: "permission_in" },
    Updatable { field: "permissionOut", column: "permission_out" },
    Updatable { field: "reason", column: "reason" },
];

#[derive(Deserialize, ToSchema)]
pub struct CreatePermission {
    #[schema(example = "2025-02-03", format = "date", value_type = String)]
    pub date: NaiveDate,
}

async fn fetch_owned(pool: &MySqlPool, id: u64, user_id: u64) -> Result<Option<Permission>, AppError> {
    Ok(sqlx::query_as::<_, Permission>(&format!(
        "{SELECT_PERMISSION} WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// The caller's permissions, newest first
#[utoipa::path(
    get,
    path = "/api/permissions",
    responses(
        (status = 200, description = "Permission list", body = [Permission]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn list_permissions(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, AppError> {
    let permissions = sqlx::query_as::<_, Permission>(&format!(
        "{SELECT_PERMISSION} WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(auth.user_id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(permissions))
}

/// A user's permissions within one month
#[utoipa::path(
    get,
    path = "/api/permissions/monthly/{user_id}/{month}/{year}",
    params(
        ("user_id" = u64, Path, description = "Owner of the permissions"),
        ("month" = u32, Path, description = "Month, 1-12"),
        ("year" = i32, Path, description = "Four digit year")
    ),
    responses(
        (status = 200, description = "Permissions of the month", body = [Permission]),
        (status = 400, description = "Invalid month or year", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn monthly_permissions(
    pool: web::Data<MySqlPool>,
    path: web::Path<(u64, u32, i32)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, month, year) = path.into_inner();
    let (from, until) = validate_period(month, year)?;

    let permissions = sqlx::query_as::<_, Permission>(&format!(
        "{SELECT_PERMISSION} WHERE user_id = ? AND date >= ? AND date < ? ORDER BY date, id"
    ))
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(permissions))
}

/// Open an empty permission for a date
#[utoipa::path(
    post,
    path = "/api/permissions",
    request_body = CreatePermission,
    responses(
        (status = 200, description = "Permission created", body = Permission),
        (status = 400, description = "Bad request", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn create_permission(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePermission>,
) -> Result<HttpResponse, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO permissions (user_id, date, permission_in, permission_out, reason)
        VALUES (?, ?, '', '', '')
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to create permission");
        AppError::from(e)
    })?;

    let id = result.last_insert_id();
    tracing::info!(id, user_id = auth.user_id, username = %auth.username, "Permission created");
    let permission = fetch_owned(pool.get_ref(), id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Permission not found".into()))?;

    Ok(HttpResponse::Ok().json(permission))
}

/// Update permission in/out times, reason or date
#[utoipa::path(
    put,
    path = "/api/permissions/{id}",
    params(
        ("id" = u64, Path, description = "Permission id")
    ),
    request_body(
        content = Object,
        description = "Any of date, permissionIn, permissionOut, reason",
        content_type = "application/json",
        example = json!({"permissionIn": "10:00 AM", "reason": "Bank visit"})
    ),
    responses(
        (status = 200, description = "Updated permission", body = Permission),
        (status = 400, description = "Unknown or malformed field", body = MessageResponse),
        (status = 404, description = "Permission not found", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn update_permission(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let assignments = parse_patch(&payload, UPDATABLE)?;
    let update = build_update_sql("permissions", assignments, &[("id", id), ("user_id", auth.user_id)]);

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        tracing::error!(error = %e, id, "Failed to update permission");
        AppError::from(e)
    })?;

    if affected == 0 {
        return Err(AppError::NotFound("Permission not found".into()));
    }

    let permission = fetch_owned(pool.get_ref(), id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Permission not found".into()))?;

    Ok(HttpResponse::Ok().json(permission))
}

/// Delete one of the caller's permissions
#[utoipa::path(
    delete,
    path = "/api/permissions/{id}",
    params(
        ("id" = u64, Path, description = "Permission id")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({"success": true})),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Permissions"
)]
pub async fn delete_permission(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM permissions WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(auth.user_id)
        .execute(pool.get_ref())
        .await?;
    tracing::info!(
        id,
        user_id = auth.user_id,
        username = %auth.username,
        removed = result.rows_affected(),
        "Permission delete"
    );

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
