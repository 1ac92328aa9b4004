use crate::api::MessageResponse;
use crate::api::attendance::{AttendanceRequest, AttendanceResponse, BreaksView, RecordResponse};
use crate::api::permission::CreatePermission;
use crate::api::task::{BulkDelete, TaskLogResponse};
use crate::model::permission::Permission;
use crate::model::report::{DayStatus, MonthlyReportEntry};
use crate::model::task::{NewTask, Task};
use crate::timekeeping::state_machine::AttendanceAction;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Desk API",
        version = "1.0.0",
        description = r#"
## Daily attendance and break tracking

### 🔹 Key Features
- **Attendance**
  - Time in, three break slots (morning, lunch, evening) and time out, once per day
  - Live working time while the shift is open, stored final total once it closes
- **Tasks**
  - A work log per attendance day, auto-saved field by field
- **Reports**
  - Day-by-day presence for a month with weekend and absence classification
- **Permissions**
  - Short out-of-office permissions with in/out times and a reason

### 🔐 Security
Every endpoint expects a **JWT Bearer** token.

### 🕘 Times
Clock times are 12-hour strings such as `09:05 AM`, always relative to the record's date.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::record_action,
        crate::api::attendance::today,
        crate::api::attendance::month_records,
        crate::api::attendance::delete_record,

        crate::api::task::list_tasks,
        crate::api::task::add_task,
        crate::api::task::update_task,
        crate::api::task::delete_task,
        crate::api::task::delete_tasks,

        crate::api::report::monthly_report,

        crate::api::permission::list_permissions,
        crate::api::permission::monthly_permissions,
        crate::api::permission::create_permission,
        crate::api::permission::update_permission,
        crate::api::permission::delete_permission
    ),
    components(
        schemas(
            AttendanceAction,
            AttendanceRequest,
            AttendanceResponse,
            BreaksView,
            RecordResponse,
            DayStatus,
            MonthlyReportEntry,
            Task,
            NewTask,
            TaskLogResponse,
            BulkDelete,
            Permission,
            CreatePermission,
            MessageResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Attendance", description = "Time in, breaks and time out"),
        (name = "Tasks", description = "Work log of an attendance day"),
        (name = "Reports", description = "Monthly presence reports"),
        (name = "Permissions", description = "Out-of-office permissions"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
