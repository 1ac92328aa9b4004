pub mod attendance;
pub mod permission;
pub mod report;
pub mod task;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Please Time In first")]
    pub message: String,
}
