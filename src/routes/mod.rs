pub mod docs;
pub mod health;
pub mod statistics;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use docs::create_docs_routes;
pub use health::create_health_routes;
pub use statistics::create_statistics_routes;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error category, e.g. "Invalid input" or "Not found"
    pub error: String,
    pub message: String,
}
