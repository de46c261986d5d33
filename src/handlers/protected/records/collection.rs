use axum::{
    extract::{rejection::JsonRejection, Path},
    Json,
};
use serde_json::Value;

use crate::database::{Record, Repository, SharedPool};
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::json_object;

/// GET /:entity - All rows of an entity, ordered by id
pub async fn list(Path(entity): Path<String>) -> ApiResult<Vec<Record>> {
    let repo = Repository::for_name(&entity, &SharedPool)?;
    let records = repo.select_all().await?;

    Ok(ApiResponse::success(records))
}

/// POST /:entity - Insert one row
///
/// Body is an object of allow-listed fields. Required fields must be present
/// and non-blank; omitted columns take their database defaults.
pub async fn create(
    Path(entity): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let repo = Repository::for_name(&entity, &SharedPool)?;
    let fields = json_object(body)?;

    let record = repo.create(&fields).await?;
    let id = record.get("id").cloned().unwrap_or(Value::Null);
    tracing::info!("Created {} record {}", entity, id);

    Ok(ApiResponse::created(record))
}
