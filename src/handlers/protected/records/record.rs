use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use serde_json::Value;

use crate::database::{EntityId, Record, Repository, SharedPool};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::json_object;

/// GET /:entity/:id - One row by id
pub async fn get(Path((entity, id)): Path<(String, String)>) -> ApiResult<Record> {
    let repo = Repository::for_name(&entity, &SharedPool)?;
    let id: EntityId = id.parse()?;

    Ok(ApiResponse::success(repo.select_404(id).await?))
}

/// PATCH /:entity/:id - Partially update a record
///
/// Only the fields present in the body are written. Every key must be an
/// allow-listed column of the entity; the request is rejected as a whole,
/// before any SQL runs, if one is not.
///
/// ```json
/// { "vendor_name": "Acme Learning", "payment_status": "Paid" }
/// ```
pub async fn patch(
    Path((entity, id)): Path<(String, String)>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Record> {
    let repo = Repository::for_name(&entity, &SharedPool)?;
    let id: EntityId = id.parse()?;
    let fields = json_object(body)?;

    let record = repo.patch(id, &fields).await?;
    tracing::info!(
        actor = actor(&user),
        "Patched {} record {} ({} fields)",
        entity,
        id,
        fields.len()
    );

    Ok(ApiResponse::success(record))
}

/// DELETE /:entity/:id - Remove a record, returning it as it was
pub async fn delete(
    Path((entity, id)): Path<(String, String)>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Record> {
    let repo = Repository::for_name(&entity, &SharedPool)?;
    let id: EntityId = id.parse()?;

    let record = repo.delete(id).await?;
    tracing::info!(actor = actor(&user), "Deleted {} record {}", entity, id);

    Ok(ApiResponse::success(record))
}

// Present only when the JWT guard is on
fn actor(user: &Option<Extension<AuthUser>>) -> &str {
    user.as_ref().map(|Extension(u)| u.email.as_str()).unwrap_or("anonymous")
}
