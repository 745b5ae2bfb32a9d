use crate::error::RequestError;
use crate::resources::v1::backups::V1BackupResult;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;

/// `GET /`: back up every configured target and report per-target results.
pub async fn backup_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<V1BackupResult>>, RequestError> {
    let results = state.run_backup().await?;
    Ok(Json(results))
}
