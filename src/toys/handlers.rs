use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::{
    dto::{CreateToyRequest, RemovedToyResponse, ToyQuery, UpdateToyRequest},
    repo_types::{Toy, ToyDraft},
    services::{ToyError, ToyFilter},
};
use crate::{auth::extractors::LoggedInUser, state::AppState};

pub fn toy_routes() -> Router<AppState> {
    Router::new()
        .route("/toy", get(list_toys).post(add_toy).put(update_toy))
        .route("/toy/:toyId", get(get_toy).delete(remove_toy))
}

#[instrument(skip(state))]
pub async fn list_toys(
    State(state): State<AppState>,
    Query(q): Query<ToyQuery>,
) -> Json<Vec<Toy>> {
    let filter = ToyFilter::from(q);
    Json(state.toys.query(&filter).await)
}

#[instrument(skip(state, user, payload))]
pub async fn add_toy(
    State(state): State<AppState>,
    user: Option<LoggedInUser>,
    payload: Result<Json<CreateToyRequest>, JsonRejection>,
) -> Result<Json<Toy>, (StatusCode, String)> {
    let Some(LoggedInUser(user)) = user else {
        return Err((StatusCode::UNAUTHORIZED, "Cannot add toy".into()));
    };
    let Json(payload) = payload.map_err(|e| bad_body(e, "Cannot add toy"))?;
    state
        .toys
        .save(ToyDraft::from(payload), &user)
        .await
        .map(Json)
        .map_err(|e| save_failed(e, "Cannot add toy"))
}

#[instrument(skip(state, user, payload))]
pub async fn update_toy(
    State(state): State<AppState>,
    user: Option<LoggedInUser>,
    payload: Result<Json<UpdateToyRequest>, JsonRejection>,
) -> Result<Json<Toy>, (StatusCode, String)> {
    let Some(LoggedInUser(user)) = user else {
        return Err((StatusCode::UNAUTHORIZED, "Cannot update toy".into()));
    };
    let Json(payload) = payload.map_err(|e| bad_body(e, "Cannot update toy"))?;
    state
        .toys
        .save(ToyDraft::from(payload), &user)
        .await
        .map(Json)
        .map_err(|e| save_failed(e, "Cannot update toy"))
}

#[instrument(skip(state))]
pub async fn get_toy(
    State(state): State<AppState>,
    Path(toy_id): Path<String>,
) -> Result<Json<Toy>, (StatusCode, String)> {
    match state.toys.get(&toy_id).await {
        Ok(toy) => Ok(Json(toy)),
        Err(e) => {
            warn!(error = %e, %toy_id, "get_toy failed");
            Err((StatusCode::FORBIDDEN, "Toy not found!".into()))
        }
    }
}

#[instrument(skip(state, user))]
pub async fn remove_toy(
    State(state): State<AppState>,
    user: Option<LoggedInUser>,
    Path(toy_id): Path<String>,
) -> Result<Json<RemovedToyResponse>, (StatusCode, String)> {
    let Some(LoggedInUser(user)) = user else {
        return Err((StatusCode::UNAUTHORIZED, "Cannot delete toy".into()));
    };
    match state.toys.remove(&toy_id, &user).await {
        Ok(()) => Ok(Json(RemovedToyResponse {
            msg: "Toy removed".into(),
            toy_id,
        })),
        Err(ToyError::Storage(e)) => {
            error!(error = %e, %toy_id, "remove_toy storage failure");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Cannot remove toy".into()))
        }
        Err(e) => {
            warn!(error = %e, %toy_id, user_id = %user.id, "remove_toy rejected");
            Err((StatusCode::BAD_REQUEST, format!("Cannot remove toy, {e}")))
        }
    }
}

/// Body rejections are answered with the route's own message, not serde's.
fn bad_body(e: JsonRejection, msg: &str) -> (StatusCode, String) {
    warn!(error = %e.body_text(), "toy body rejected");
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn save_failed(e: ToyError, msg: &str) -> (StatusCode, String) {
    match e {
        ToyError::Storage(e) => {
            error!(error = %e, "save toy storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
        }
        e => {
            warn!(error = %e, "save toy rejected");
            (StatusCode::BAD_REQUEST, msg.to_string())
        }
    }
}
