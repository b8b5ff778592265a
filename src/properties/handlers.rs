use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, state::AppState, view::PageView};

use super::dto::{Pagination, PropertyForm};
use super::repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mis-propiedades", get(list_properties))
        .route("/propiedades", post(create_property))
        .route(
            "/propiedades/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "property request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Hubo un error, intenta de nuevo mas tarde".into(),
    )
}

fn validation_page(errors: Vec<String>) -> Response {
    warn!(count = errors.len(), "property form rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(PageView::new("Crear Propiedad").with_errors(errors)),
    )
        .into_response()
}

#[instrument(skip(state))]
async fn list_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<repo::Property>>, (StatusCode, String)> {
    let rows = repo::list_by_user(&state.db, user.id, p.limit, p.offset)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

#[instrument(skip(state, form))]
async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<PropertyForm>,
) -> Response {
    let errors = form.validate();
    if !errors.is_empty() {
        return validation_page(errors);
    }

    match repo::create(&state.db, user.id, form.into_fields()).await {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(e) => internal(e).into_response(),
    }
}

#[instrument(skip(state))]
async fn get_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<repo::Property>, (StatusCode, String)> {
    let property = repo::find_owned(&state.db, user.id, id)
        .await
        .map_err(internal)?
        .ok_or((StatusCode::NOT_FOUND, "Propiedad no encontrada".to_string()))?;
    Ok(Json(property))
}

#[instrument(skip(state, form))]
async fn update_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Form(form): Form<PropertyForm>,
) -> Response {
    let errors = form.validate();
    if !errors.is_empty() {
        return validation_page(errors);
    }

    match repo::update(&state.db, user.id, id, form.into_fields()).await {
        Ok(Some(property)) => Json(property).into_response(),
        Ok(None) => {
            (StatusCode::NOT_FOUND, "Propiedad no encontrada").into_response()
        }
        Err(e) => internal(e).into_response(),
    }
}

#[instrument(skip(state))]
async fn delete_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = repo::delete(&state.db, user.id, id)
        .await
        .map_err(internal)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Propiedad no encontrada".to_string()))
    }
}
