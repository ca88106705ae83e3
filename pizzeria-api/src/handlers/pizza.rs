use axum::{Router, extract::State, response::Json, routing::get};
use pizzeria_restaurant_service::store;
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;
use crate::serializer::serialize_pizza;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "All pizzas", body = [Pizza]),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Vec<Pizza>>, ApiError> {
    let pizzas = state.interact(store::list_pizzas).await?;

    Ok(Json(pizzas.iter().map(serialize_pizza).collect()))
}
