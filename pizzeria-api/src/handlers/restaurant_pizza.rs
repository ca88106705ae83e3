use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use pizzeria_restaurant_service::{models::NewRestaurantPizza, store};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::models::*;
use crate::serializer::serialize_restaurant_pizza_details;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizza),
        (status = 400, description = "Invalid price or any other validation failure", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizza>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(%rejection, "rejected restaurant pizza payload");
        ApiError::Validation
    })?;

    let price = payload.price.to_integer().map_err(|error| match error {
        PriceInputError::OutOfRange => ApiError::InvalidPrice,
        PriceInputError::NotANumber => ApiError::Validation,
    })?;
    let new_restaurant_pizza =
        NewRestaurantPizza::new(price, payload.restaurant_id, payload.pizza_id)
            .map_err(|_| ApiError::InvalidPrice)?;

    let details = state
        .interact(move |conn| store::create_restaurant_pizza(conn, &new_restaurant_pizza))
        .await
        .map_err(|error| {
            warn!(%error, "failed to create restaurant pizza");
            ApiError::Validation
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serialize_restaurant_pizza_details(&details)),
    ))
}
