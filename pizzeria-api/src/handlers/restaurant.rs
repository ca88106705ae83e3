use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use pizzeria_restaurant_service::store;
use tracing::instrument;

use crate::error::ApiError;
use crate::models::*;
use crate::serializer::{serialize_restaurant, serialize_restaurant_summary};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

/// Ids that are not integers cannot name a restaurant.
fn parse_restaurant_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::RestaurantNotFound)
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants, without their pizzas", body = [Restaurant]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let restaurants = state.interact(store::list_restaurants).await?;

    Ok(Json(
        restaurants.iter().map(serialize_restaurant_summary).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant with its pizzas", body = Restaurant),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let restaurant_id = parse_restaurant_id(&id)?;

    let (restaurant, priced_pizzas) = state
        .interact(move |conn| store::find_restaurant_with_pizzas(conn, restaurant_id))
        .await?
        .ok_or(ApiError::RestaurantNotFound)?;

    Ok(Json(serialize_restaurant(&restaurant, &priced_pizzas)))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its restaurant pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let restaurant_id = parse_restaurant_id(&id)?;

    state
        .interact(move |conn| store::delete_restaurant(conn, restaurant_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_support::{delete, get, post_json, seeded_app};

    #[tokio::test]
    async fn test_list_restaurants_omits_restaurant_pizzas() {
        let app = seeded_app();

        let (status, body) = get(&app, "/restaurants").await;

        assert_eq!(status, StatusCode::OK);
        let restaurants = body.as_array().unwrap();
        assert_eq!(restaurants.len(), 3);
        assert!(
            restaurants
                .iter()
                .all(|r| r.get("restaurant_pizzas").is_none())
        );
        assert_eq!(
            restaurants[0],
            json!({ "id": 1, "name": "Karen's Pizza Shack", "address": "address1" })
        );
    }

    #[tokio::test]
    async fn test_get_restaurant() {
        let app = seeded_app();

        let (status, body) = get(&app, "/restaurants/2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Sanjay's Pizza");
        assert_eq!(body["address"], "address2");
        let restaurant_pizzas = body["restaurant_pizzas"].as_array().unwrap();
        assert_eq!(restaurant_pizzas.len(), 1);
        assert_eq!(restaurant_pizzas[0]["price"], 4);
        assert_eq!(restaurant_pizzas[0]["pizza"]["name"], "Geri");
        assert!(restaurant_pizzas[0].get("restaurant").is_none());
    }

    #[tokio::test]
    async fn test_get_missing_restaurant() {
        let app = seeded_app();

        for uri in ["/restaurants/999", "/restaurants/abc"] {
            let (status, body) = get(&app, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({ "error": "Restaurant not found" }));
        }
    }

    #[tokio::test]
    async fn test_delete_restaurant_cascades() {
        let app = seeded_app();
        let (status, _) = post_json(
            &app,
            "/restaurant_pizzas",
            r#"{"pizza_id": 3, "restaurant_id": 1, "price": 20}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = delete(&app, "/restaurants/1").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, body) = get(&app, "/restaurants/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Restaurant not found" }));

        let (_, body) = get(&app, "/restaurants").await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_restaurant() {
        let app = seeded_app();

        let (status, body) = delete(&app, "/restaurants/999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Restaurant not found" }));
    }
}
