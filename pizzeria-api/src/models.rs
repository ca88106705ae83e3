use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price of the pizza at the restaurant, between 1 and 30
    pub price: PriceInput,
    /// Pizza being offered
    pub pizza_id: i32,
    /// Restaurant offering the pizza
    pub restaurant_id: i32,
}

/// A price as clients send it: an integer, a decimal, or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PriceInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceInputError {
    NotANumber,
    OutOfRange,
}

impl PriceInput {
    /// Decimals are truncated toward zero, so `15.9` and `"15"` both read as 15.
    pub fn to_integer(&self) -> Result<i64, PriceInputError> {
        match self {
            PriceInput::Integer(price) => Ok(*price),
            PriceInput::Decimal(price) => {
                let truncated = price.trunc();
                // `i64::MAX as f64` rounds up to 2^63, which no i64 can hold.
                if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                    Ok(truncated as i64)
                } else {
                    Err(PriceInputError::OutOfRange)
                }
            }
            PriceInput::Text(text) => text.trim().parse::<i64>().map_err(|e| match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    PriceInputError::OutOfRange
                }
                _ => PriceInputError::NotANumber,
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

/// Back-reference from a restaurant pizza to its restaurant
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
    /// Omitted when nested inside its own restaurant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRef>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Omitted from restaurant listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_pizzas: Option<Vec<RestaurantPizza>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Validation messages
    pub errors: Vec<String>,
}
