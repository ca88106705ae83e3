use pizzeria_restaurant_service::models;
use pizzeria_restaurant_service::store::RestaurantPizzaDetails;

use crate::models::{Pizza, Restaurant, RestaurantPizza, RestaurantRef};

pub fn serialize_pizza(pizza: &models::Pizza) -> Pizza {
    Pizza {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

/// `include_restaurant` must be false when the result is nested inside
/// `restaurant`'s own projection, otherwise the two would reference each other.
pub fn serialize_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
    include_restaurant: bool,
) -> RestaurantPizza {
    RestaurantPizza {
        id: restaurant_pizza.id,
        price: restaurant_pizza.price,
        pizza_id: restaurant_pizza.pizza_id,
        restaurant_id: restaurant_pizza.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: include_restaurant.then(|| RestaurantRef {
            id: restaurant.id,
            name: restaurant.name.clone(),
        }),
    }
}

pub fn serialize_restaurant_pizza_details(details: &RestaurantPizzaDetails) -> RestaurantPizza {
    serialize_restaurant_pizza(
        &details.restaurant_pizza,
        &details.pizza,
        &details.restaurant,
        true,
    )
}

pub fn serialize_restaurant(
    restaurant: &models::Restaurant,
    priced_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> Restaurant {
    Restaurant {
        restaurant_pizzas: Some(
            priced_pizzas
                .iter()
                .map(|(rp, pizza)| serialize_restaurant_pizza(rp, pizza, restaurant, false))
                .collect(),
        ),
        ..serialize_restaurant_summary(restaurant)
    }
}

/// Restaurant listings carry no restaurant pizzas.
pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> Restaurant {
    Restaurant {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: None,
    }
}
