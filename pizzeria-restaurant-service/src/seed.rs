use diesel::prelude::*;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::store;
use crate::StoreError;

const RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const RESTAURANT_PIZZAS: [(usize, usize, i64); 3] = [(0, 0, 1), (1, 1, 4), (2, 2, 5)];

/// Replaces every row in the database with the sample data set.
pub fn seed(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;

        let restaurants = RESTAURANTS
            .into_iter()
            .map(|(name, address)| store::insert_restaurant(conn, &NewRestaurant { name, address }))
            .collect::<Result<Vec<_>, _>>()?;
        let pizzas = PIZZAS
            .into_iter()
            .map(|(name, ingredients)| store::insert_pizza(conn, &NewPizza { name, ingredients }))
            .collect::<Result<Vec<_>, _>>()?;

        for (restaurant, pizza, price) in RESTAURANT_PIZZAS {
            let new =
                NewRestaurantPizza::new(price, restaurants[restaurant].id, pizzas[pizza].id)?;
            store::insert_restaurant_pizza(conn, &new)?;
        }

        info!(
            restaurants = restaurants.len(),
            pizzas = pizzas.len(),
            restaurant_pizzas = RESTAURANT_PIZZAS.len(),
            "seeded database"
        );
        Ok(())
    })
}
