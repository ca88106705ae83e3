use diesel::prelude::*;
use tracing::debug;

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};
use crate::StoreError;

/// A restaurant pizza together with both rows it references.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantPizzaDetails {
    pub restaurant_pizza: RestaurantPizza,
    pub pizza: Pizza,
    pub restaurant: Restaurant,
}

pub fn list_restaurants(conn: &mut SqliteConnection) -> Result<Vec<Restaurant>, StoreError> {
    let results = restaurants::table
        .select(Restaurant::as_select())
        .order(restaurants::id)
        .load(conn)?;
    Ok(results)
}

pub fn find_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> Result<Option<Restaurant>, StoreError> {
    let result = restaurants::table
        .find(restaurant_id)
        .select(Restaurant::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

pub fn find_restaurant_with_pizzas(
    conn: &mut SqliteConnection,
    restaurant_id: i32,
) -> Result<Option<(Restaurant, Vec<(RestaurantPizza, Pizza)>)>, StoreError> {
    let Some(restaurant) = find_restaurant(conn, restaurant_id)? else {
        return Ok(None);
    };

    let priced_pizzas = restaurant_pizzas::table
        .inner_join(pizzas::table)
        .filter(restaurant_pizzas::restaurant_id.eq(restaurant.id))
        .select((RestaurantPizza::as_select(), Pizza::as_select()))
        .order(restaurant_pizzas::id)
        .load::<(RestaurantPizza, Pizza)>(conn)?;

    Ok(Some((restaurant, priced_pizzas)))
}

/// Deletes a restaurant. Its restaurant pizzas go with it through the
/// `ON DELETE CASCADE` foreign key.
pub fn delete_restaurant(conn: &mut SqliteConnection, restaurant_id: i32) -> Result<(), StoreError> {
    let deleted = diesel::delete(restaurants::table.find(restaurant_id)).execute(conn)?;
    if deleted == 0 {
        return Err(StoreError::NotFound {
            entity: "restaurant",
            id: restaurant_id,
        });
    }
    debug!(restaurant_id, "deleted restaurant");
    Ok(())
}

pub fn list_pizzas(conn: &mut SqliteConnection) -> Result<Vec<Pizza>, StoreError> {
    let results = pizzas::table
        .select(Pizza::as_select())
        .order(pizzas::id)
        .load(conn)?;
    Ok(results)
}

/// Runs in an immediate transaction so the reference lookups and the insert
/// hold the write lock together.
pub fn create_restaurant_pizza(
    conn: &mut SqliteConnection,
    new_restaurant_pizza: &NewRestaurantPizza,
) -> Result<RestaurantPizzaDetails, StoreError> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        insert_restaurant_pizza(conn, new_restaurant_pizza)
    })
}

/// Resolves both references and inserts. Callers own the transaction.
pub(crate) fn insert_restaurant_pizza(
    conn: &mut SqliteConnection,
    new_restaurant_pizza: &NewRestaurantPizza,
) -> Result<RestaurantPizzaDetails, StoreError> {
    let restaurant = find_restaurant(conn, new_restaurant_pizza.restaurant_id())?.ok_or(
        StoreError::MissingReference {
            entity: "restaurant",
            id: new_restaurant_pizza.restaurant_id(),
        },
    )?;
    let pizza = pizzas::table
        .find(new_restaurant_pizza.pizza_id())
        .select(Pizza::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::MissingReference {
            entity: "pizza",
            id: new_restaurant_pizza.pizza_id(),
        })?;

    let restaurant_pizza = diesel::insert_into(restaurant_pizzas::table)
        .values(new_restaurant_pizza)
        .returning(RestaurantPizza::as_returning())
        .get_result(conn)?;
    debug!(
        restaurant_pizza_id = restaurant_pizza.id,
        restaurant_id = restaurant.id,
        pizza_id = pizza.id,
        "created restaurant pizza"
    );

    Ok(RestaurantPizzaDetails {
        restaurant_pizza,
        pizza,
        restaurant,
    })
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    restaurant: &NewRestaurant,
) -> Result<Restaurant, StoreError> {
    let result = diesel::insert_into(restaurants::table)
        .values(restaurant)
        .returning(Restaurant::as_returning())
        .get_result(conn)?;
    Ok(result)
}

pub fn insert_pizza(conn: &mut SqliteConnection, pizza: &NewPizza) -> Result<Pizza, StoreError> {
    let result = diesel::insert_into(pizzas::table)
        .values(pizza)
        .returning(Pizza::as_returning())
        .get_result(conn)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::establish_test_connection;

    fn setup_restaurant_and_pizza(conn: &mut SqliteConnection) -> (Restaurant, Pizza) {
        let restaurant = insert_restaurant(
            conn,
            &NewRestaurant {
                name: "Test Restaurant",
                address: "Test Address",
            },
        )
        .unwrap();
        let pizza = insert_pizza(
            conn,
            &NewPizza {
                name: "Test Pizza",
                ingredients: "Dough, Cheese",
            },
        )
        .unwrap();
        (restaurant, pizza)
    }

    fn count_restaurant_pizzas(conn: &mut SqliteConnection) -> i64 {
        restaurant_pizzas::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn test_create_restaurant_pizza() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);

        let new = NewRestaurantPizza::new(12, restaurant.id, pizza.id).unwrap();
        let details = create_restaurant_pizza(conn, &new).unwrap();

        assert_eq!(details.restaurant_pizza.price, 12);
        assert_eq!(details.restaurant_pizza.restaurant_id, restaurant.id);
        assert_eq!(details.restaurant_pizza.pizza_id, pizza.id);
        assert_eq!(details.restaurant, restaurant);
        assert_eq!(details.pizza, pizza);
        assert_eq!(count_restaurant_pizzas(conn), 1);
    }

    #[test]
    fn test_create_restaurant_pizza_missing_references() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);

        let missing_pizza = NewRestaurantPizza::new(5, restaurant.id, pizza.id + 100).unwrap();
        assert!(matches!(
            create_restaurant_pizza(conn, &missing_pizza),
            Err(StoreError::MissingReference { entity: "pizza", .. })
        ));

        let missing_restaurant =
            NewRestaurantPizza::new(5, restaurant.id + 100, pizza.id).unwrap();
        assert!(matches!(
            create_restaurant_pizza(conn, &missing_restaurant),
            Err(StoreError::MissingReference {
                entity: "restaurant",
                ..
            })
        ));

        assert_eq!(count_restaurant_pizzas(conn), 0);
    }

    #[test]
    fn test_find_restaurant_with_pizzas() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);
        for price in [3, 7] {
            let new = NewRestaurantPizza::new(price, restaurant.id, pizza.id).unwrap();
            create_restaurant_pizza(conn, &new).unwrap();
        }

        let (found, priced_pizzas) = find_restaurant_with_pizzas(conn, restaurant.id)
            .unwrap()
            .unwrap();

        assert_eq!(found, restaurant);
        assert_eq!(
            priced_pizzas.iter().map(|(rp, _)| rp.price).collect::<Vec<_>>(),
            vec![3, 7]
        );
        assert!(priced_pizzas.iter().all(|(_, p)| *p == pizza));
        assert!(find_restaurant_with_pizzas(conn, restaurant.id + 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_restaurant_cascades() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);
        let new = NewRestaurantPizza::new(10, restaurant.id, pizza.id).unwrap();
        create_restaurant_pizza(conn, &new).unwrap();

        delete_restaurant(conn, restaurant.id).unwrap();

        assert!(find_restaurant(conn, restaurant.id).unwrap().is_none());
        assert_eq!(count_restaurant_pizzas(conn), 0);
        assert_eq!(list_pizzas(conn).unwrap(), vec![pizza]);
    }

    #[test]
    fn test_delete_missing_restaurant() {
        let conn = &mut establish_test_connection();

        let result = delete_restaurant(conn, 42);

        assert!(matches!(
            result,
            Err(StoreError::NotFound {
                entity: "restaurant",
                id: 42
            })
        ));
    }

    #[test]
    fn test_delete_pizza_cascades() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);
        let new = NewRestaurantPizza::new(10, restaurant.id, pizza.id).unwrap();
        create_restaurant_pizza(conn, &new).unwrap();

        diesel::delete(pizzas::table.find(pizza.id))
            .execute(conn)
            .unwrap();

        assert_eq!(count_restaurant_pizzas(conn), 0);
        assert_eq!(list_restaurants(conn).unwrap(), vec![restaurant]);
    }

    #[test]
    fn test_price_check_constraint() {
        let conn = &mut establish_test_connection();
        let (restaurant, pizza) = setup_restaurant_and_pizza(conn);

        let result = diesel::insert_into(restaurant_pizzas::table)
            .values((
                restaurant_pizzas::price.eq(31),
                restaurant_pizzas::restaurant_id.eq(restaurant.id),
                restaurant_pizzas::pizza_id.eq(pizza.id),
            ))
            .execute(conn);

        assert!(result.is_err());
    }

    #[test]
    fn test_list_ordered_by_id() {
        let conn = &mut establish_test_connection();
        for name in ["First", "Second"] {
            insert_restaurant(
                conn,
                &NewRestaurant {
                    name,
                    address: "Somewhere",
                },
            )
            .unwrap();
        }

        let names = list_restaurants(conn)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["First", "Second"]);
    }
}
