pub mod paths;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{auth, children, food_entries, health},
    server::FoodLogServer,
};

/// Create health check routes
pub fn health_routes() -> Router<FoodLogServer> {
    Router::new().route(paths::health::HEALTH, get(health::health_check))
}

/// Registration and login; the only API routes without a bearer token
pub fn user_routes() -> Router<FoodLogServer> {
    Router::new()
        .route(paths::users::REGISTER, post(auth::register))
        .route(paths::users::LOGIN, post(auth::login))
}

pub fn child_routes() -> Router<FoodLogServer> {
    Router::new()
        .route(
            paths::children::CHILDREN,
            get(children::list_children).post(children::create_child),
        )
        .route(
            paths::children::CHILD_BY_ID,
            get(children::get_child).delete(children::delete_child),
        )
}

pub fn food_entry_routes() -> Router<FoodLogServer> {
    Router::new()
        .route(
            paths::food_entries::FOOD_ENTRIES,
            post(food_entries::create_food_entry),
        )
        .route(
            paths::food_entries::BY_CHILD,
            get(food_entries::list_food_entries_for_child),
        )
        .route(
            paths::food_entries::ENTRY_BY_ID,
            get(food_entries::get_food_entry)
                .patch(food_entries::update_food_entry)
                .delete(food_entries::delete_food_entry),
        )
}

/// Create all application routes
pub fn create_routes() -> Router<FoodLogServer> {
    let api = Router::new()
        .merge(user_routes())
        .merge(child_routes())
        .merge(food_entry_routes());

    Router::new()
        .merge(health_routes())
        .nest(paths::API_PREFIX, api)
}
