pub mod bookings;
pub mod community;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod tasks;
pub mod transactions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /bookings                                 list, create
/// /bookings/by-code/{code}                  find by confirmation code (GET)
/// /bookings/{id}                            get, update, delete
/// /bookings/{id}/confirm                    confirm (POST)
/// /bookings/{id}/complete                   complete (POST)
/// /bookings/{id}/no-show                    mark no-show (POST)
/// /bookings/{id}/cancel                     cancel with reason (POST)
/// /bookings/{id}/reschedule                 move to a new slot (POST)
///
/// /invoices                                 paged list, create
/// /invoices/overdue                         sent invoices past due (GET)
/// /invoices/{id}                            get, update, delete
/// /invoices/{id}/pay                        mark paid (POST)
///
/// /transactions                             list, create
/// /transactions/summary                     income / expense / net (GET)
/// /transactions/{id}                        update, delete
///
/// /tasks                                    paged list, create
/// /tasks/stats                              counts and completion rate (GET)
/// /tasks/{id}                               get, update, delete (?permanent=)
/// /tasks/{id}/subtasks                      list subtasks (GET)
///
/// /community/posts                          public paged list (no auth), create
/// /community/posts/{id}                     update, delete
/// /community/posts/{id}/like                like (POST)
/// /community/feed                           public and members-only posts (GET)
/// /community/mine                           the caller's posts (GET)
///
/// /admin/authors/{id}/posts                 all posts by an author (admin only)
///
/// /dashboard                                get, save the caller's config
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bookings", bookings::router())
        .nest("/invoices", invoices::router())
        .nest("/transactions", transactions::router())
        .nest("/tasks", tasks::router())
        .nest("/community", community::router())
        .nest("/admin", community::admin_router())
        .nest("/dashboard", dashboard::router())
}
