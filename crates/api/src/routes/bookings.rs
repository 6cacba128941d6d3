//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                   -> list_bookings
/// POST   /                   -> create_booking
/// GET    /by-code/{code}     -> get_booking_by_code
/// GET    /{id}               -> get_booking
/// PUT    /{id}               -> update_booking
/// DELETE /{id}               -> delete_booking
/// POST   /{id}/confirm       -> confirm_booking
/// POST   /{id}/complete      -> complete_booking
/// POST   /{id}/no-show       -> mark_no_show
/// POST   /{id}/cancel        -> cancel_booking
/// POST   /{id}/reschedule    -> reschedule_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/by-code/{code}", get(bookings::get_booking_by_code))
        .route(
            "/{id}",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/{id}/confirm", post(bookings::confirm_booking))
        .route("/{id}/complete", post(bookings::complete_booking))
        .route("/{id}/no-show", post(bookings::mark_no_show))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/reschedule", post(bookings::reschedule_booking))
}
