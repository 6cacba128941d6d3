//! Handlers for `/api/v1/bookings`.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use freeflow_core::envelope::Envelope;
use freeflow_core::status::{BOOKING_COMPLETED, BOOKING_CONFIRMED, BOOKING_NO_SHOW};
use freeflow_core::types::DbId;
use freeflow_db::models::booking::{
    BookingFilter, CancelBooking, CreateBooking, RescheduleBooking, UpdateBooking,
};

use crate::actions::bookings;
use crate::error::AppResult;
use crate::session::Session;

/// GET /api/v1/bookings
pub async fn list_bookings(
    session: Session,
    Query(filter): Query<BookingFilter>,
) -> AppResult<impl IntoResponse> {
    let items = bookings::list(&session, &filter).await?;
    Ok(Json(Envelope::ok(items)))
}

/// GET /api/v1/bookings/by-code/{code}
pub async fn get_booking_by_code(
    session: Session,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::get_by_code(&session, &code).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /api/v1/bookings
pub async fn create_booking(
    session: Session,
    Json(input): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::create(&session, &input).await?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(booking))))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::get(&session, id).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// PUT /api/v1/bookings/{id}
pub async fn update_booking(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::update(&session, id, &input).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete_booking(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    bookings::delete(&session, id).await?;
    Ok(Json(Envelope::<()>::ok_empty()))
}

/// POST /api/v1/bookings/{id}/confirm
pub async fn confirm_booking(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::set_status(&session, id, BOOKING_CONFIRMED).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /api/v1/bookings/{id}/complete
pub async fn complete_booking(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::set_status(&session, id, BOOKING_COMPLETED).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /api/v1/bookings/{id}/no-show
pub async fn mark_no_show(
    session: Session,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::set_status(&session, id, BOOKING_NO_SHOW).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /api/v1/bookings/{id}/cancel
///
/// The body is optional; `{ "reason": "..." }` records why.
pub async fn cancel_booking(
    session: Session,
    Path(id): Path<DbId>,
    input: Option<Json<CancelBooking>>,
) -> AppResult<impl IntoResponse> {
    let input = input.map(|Json(i)| i).unwrap_or_default();
    let booking = bookings::cancel(&session, id, &input).await?;
    Ok(Json(Envelope::ok(booking)))
}

/// POST /api/v1/bookings/{id}/reschedule
pub async fn reschedule_booking(
    session: Session,
    Path(id): Path<DbId>,
    Json(input): Json<RescheduleBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = bookings::reschedule(&session, id, &input).await?;
    Ok(Json(Envelope::ok(booking)))
}
