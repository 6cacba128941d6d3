//! Booking actions.

use freeflow_core::envelope::{with_envelope, with_list_envelope, with_unit_envelope, Envelope};
use freeflow_core::error::CoreError;
use freeflow_core::status::{BOOKING_COMPLETED, BOOKING_CONFIRMED, BOOKING_NO_SHOW};
use freeflow_core::types::DbId;
use freeflow_db::models::booking::{
    Booking, BookingFilter, CancelBooking, CreateBooking, RescheduleBooking, UpdateBooking,
};
use freeflow_db::repositories::BookingRepo;
use freeflow_db::DbError;

use crate::session::{not_found, Session};

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list(session: &Session, filter: &BookingFilter) -> Result<Vec<Booking>, DbError> {
    BookingRepo::list_for_user(session.client(), session.user_id, filter).await
}

pub async fn get(session: &Session, id: DbId) -> Result<Booking, DbError> {
    session.load_owned(id).await
}

/// Look a booking up by its confirmation code. Only its owner (or an admin)
/// may see it.
pub async fn get_by_code(session: &Session, code: &str) -> Result<Booking, DbError> {
    let booking = BookingRepo::find_by_confirmation_code(session.client(), code)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "Booking",
            key: "confirmation code",
            value: code.trim().to_string(),
        })?;
    session.authorize(&booking)?;
    Ok(booking)
}

pub async fn create(session: &Session, input: &CreateBooking) -> Result<Booking, DbError> {
    let booking = BookingRepo::create(session.client(), session.user_id, input).await?;
    tracing::info!(
        user_id = %session.user_id,
        booking_id = %booking.id,
        confirmation_code = %booking.confirmation_code,
        "Booking created",
    );
    Ok(booking)
}

pub async fn update(
    session: &Session,
    id: DbId,
    input: &UpdateBooking,
) -> Result<Booking, DbError> {
    session.load_owned::<Booking>(id).await?;
    BookingRepo::update(session.client(), id, input)
        .await?
        .ok_or_else(|| not_found::<Booking>(id))
}

/// Move a booking the session owns to `status`.
pub async fn set_status(session: &Session, id: DbId, status: &str) -> Result<Booking, DbError> {
    session.load_owned::<Booking>(id).await?;
    let booking = BookingRepo::set_status(session.client(), id, status)
        .await?
        .ok_or_else(|| not_found::<Booking>(id))?;
    tracing::info!(booking_id = %id, status, "Booking status changed");
    Ok(booking)
}

pub async fn cancel(
    session: &Session,
    id: DbId,
    input: &CancelBooking,
) -> Result<Booking, DbError> {
    session.load_owned::<Booking>(id).await?;
    BookingRepo::cancel(session.client(), id, input.reason.as_deref())
        .await?
        .ok_or_else(|| not_found::<Booking>(id))
}

pub async fn reschedule(
    session: &Session,
    id: DbId,
    input: &RescheduleBooking,
) -> Result<Booking, DbError> {
    let current = session.load_owned::<Booking>(id).await?;
    BookingRepo::reschedule(session.client(), &current, input)
        .await?
        .ok_or_else(|| not_found::<Booking>(id))
}

pub async fn delete(session: &Session, id: DbId) -> Result<(), DbError> {
    session.load_owned::<Booking>(id).await?;
    if !BookingRepo::delete(session.client(), id).await? {
        return Err(not_found::<Booking>(id));
    }
    tracing::info!(user_id = %session.user_id, booking_id = %id, "Booking deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope actions
// ---------------------------------------------------------------------------

pub async fn list_bookings(session: &Session, filter: BookingFilter) -> Envelope<Vec<Booking>> {
    with_list_envelope(list(session, &filter)).await
}

pub async fn get_booking(session: &Session, id: DbId) -> Envelope<Booking> {
    with_envelope(get(session, id)).await
}

pub async fn get_booking_by_code(session: &Session, code: &str) -> Envelope<Booking> {
    with_envelope(get_by_code(session, code)).await
}

pub async fn create_booking(session: &Session, input: CreateBooking) -> Envelope<Booking> {
    with_envelope(create(session, &input)).await
}

pub async fn update_booking(
    session: &Session,
    id: DbId,
    input: UpdateBooking,
) -> Envelope<Booking> {
    with_envelope(update(session, id, &input)).await
}

pub async fn confirm_booking(session: &Session, id: DbId) -> Envelope<Booking> {
    with_envelope(set_status(session, id, BOOKING_CONFIRMED)).await
}

pub async fn complete_booking(session: &Session, id: DbId) -> Envelope<Booking> {
    with_envelope(set_status(session, id, BOOKING_COMPLETED)).await
}

pub async fn mark_booking_no_show(session: &Session, id: DbId) -> Envelope<Booking> {
    with_envelope(set_status(session, id, BOOKING_NO_SHOW)).await
}

pub async fn cancel_booking(
    session: &Session,
    id: DbId,
    input: CancelBooking,
) -> Envelope<Booking> {
    with_envelope(cancel(session, id, &input)).await
}

pub async fn reschedule_booking(
    session: &Session,
    id: DbId,
    input: RescheduleBooking,
) -> Envelope<Booking> {
    with_envelope(reschedule(session, id, &input)).await
}

pub async fn delete_booking(session: &Session, id: DbId) -> Envelope<()> {
    with_unit_envelope(delete(session, id)).await
}
