//! Repository for the `bookings` table.

use freeflow_core::query::Query;
use freeflow_core::status::{
    validate_booking_status, BOOKING_CANCELLED, BOOKING_PENDING, BOOKING_RESCHEDULED,
    DEFAULT_CURRENCY,
};
use freeflow_core::types::DbId;
use freeflow_core::validation::{
    require_non_empty, require_non_empty_opt, require_non_negative, require_ordered,
};
use rand::Rng;
use serde_json::json;

use crate::client::BackendClient;
use crate::models::booking::{
    Booking, BookingFilter, CreateBooking, RescheduleBooking, UpdateBooking,
};
use crate::repositories::crud::{self, decode, to_row};
use crate::DbError;

/// Length of the code a client quotes to identify their booking.
const CONFIRMATION_CODE_LEN: usize = 8;

/// Generate an uppercase alphanumeric confirmation code.
pub fn confirmation_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CONFIRMATION_CODE_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// Provides CRUD and lifecycle operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// List a user's bookings, earliest first.
    pub async fn list_for_user(
        client: &dyn BackendClient,
        user_id: DbId,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, DbError> {
        let mut query = Query::from("bookings").eq("user_id", user_id);
        if let Some(status) = filter.status.as_deref() {
            validate_booking_status(status)?;
            query = query.eq("status", status);
        }
        if let Some(client_id) = filter.client_id {
            query = query.eq("client_id", client_id);
        }
        if let Some(from) = filter.from {
            query = query.gte("start_time", from);
        }
        if let Some(to) = filter.to {
            query = query.lte("start_time", to);
        }
        crud::list(client, query.order("start_time", true)).await
    }

    /// Find a booking by the code a client quotes. Case and surrounding
    /// whitespace are ignored.
    pub async fn find_by_confirmation_code(
        client: &dyn BackendClient,
        code: &str,
    ) -> Result<Option<Booking>, DbError> {
        let code = code.trim().to_ascii_uppercase();
        let query = Query::from("bookings").eq("confirmation_code", code);
        let row = client.select_maybe(&query).await?;
        Ok(row.map(decode).transpose()?)
    }

    pub async fn find_by_id(
        client: &dyn BackendClient,
        id: DbId,
    ) -> Result<Option<Booking>, DbError> {
        crud::find_by_id(client, id).await
    }

    /// Insert a new `pending` booking with a fresh confirmation code.
    pub async fn create(
        client: &dyn BackendClient,
        user_id: DbId,
        input: &CreateBooking,
    ) -> Result<Booking, DbError> {
        require_non_empty("service_name", &input.service_name)?;
        require_non_empty("client_name", &input.client_name)?;
        require_ordered(input.start_time, input.end_time)?;
        let price = input.price.unwrap_or(0.0);
        require_non_negative("price", price)?;

        let row = to_row(&json!({
            "user_id": user_id,
            "client_id": input.client_id,
            "service_name": input.service_name,
            "client_name": input.client_name,
            "client_email": input.client_email,
            "start_time": input.start_time,
            "end_time": input.end_time,
            "status": BOOKING_PENDING,
            "price": price,
            "currency": input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            "notes": input.notes,
            "confirmation_code": confirmation_code(),
        }))?;
        let booking: Booking = crud::create(client, row).await?;
        tracing::debug!(booking_id = %booking.id, user_id = %user_id, "Booking created");
        Ok(booking)
    }

    /// Update a booking. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        client: &dyn BackendClient,
        id: DbId,
        input: &UpdateBooking,
    ) -> Result<Option<Booking>, DbError> {
        require_non_empty_opt("service_name", input.service_name.as_deref())?;
        require_non_empty_opt("client_name", input.client_name.as_deref())?;
        if let Some(price) = input.price {
            require_non_negative("price", price)?;
        }
        if let Some(status) = input.status.as_deref() {
            validate_booking_status(status)?;
        }
        crud::update_by_id(client, id, to_row(input)?).await
    }

    /// Move a booking to `status` (confirm, complete, no-show).
    pub async fn set_status(
        client: &dyn BackendClient,
        id: DbId,
        status: &str,
    ) -> Result<Option<Booking>, DbError> {
        validate_booking_status(status)?;
        crud::update_by_id(client, id, to_row(&json!({ "status": status }))?).await
    }

    /// Cancel a booking, recording the reason when one is given.
    pub async fn cancel(
        client: &dyn BackendClient,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<Booking>, DbError> {
        let patch = to_row(&json!({
            "status": BOOKING_CANCELLED,
            "cancellation_reason": reason,
        }))?;
        crud::update_by_id(client, id, patch).await
    }

    /// Move `booking` to a new slot, remembering where it started.
    pub async fn reschedule(
        client: &dyn BackendClient,
        booking: &Booking,
        input: &RescheduleBooking,
    ) -> Result<Option<Booking>, DbError> {
        require_ordered(input.start_time, input.end_time)?;
        let patch = to_row(&json!({
            "start_time": input.start_time,
            "end_time": input.end_time,
            "status": BOOKING_RESCHEDULED,
            "rescheduled_from": booking.start_time,
        }))?;
        crud::update_by_id(client, booking.id, patch).await
    }

    /// Delete a booking. Returns `true` if a row was removed.
    pub async fn delete(client: &dyn BackendClient, id: DbId) -> Result<bool, DbError> {
        crud::delete_by_id::<Booking>(client, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_codes_are_uppercase_alphanumeric() {
        let code = confirmation_code();
        assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
