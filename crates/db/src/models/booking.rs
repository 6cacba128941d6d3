//! Booking entity model and DTOs.

use serde::{Deserialize, Serialize};
use freeflow_core::types::{DbId, Timestamp};

use super::Entity;

/// A row from the `bookings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub client_id: Option<DbId>,
    pub service_name: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: String,
    pub price: f64,
    pub currency: String,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    /// Start time before the most recent reschedule.
    pub rescheduled_from: Option<Timestamp>,
    pub confirmation_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a booking. Status starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub client_id: Option<DbId>,
    pub service_name: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Defaults to 0.
    pub price: Option<f64>,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a booking. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBooking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// DTO for moving a booking to a new slot.
#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleBooking {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// DTO for cancelling a booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelBooking {
    pub reason: Option<String>,
}

/// Filters for listing a user's bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<String>,
    pub client_id: Option<DbId>,
    /// Only bookings starting at or after this instant.
    pub from: Option<Timestamp>,
    /// Only bookings starting at or before this instant.
    pub to: Option<Timestamp>,
}

impl Entity for Booking {
    const TABLE: &'static str = "bookings";
    const NAME: &'static str = "Booking";

    fn id(&self) -> DbId {
        self.id
    }

    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
