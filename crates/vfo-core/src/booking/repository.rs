//! Booking repository trait.

use super::model::{Booking, BookingPatch};
use crate::error::Result;

/// Persistence contract for client bookings.
///
/// Records are never hard-deleted. Every write is a merge by id: callers
/// pass only the fields they change and unrelated fields are preserved.
pub trait BookingRepository: Send + Sync {
    /// Retrieves all bookings in stored order.
    fn list(&self) -> Result<Vec<Booking>>;

    /// Appends a booking. An id that is already stored is a validation error.
    fn add(&self, booking: Booking) -> Result<()>;

    /// Applies `patch` to the booking with `id` and returns the updated record.
    ///
    /// Returns `Ok(None)` when no booking has that id.
    fn update(&self, id: &str, patch: BookingPatch) -> Result<Option<Booking>>;

    /// Finds a booking by id.
    fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;
}
