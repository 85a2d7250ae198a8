//! Booking (client record) domain module.
//!
//! - `model`: `Booking`, `BookingPatch`, documents, prices and intake answers
//! - `repository`: persistence trait for bookings

mod model;
mod repository;

pub use model::{Booking, BookingDocument, BookingPatch, IntakeAnswers, Price};
pub use repository::BookingRepository;
