//! Booking repository over a key-value store.
//!
//! Key: `bookings` → `[Booking]`

use std::sync::Arc;

use vfo_core::booking::{Booking, BookingPatch, BookingRepository};
use vfo_core::error::{Result, VfoError};
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

pub struct KvBookingRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvBookingRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl BookingRepository for KvBookingRepository {
    fn list(&self) -> Result<Vec<Booking>> {
        Ok(self.store.get_or_default(keys::BOOKINGS))
    }

    fn add(&self, booking: Booking) -> Result<()> {
        let id = booking.id.clone();
        let added = self
            .store
            .update(keys::BOOKINGS, |bookings: &mut Vec<Booking>| {
                if bookings.iter().any(|b| b.id == booking.id) {
                    return false;
                }
                bookings.push(booking);
                true
            })?;
        if added {
            Ok(())
        } else {
            Err(VfoError::validation(format!("Booking '{}' already exists", id)))
        }
    }

    fn update(&self, id: &str, patch: BookingPatch) -> Result<Option<Booking>> {
        self.store
            .update(keys::BOOKINGS, |bookings: &mut Vec<Booking>| {
                bookings.iter_mut().find(|b| b.id == id).map(|b| {
                    patch.apply(b);
                    b.clone()
                })
            })
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.list()?.into_iter().find(|b| b.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_update_merges_by_id() {
        let repo = KvBookingRepository::new(Arc::new(MemoryStore::new()));
        let mut b1 = Booking::new("b1", "Ann Lee", "ann@example.com");
        b1.notes.push("intro".to_string());
        repo.add(b1).unwrap();
        repo.add(Booking::new("b2", "Bo Chen", "bo@example.com")).unwrap();

        let updated = repo.update("b1", BookingPatch::stage("Paid")).unwrap().unwrap();
        assert_eq!(updated.stage, "Paid");
        assert_eq!(updated.notes, vec!["intro".to_string()]);

        let all = repo.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].stage, "New");
    }

    #[test]
    fn test_add_rejects_existing_id() {
        let repo = KvBookingRepository::new(Arc::new(MemoryStore::new()));
        let mut b1 = Booking::new("b1", "Ann Lee", "ann@example.com");
        b1.notes.push("intro".to_string());
        repo.add(b1).unwrap();

        let err = repo.add(Booking::new("b1", "Someone Else", "x@example.com")).unwrap_err();
        assert!(err.is_validation());

        let kept = repo.find_by_id("b1").unwrap().unwrap();
        assert_eq!(kept.name, "Ann Lee");
        assert_eq!(kept.notes, vec!["intro".to_string()]);
    }

    #[test]
    fn test_update_missing_is_none() {
        let repo = KvBookingRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.update("nope", BookingPatch::stage("Paid")).unwrap().is_none());
    }
}
