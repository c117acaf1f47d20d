//! Shared kernel for the hotel booking system.
//!
//! Types that both the reservation and payment contexts reference but
//! neither owns.

mod money;
mod types;

pub use money::Money;
pub use types::{GuestId, PaymentId, ReservationId, RoomId};
