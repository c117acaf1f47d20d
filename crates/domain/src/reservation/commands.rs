//! Reservation commands.

use common::{GuestId, Money, ReservationId, RoomId};

use super::{DateRange, GuestInfo};

/// Command to create a new reservation.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    /// The reservation ID to create.
    pub reservation_id: ReservationId,

    /// The guest making the booking.
    pub guest_id: GuestId,

    /// The room being booked.
    pub room_id: RoomId,

    /// Stay dates.
    pub date_range: DateRange,

    /// Total price of the stay.
    pub total_amount: Money,

    /// Guests staying in the room.
    pub guests: Vec<GuestInfo>,
}

impl CreateReservation {
    /// Creates a new CreateReservation command.
    pub fn new(
        reservation_id: ReservationId,
        guest_id: GuestId,
        room_id: RoomId,
        date_range: DateRange,
        total_amount: Money,
        guests: Vec<GuestInfo>,
    ) -> Self {
        Self {
            reservation_id,
            guest_id,
            room_id,
            date_range,
            total_amount,
            guests,
        }
    }

    /// Creates a command with a generated reservation ID.
    pub fn for_guest(
        guest_id: GuestId,
        room_id: RoomId,
        date_range: DateRange,
        total_amount: Money,
        guests: Vec<GuestInfo>,
    ) -> Self {
        Self::new(
            ReservationId::generate(),
            guest_id,
            room_id,
            date_range,
            total_amount,
            guests,
        )
    }
}
