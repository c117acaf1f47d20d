//! Integration tests for the reservation context.
//!
//! These tests drive the reservation service against the in-memory adapters,
//! including the availability race between concurrent bookings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::{GuestId, Money, ReservationId, RoomId};
use domain::{
    AvailabilityChecker, AvailabilityError, CreateReservation, DateRange, DomainError, GuestInfo,
    RepositoryAvailabilityChecker, Reservation, ReservationEvent, ReservationService,
    ReservationStatus,
};
use store::{InMemoryEventPublisher, InMemoryRepository, Repository};
use tokio::sync::Barrier;

type Repo = InMemoryRepository<ReservationId, Reservation>;

fn stay(from_day: i64, to_day: i64) -> DateRange {
    let now = Utc::now();
    DateRange::new(now + Duration::days(from_day), now + Duration::days(to_day))
}

fn create_cmd(id: &str, room: &str, date_range: DateRange) -> CreateReservation {
    CreateReservation::new(
        ReservationId::new(id),
        GuestId::new("guest-1"),
        RoomId::new(room),
        date_range,
        Money::new(30000, "USD"),
        vec![GuestInfo::new("Grace Hopper", "grace@example.com", "555-0199")],
    )
}

mod availability {
    use super::*;

    fn create_service() -> (
        ReservationService<Repo, RepositoryAvailabilityChecker<Repo>, InMemoryEventPublisher>,
        Repo,
    ) {
        let repo = InMemoryRepository::new("Reservation");
        let service = ReservationService::new(
            repo.clone(),
            RepositoryAvailabilityChecker::new(repo.clone()),
            InMemoryEventPublisher::new(),
        );
        (service, repo)
    }

    #[tokio::test]
    async fn back_to_back_stays_share_a_room() {
        let (service, _) = create_service();
        let now = Utc::now();
        let first = DateRange::new(now + Duration::days(7), now + Duration::days(9));
        let second = DateRange::new(now + Duration::days(9), now + Duration::days(11));

        service
            .create_reservation(create_cmd("res-1", "room-101", first))
            .await
            .unwrap();
        service
            .create_reservation(create_cmd("res-2", "room-101", second))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_reservation_frees_the_room() {
        let (service, repo) = create_service();
        let range = stay(7, 9);
        service
            .create_reservation(create_cmd("res-1", "room-101", range))
            .await
            .unwrap();
        service
            .cancel_reservation(&ReservationId::new("res-1"), "guest request")
            .await
            .unwrap();

        let rebooked = service
            .create_reservation(create_cmd("res-2", "room-101", range))
            .await
            .unwrap();

        assert_eq!(rebooked.status(), ReservationStatus::Pending);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn overlapping_booking_is_rejected_without_side_effects() {
        let (service, repo) = create_service();
        service
            .create_reservation(create_cmd("res-1", "room-101", stay(7, 10)))
            .await
            .unwrap();

        let result = service
            .create_reservation(create_cmd("res-2", "room-101", stay(8, 9)))
            .await;

        match result {
            Err(DomainError::RoomUnavailable { room_id }) => {
                assert_eq!(room_id.as_str(), "room-101")
            }
            other => panic!("expected RoomUnavailable, got {other:?}"),
        }
        assert!(repo.read(&ReservationId::new("res-2")).await.is_err());
    }
}

mod availability_failures {
    use super::*;

    struct BrokenChecker;

    #[async_trait]
    impl AvailabilityChecker for BrokenChecker {
        async fn is_room_available(
            &self,
            _: &RoomId,
            _: &DateRange,
        ) -> Result<bool, AvailabilityError> {
            Err(AvailabilityError::Unavailable("inventory offline".into()))
        }

        async fn get_overlapping_reservations(
            &self,
            _: &RoomId,
            _: &DateRange,
        ) -> Result<Vec<Reservation>, AvailabilityError> {
            Err(AvailabilityError::Unavailable("inventory offline".into()))
        }
    }

    #[tokio::test]
    async fn checker_error_aborts_creation() {
        let repo: Repo = InMemoryRepository::new("Reservation");
        let publisher = InMemoryEventPublisher::new();
        let service = ReservationService::new(repo.clone(), BrokenChecker, publisher.clone());

        let result = service
            .create_reservation(create_cmd("res-1", "room-101", stay(7, 9)))
            .await;

        assert!(matches!(result, Err(DomainError::Availability(_))));
        assert!(repo.is_empty().await);
        assert_eq!(publisher.event_count().await, 0);
    }
}

mod known_gaps {
    use super::*;

    /// Lets both callers finish their availability check before either
    /// stores a reservation.
    struct RendezvousChecker {
        inner: RepositoryAvailabilityChecker<Repo>,
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl AvailabilityChecker for RendezvousChecker {
        async fn is_room_available(
            &self,
            room_id: &RoomId,
            date_range: &DateRange,
        ) -> Result<bool, AvailabilityError> {
            let available = self.inner.is_room_available(room_id, date_range).await?;
            self.barrier.wait().await;
            Ok(available)
        }

        async fn get_overlapping_reservations(
            &self,
            room_id: &RoomId,
            date_range: &DateRange,
        ) -> Result<Vec<Reservation>, AvailabilityError> {
            self.inner
                .get_overlapping_reservations(room_id, date_range)
                .await
        }
    }

    #[tokio::test]
    async fn concurrent_bookings_can_double_book() {
        let repo: Repo = InMemoryRepository::new("Reservation");
        let service = ReservationService::new(
            repo.clone(),
            RendezvousChecker {
                inner: RepositoryAvailabilityChecker::new(repo.clone()),
                barrier: Arc::new(Barrier::new(2)),
            },
            InMemoryEventPublisher::new(),
        );
        let range = stay(7, 9);

        let (first, second) = tokio::join!(
            service.create_reservation(create_cmd("res-1", "room-101", range)),
            service.create_reservation(create_cmd("res-2", "room-101", range)),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert!(first.is_overlapping(&second));
        assert_eq!(repo.len().await, 2);
    }
}

mod events {
    use super::*;

    #[tokio::test]
    async fn published_payloads_decode_to_reservation_events() {
        let repo: Repo = InMemoryRepository::new("Reservation");
        let publisher = InMemoryEventPublisher::new();
        let service = ReservationService::new(
            repo.clone(),
            RepositoryAvailabilityChecker::new(repo.clone()),
            publisher.clone(),
        );
        let id = ReservationId::new("res-1");

        service
            .create_reservation(create_cmd("res-1", "room-101", stay(7, 9)))
            .await
            .unwrap();
        service.cancel_reservation(&id, "guest request").await.unwrap();

        let envelopes = publisher.events().await;
        assert_eq!(envelopes.len(), 2);
        assert!(envelopes.iter().all(|e| e.aggregate_id == "res-1"));

        match envelopes[0].decode::<ReservationEvent>().unwrap() {
            ReservationEvent::Created(data) => {
                assert_eq!(data.room_id.as_str(), "room-101");
                assert_eq!(data.total_amount, Money::new(30000, "USD"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match envelopes[1].decode::<ReservationEvent>().unwrap() {
            ReservationEvent::Cancelled(data) => assert_eq!(data.reason, "guest request"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
