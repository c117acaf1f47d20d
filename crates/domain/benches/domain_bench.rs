use chrono::{Duration, Utc};
use common::{GuestId, Money, PaymentId, ReservationId, RoomId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    CreateReservation, DateRange, DomainEvent, GuestInfo, Payment, RepositoryAvailabilityChecker,
    Reservation, ReservationEvent, ReservationService,
};
use store::{InMemoryEventPublisher, InMemoryRepository, Repository};

fn guests() -> Vec<GuestInfo> {
    vec![GuestInfo::new("Bench Guest", "bench@example.com", "555-0100")]
}

fn stay(from_day: i64, nights: i64) -> DateRange {
    let now = Utc::now();
    DateRange::new(
        now + Duration::days(from_day),
        now + Duration::days(from_day + nights),
    )
}

fn new_reservation(id: &str, room: &str, from_day: i64) -> Reservation {
    Reservation::new(
        ReservationId::new(id),
        GuestId::new("guest-bench"),
        RoomId::new(room),
        stay(from_day, 2),
        Money::new(30000, "USD"),
        guests(),
    )
    .unwrap()
}

fn bench_reservation_lifecycle(c: &mut Criterion) {
    c.bench_function("domain/reservation_lifecycle", |b| {
        b.iter(|| {
            let mut reservation = new_reservation("res-bench", "room-101", 7);
            reservation.confirm().unwrap();
            reservation.activate().unwrap();
            reservation.complete().unwrap();
        });
    });
}

fn bench_payment_lifecycle(c: &mut Criterion) {
    c.bench_function("domain/payment_lifecycle", |b| {
        b.iter(|| {
            let mut payment = Payment::new(
                PaymentId::new("pay-bench"),
                ReservationId::new("res-bench"),
                Money::new(30000, "USD"),
                "card",
            );
            payment.authorize("txn-bench").unwrap();
            payment.capture().unwrap();
            payment.refund().unwrap();
        });
    });
}

fn bench_event_envelope(c: &mut Criterion) {
    let reservation = new_reservation("res-bench", "room-101", 7);

    c.bench_function("domain/reservation_created_envelope", |b| {
        b.iter(|| {
            ReservationEvent::created(&reservation)
                .to_envelope()
                .unwrap()
        });
    });
}

fn bench_create_with_availability(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryRepository::new("Reservation");

    // Pre-populate: 100 reservations spread across 10 rooms
    rt.block_on(async {
        for i in 0..100 {
            let reservation = new_reservation(
                &format!("res-{i:03}"),
                &format!("room-{}", i % 10),
                7 + (i / 10) * 3,
            );
            repo.create(&reservation.id().clone(), reservation)
                .await
                .unwrap();
        }
    });

    c.bench_function("domain/create_reservation_100_existing", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = ReservationService::new(
                    repo.clone(),
                    RepositoryAvailabilityChecker::new(repo.clone()),
                    InMemoryEventPublisher::new(),
                );
                let reservation = service
                    .create_reservation(CreateReservation::for_guest(
                        GuestId::new("guest-bench"),
                        RoomId::new("room-free"),
                        stay(7, 2),
                        Money::new(30000, "USD"),
                        guests(),
                    ))
                    .await
                    .unwrap();
                repo.delete(reservation.id()).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_reservation_lifecycle,
    bench_payment_lifecycle,
    bench_event_envelope,
    bench_create_with_availability,
);
criterion_main!(benches);
