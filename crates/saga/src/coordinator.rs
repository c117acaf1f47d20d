//! Booking coordinator orchestrating the hotel booking saga.

use std::time::Instant;

use common::{GuestId, Money, PaymentId, ReservationId, RoomId};
use domain::{
    AuthorizePayment, AvailabilityChecker, CreateReservation, DateRange, DomainError, GuestInfo,
    Payment, PaymentGateway, PaymentRepository, PaymentService, Reservation,
    ReservationRepository, ReservationService,
};
use store::EventPublisher;

use crate::booking::{self, BookingStep, CompensationAction};
use crate::error::{CompensationFailure, SagaError};
use crate::services::NotificationService;

/// Everything needed to book a room and pay for it.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub reservation_id: ReservationId,
    pub payment_id: PaymentId,
    pub guest_id: GuestId,
    pub room_id: RoomId,
    pub date_range: DateRange,
    pub total_amount: Money,
    pub guests: Vec<GuestInfo>,
    pub payment_method: String,
}

impl BookingRequest {
    /// Creates a request from a reservation command plus payment details.
    pub fn new(
        reservation: CreateReservation,
        payment_id: PaymentId,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            reservation_id: reservation.reservation_id,
            payment_id,
            guest_id: reservation.guest_id,
            room_id: reservation.room_id,
            date_range: reservation.date_range,
            total_amount: reservation.total_amount,
            guests: reservation.guests,
            payment_method: payment_method.into(),
        }
    }

    /// Returns the command that creates the reservation.
    pub fn reservation_command(&self) -> CreateReservation {
        CreateReservation::new(
            self.reservation_id.clone(),
            self.guest_id.clone(),
            self.room_id.clone(),
            self.date_range,
            self.total_amount.clone(),
            self.guests.clone(),
        )
    }

    /// Returns the command that authorizes the payment.
    pub fn payment_command(&self) -> AuthorizePayment {
        AuthorizePayment::new(
            self.payment_id.clone(),
            self.reservation_id.clone(),
            self.total_amount.clone(),
            self.payment_method.clone(),
        )
    }
}

/// Orchestrates hotel bookings across the reservation and payment services.
///
/// The coordinator drives a 4-step saga (create reservation → authorize →
/// capture → confirm) and runs compensating actions when a step fails. No
/// saga record is stored: progress lives only in the running call.
pub struct BookingCoordinator<RR, AC, PR, PG, EP, N> {
    reservations: ReservationService<RR, AC, EP>,
    payments: PaymentService<PR, PG, EP>,
    notifications: N,
}

impl<RR, AC, PR, PG, EP, N> BookingCoordinator<RR, AC, PR, PG, EP, N>
where
    RR: ReservationRepository,
    AC: AvailabilityChecker,
    PR: PaymentRepository,
    PG: PaymentGateway,
    EP: EventPublisher,
    N: NotificationService,
{
    /// Creates a new booking coordinator.
    pub fn new(
        reservations: ReservationService<RR, AC, EP>,
        payments: PaymentService<PR, PG, EP>,
        notifications: N,
    ) -> Self {
        Self {
            reservations,
            payments,
            notifications,
        }
    }

    /// Returns the reservation service.
    pub fn reservations(&self) -> &ReservationService<RR, AC, EP> {
        &self.reservations
    }

    /// Returns the payment service.
    pub fn payments(&self) -> &PaymentService<PR, PG, EP> {
        &self.payments
    }

    /// Returns the notification service.
    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    /// Books a room end to end and returns the confirmed reservation.
    ///
    /// On failure every step already completed is compensated. The returned
    /// error names the failing step and, if a compensation also failed, each
    /// compensation error.
    #[tracing::instrument(
        skip(self, request),
        fields(saga_type = booking::SAGA_TYPE, reservation_id = %request.reservation_id)
    )]
    pub async fn complete_booking(
        &self,
        request: BookingRequest,
    ) -> Result<Reservation, SagaError> {
        metrics::counter!("booking_saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let result = self.run_booking(&request).await;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("booking_saga_duration_seconds").record(duration);
        match &result {
            Ok(_) => {
                metrics::counter!("booking_saga_completed_total").increment(1);
                tracing::info!(duration, "booking saga completed successfully");
            }
            Err(error) => {
                let step = error.step().map_or("unknown", |s| s.as_str());
                metrics::counter!("booking_saga_failed_total", "step" => step).increment(1);
                tracing::warn!(duration, %error, "booking saga failed");
            }
        }

        result
    }

    async fn run_booking(&self, request: &BookingRequest) -> Result<Reservation, SagaError> {
        // Step 1: Create reservation
        tracing::info!(step = BookingStep::CreateReservation.as_str(), "saga step started");
        let reservation = self
            .reservations
            .create_reservation(request.reservation_command())
            .await
            .map_err(|source| SagaError::StepFailed {
                step: BookingStep::CreateReservation,
                source,
            })?;

        // Step 2: Authorize payment
        tracing::info!(step = BookingStep::AuthorizePayment.as_str(), "saga step started");
        let payment = match self
            .payments
            .authorize_payment(request.payment_command())
            .await
        {
            Ok(payment) => payment,
            Err(source) => {
                return Err(self
                    .compensate(BookingStep::AuthorizePayment, source, reservation.id(), None)
                    .await);
            }
        };

        // Step 3: Capture payment
        tracing::info!(step = BookingStep::CapturePayment.as_str(), "saga step started");
        if let Err(source) = self.payments.capture_payment(payment.id()).await {
            return Err(self
                .compensate(BookingStep::CapturePayment, source, reservation.id(), None)
                .await);
        }

        // Step 4: Confirm reservation
        tracing::info!(step = BookingStep::ConfirmReservation.as_str(), "saga step started");
        if let Err(source) = self.reservations.confirm_reservation(reservation.id()).await {
            return Err(self
                .compensate(
                    BookingStep::ConfirmReservation,
                    source,
                    reservation.id(),
                    Some(payment.id()),
                )
                .await);
        }

        let confirmed = self.reservations.get_reservation(reservation.id()).await?;
        if let Err(error) = self
            .notifications
            .send_reservation_confirmation(&confirmed)
            .await
        {
            tracing::warn!(
                reservation_id = %confirmed.id(),
                %error,
                "confirmation notice not sent"
            );
        }

        Ok(confirmed)
    }

    /// Undoes the completed steps after `step` failed.
    ///
    /// The refund (when a captured payment exists) and the cancellation are
    /// both attempted even if the first one fails.
    async fn compensate(
        &self,
        step: BookingStep,
        source: DomainError,
        reservation_id: &ReservationId,
        captured_payment: Option<&PaymentId>,
    ) -> SagaError {
        tracing::warn!(%step, error = %source, "saga step failed, compensating");
        let mut failures = Vec::new();

        if let Some(payment_id) = captured_payment {
            let refunded = self.payments.refund_payment(payment_id).await;
            if let Some(failure) = record_compensation(CompensationAction::RefundPayment, refunded)
            {
                failures.push(failure);
            }
        }

        if let Some(reason) = step.cancellation_reason() {
            let cancelled = self
                .reservations
                .cancel_reservation(reservation_id, reason)
                .await;
            if let Some(failure) =
                record_compensation(CompensationAction::CancelReservation, cancelled)
            {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            SagaError::StepFailed { step, source }
        } else {
            tracing::error!(
                %step,
                %reservation_id,
                failed_compensations = failures.len(),
                "compensation failed"
            );
            SagaError::CompensationFailed {
                step,
                source,
                failures,
            }
        }
    }

    /// Cancels a booking and notifies the guest.
    ///
    /// The payment is not looked up here; refunds are handled separately.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_booking_with_refund(
        &self,
        reservation_id: &ReservationId,
        reason: &str,
    ) -> Result<Reservation, SagaError> {
        let reservation = self
            .reservations
            .cancel_reservation(reservation_id, reason)
            .await?;

        if let Err(error) = self
            .notifications
            .send_cancellation_notice(&reservation, reason)
            .await
        {
            tracing::warn!(%reservation_id, %error, "cancellation notice not sent");
        }

        Ok(reservation)
    }

    // Event-driven entry points

    /// Starts an event-driven booking by creating the reservation only.
    ///
    /// The rest of the booking is driven by handlers reacting to the
    /// published events.
    #[tracing::instrument(skip(self))]
    pub async fn initiate_booking(&self, cmd: CreateReservation) -> Result<Reservation, SagaError> {
        self.reservations
            .create_reservation(cmd)
            .await
            .map_err(|source| SagaError::StepFailed {
                step: BookingStep::CreateReservation,
                source,
            })
    }

    /// Captures an authorized payment, cancelling the reservation if capture fails.
    #[tracing::instrument(skip(self))]
    pub async fn on_payment_authorized(
        &self,
        payment_id: &PaymentId,
        reservation_id: &ReservationId,
    ) -> Result<Payment, SagaError> {
        match self.payments.capture_payment_on_authorization(payment_id).await {
            Ok(payment) => Ok(payment),
            Err(source) => {
                if let Err(error) = self
                    .reservations
                    .cancel_reservation(reservation_id, booking::REASON_PAYMENT_CAPTURE_FAILED)
                    .await
                {
                    tracing::warn!(
                        %reservation_id,
                        %error,
                        "could not cancel after capture failure"
                    );
                }
                Err(SagaError::StepFailed {
                    step: BookingStep::CapturePayment,
                    source,
                })
            }
        }
    }

    /// Confirms the reservation once payment is captured.
    #[tracing::instrument(skip(self))]
    pub async fn on_payment_captured(
        &self,
        reservation_id: &ReservationId,
    ) -> Result<Reservation, SagaError> {
        let reservation = self
            .reservations
            .confirm_reservation_on_payment_captured(reservation_id)
            .await
            .map_err(|source| SagaError::StepFailed {
                step: BookingStep::ConfirmReservation,
                source,
            })?;

        if let Err(error) = self
            .notifications
            .send_reservation_confirmation(&reservation)
            .await
        {
            tracing::warn!(%reservation_id, %error, "confirmation notice not sent");
        }

        Ok(reservation)
    }

    /// Cancels the reservation after its payment failed.
    #[tracing::instrument(skip(self))]
    pub async fn on_payment_failed(
        &self,
        reservation_id: &ReservationId,
        reason: &str,
    ) -> Result<Reservation, SagaError> {
        Ok(self
            .reservations
            .cancel_reservation_on_payment_failed(reservation_id, reason)
            .await?)
    }
}

fn record_compensation<T>(
    action: CompensationAction,
    result: Result<T, DomainError>,
) -> Option<CompensationFailure> {
    match result {
        Ok(_) => {
            metrics::counter!(
                "booking_saga_compensations_total",
                "action" => action.as_str(),
                "outcome" => "succeeded"
            )
            .increment(1);
            tracing::info!(%action, "compensation completed");
            None
        }
        Err(error) => {
            metrics::counter!(
                "booking_saga_compensations_total",
                "action" => action.as_str(),
                "outcome" => "failed"
            )
            .increment(1);
            tracing::error!(%action, %error, "compensation step failed");
            Some(CompensationFailure { action, error })
        }
    }
}
