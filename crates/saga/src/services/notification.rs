//! Guest notification trait and in-memory implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::{Money, PaymentId, ReservationId};
use domain::{Payment, Reservation};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised when a notification cannot be sent.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The reservation lists nobody to notify.
    #[error("Reservation {0} has no guest to notify")]
    NoRecipient(ReservationId),

    /// The delivery channel is down.
    #[error("Notification channel unavailable: {0}")]
    Unavailable(String),
}

/// Sends booking notifications to guests.
///
/// Notifications are best-effort; callers log failures and carry on.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Tells the primary guest their booking is confirmed.
    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
    ) -> Result<(), NotificationError>;

    /// Tells the primary guest their booking was cancelled.
    async fn send_cancellation_notice(
        &self,
        reservation: &Reservation,
        reason: &str,
    ) -> Result<(), NotificationError>;

    /// Sends a receipt for a captured payment.
    async fn send_payment_receipt(&self, payment: &Payment) -> Result<(), NotificationError>;
}

/// A notification recorded by [`InMemoryNotificationService`].
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    ReservationConfirmation {
        reservation_id: ReservationId,
        recipient: String,
    },
    CancellationNotice {
        reservation_id: ReservationId,
        recipient: String,
        reason: String,
    },
    PaymentReceipt {
        payment_id: PaymentId,
        amount: Money,
    },
}

/// In-memory notification service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationService {
    sent: Arc<RwLock<Vec<Notification>>>,
    attempts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl InMemoryNotificationService {
    /// Creates a new notification service with nothing sent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every send to fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Returns the notifications sent so far, in order.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    /// Returns the number of send attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Unavailable("mail relay down".to_string()));
        }
        Ok(())
    }

    fn recipient(reservation: &Reservation) -> Result<String, NotificationError> {
        reservation
            .primary_guest()
            .map(|guest| guest.email.clone())
            .ok_or_else(|| NotificationError::NoRecipient(reservation.id().clone()))
    }
}

#[async_trait]
impl NotificationService for InMemoryNotificationService {
    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
    ) -> Result<(), NotificationError> {
        self.begin()?;
        let recipient = Self::recipient(reservation)?;

        tracing::info!(
            reservation_id = %reservation.id(),
            %recipient,
            nights = reservation.nights(),
            total = %reservation.total_amount(),
            "reservation confirmation sent"
        );
        self.sent
            .write()
            .await
            .push(Notification::ReservationConfirmation {
                reservation_id: reservation.id().clone(),
                recipient,
            });
        Ok(())
    }

    async fn send_cancellation_notice(
        &self,
        reservation: &Reservation,
        reason: &str,
    ) -> Result<(), NotificationError> {
        self.begin()?;
        let recipient = Self::recipient(reservation)?;

        tracing::info!(
            reservation_id = %reservation.id(),
            %recipient,
            reason,
            "cancellation notice sent"
        );
        self.sent.write().await.push(Notification::CancellationNotice {
            reservation_id: reservation.id().clone(),
            recipient,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn send_payment_receipt(&self, payment: &Payment) -> Result<(), NotificationError> {
        self.begin()?;

        tracing::info!(
            payment_id = %payment.id(),
            amount = %payment.amount(),
            "payment receipt sent"
        );
        self.sent.write().await.push(Notification::PaymentReceipt {
            payment_id: payment.id().clone(),
            amount: payment.amount().clone(),
        });
        Ok(())
    }
}
