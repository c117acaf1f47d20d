//! Payment service coordinating the gateway, storage and events.

use common::PaymentId;
use store::{EventPublisher, Repository};

use crate::error::DomainError;
use crate::event::EventPublisherExt;

use super::{
    AuthorizePayment, GatewayError, GatewayOperation, Payment, PaymentEvent, PaymentGateway,
    PaymentRepository,
};

/// Failure code recorded when the gateway rejects an authorization.
pub const AUTHORIZATION_FAILED_CODE: &str = "gateway_error";

/// Failure code recorded when the gateway rejects a capture.
pub const CAPTURE_FAILED_CODE: &str = "capture_failed";

/// Service for managing payments.
///
/// Gateway failures on authorize and capture are recorded on the payment and
/// announced with a `payment.failed` event before the error is returned.
pub struct PaymentService<R, G, P> {
    repository: R,
    gateway: G,
    publisher: P,
}

impl<R, G, P> PaymentService<R, G, P>
where
    R: PaymentRepository,
    G: PaymentGateway,
    P: EventPublisher,
{
    /// Creates a new payment service.
    pub fn new(repository: R, gateway: G, publisher: P) -> Self {
        Self {
            repository,
            gateway,
            publisher,
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates a payment and authorizes it at the gateway.
    ///
    /// A rejected authorization is still stored, as a failed payment.
    #[tracing::instrument(skip(self))]
    pub async fn authorize_payment(&self, cmd: AuthorizePayment) -> Result<Payment, DomainError> {
        let mut payment = Payment::new(
            cmd.payment_id,
            cmd.reservation_id,
            cmd.amount,
            cmd.payment_method,
        );

        let authorized = self.gateway.authorize(&payment).await;
        match authorized {
            Ok(transaction_id) => {
                payment.authorize(transaction_id)?;
                self.repository.create(payment.id(), payment.clone()).await?;
                self.publisher
                    .publish_event(&PaymentEvent::authorized(&payment))
                    .await?;

                tracing::info!(payment_id = %payment.id(), "payment authorized");
                Ok(payment)
            }
            Err(source) => {
                record_gateway_failure(GatewayOperation::Authorize, &source);
                payment.fail(AUTHORIZATION_FAILED_CODE, source.to_string())?;
                self.repository.create(payment.id(), payment.clone()).await?;
                self.publish_failure(&payment).await;

                Err(DomainError::Gateway {
                    operation: GatewayOperation::Authorize,
                    source,
                })
            }
        }
    }

    /// Captures an authorized payment.
    #[tracing::instrument(skip(self))]
    pub async fn capture_payment(&self, payment_id: &PaymentId) -> Result<Payment, DomainError> {
        let mut payment = self.repository.read(payment_id).await?;
        let transaction_id = payment.transaction_id().unwrap_or_default().to_string();

        let captured = self.gateway.capture(&transaction_id, payment.amount()).await;
        if let Err(source) = captured {
            record_gateway_failure(GatewayOperation::Capture, &source);
            match payment.fail(CAPTURE_FAILED_CODE, source.to_string()) {
                Ok(()) => {
                    if let Err(error) = self.repository.update(payment_id, payment.clone()).await {
                        tracing::warn!(%payment_id, %error, "failed to store capture failure");
                    }
                    self.publish_failure(&payment).await;
                }
                Err(error) => {
                    tracing::warn!(%payment_id, %error, "could not mark payment failed");
                }
            }

            return Err(DomainError::Gateway {
                operation: GatewayOperation::Capture,
                source,
            });
        }

        payment.capture()?;
        self.repository.update(payment_id, payment.clone()).await?;
        self.publisher
            .publish_event(&PaymentEvent::captured(&payment))
            .await?;

        tracing::info!(%payment_id, "payment captured");
        Ok(payment)
    }

    /// Refunds a captured payment.
    ///
    /// A gateway failure leaves the stored payment untouched.
    #[tracing::instrument(skip(self))]
    pub async fn refund_payment(&self, payment_id: &PaymentId) -> Result<Payment, DomainError> {
        let mut payment = self.repository.read(payment_id).await?;
        let transaction_id = payment.transaction_id().unwrap_or_default().to_string();

        let refunded = self.gateway.refund(&transaction_id, payment.amount()).await;
        if let Err(source) = refunded {
            record_gateway_failure(GatewayOperation::Refund, &source);
            return Err(DomainError::Gateway {
                operation: GatewayOperation::Refund,
                source,
            });
        }

        payment.refund()?;
        self.repository.update(payment_id, payment.clone()).await?;
        self.publisher
            .publish_event(&PaymentEvent::refunded(&payment))
            .await?;

        tracing::info!(%payment_id, "payment refunded");
        Ok(payment)
    }

    /// Retries authorization of a pending or failed payment.
    #[tracing::instrument(skip(self))]
    pub async fn retry_authorization(
        &self,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError> {
        let mut payment = self.repository.read(payment_id).await?;
        payment.ensure_retryable()?;

        let authorized = self.gateway.authorize(&payment).await;
        match authorized {
            Ok(transaction_id) => {
                payment.authorize(transaction_id)?;
                self.repository.update(payment_id, payment.clone()).await?;
                self.publisher
                    .publish_event(&PaymentEvent::authorized(&payment))
                    .await?;

                tracing::info!(%payment_id, "payment authorized on retry");
                Ok(payment)
            }
            Err(source) => {
                record_gateway_failure(GatewayOperation::Authorize, &source);
                payment.fail(AUTHORIZATION_FAILED_CODE, source.to_string())?;
                self.repository.update(payment_id, payment.clone()).await?;
                self.publish_failure(&payment).await;

                Err(DomainError::Gateway {
                    operation: GatewayOperation::Authorize,
                    source,
                })
            }
        }
    }

    /// Loads a payment by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_payment(&self, payment_id: &PaymentId) -> Result<Payment, DomainError> {
        Ok(self.repository.read(payment_id).await?)
    }

    // Event-driven entry points

    /// Authorizes payment for a newly created reservation.
    pub async fn authorize_payment_for_reservation(
        &self,
        cmd: AuthorizePayment,
    ) -> Result<Payment, DomainError> {
        self.authorize_payment(cmd).await
    }

    /// Captures a payment once it has been authorized.
    pub async fn capture_payment_on_authorization(
        &self,
        payment_id: &PaymentId,
    ) -> Result<Payment, DomainError> {
        self.capture_payment(payment_id).await
    }

    async fn publish_failure(&self, payment: &Payment) {
        if let Err(error) = self
            .publisher
            .publish_event(&PaymentEvent::failed(payment))
            .await
        {
            tracing::warn!(payment_id = %payment.id(), %error, "failed to publish payment failure");
        }
    }
}

fn record_gateway_failure(operation: GatewayOperation, error: &GatewayError) {
    metrics::counter!("payment_gateway_failures_total", "operation" => operation.as_str())
        .increment(1);
    tracing::warn!(%operation, %error, "payment gateway rejected operation");
}
