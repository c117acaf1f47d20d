//! In-memory payment gateway.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::Money;
use domain::{GatewayError, Payment, PaymentGateway};
use tokio::sync::RwLock;

/// In-memory payment gateway for tests and demos.
///
/// Authorizations are kept as open transactions keyed by
/// `txn_{payment_id}_{amount}`. Capture requires an open transaction with a
/// matching amount; refund closes it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    transactions: Arc<RwLock<HashMap<String, Money>>>,
    fail_on_authorize: Arc<AtomicBool>,
    fail_on_capture: Arc<AtomicBool>,
    fail_on_refund: Arc<AtomicBool>,
    authorize_calls: Arc<AtomicUsize>,
    capture_calls: Arc<AtomicUsize>,
    refund_calls: Arc<AtomicUsize>,
}

impl InMemoryPaymentGateway {
    /// Creates a new gateway with no open transactions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures authorization calls to be declined.
    pub fn set_fail_on_authorize(&self, fail: bool) {
        self.fail_on_authorize.store(fail, Ordering::SeqCst);
    }

    /// Configures capture calls to fail.
    pub fn set_fail_on_capture(&self, fail: bool) {
        self.fail_on_capture.store(fail, Ordering::SeqCst);
    }

    /// Configures refund calls to fail.
    pub fn set_fail_on_refund(&self, fail: bool) {
        self.fail_on_refund.store(fail, Ordering::SeqCst);
    }

    /// Returns how many times `authorize` was called.
    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `capture` was called.
    pub fn capture_calls(&self) -> usize {
        self.capture_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `refund` was called.
    pub fn refund_calls(&self) -> usize {
        self.refund_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of open transactions.
    pub async fn transaction_count(&self) -> usize {
        self.transactions.read().await.len()
    }

    /// Returns true if the transaction is open.
    pub async fn has_transaction(&self, transaction_id: &str) -> bool {
        self.transactions.read().await.contains_key(transaction_id)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn authorize(&self, payment: &Payment) -> Result<String, GatewayError> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_authorize.load(Ordering::SeqCst) {
            return Err(GatewayError::Declined("insufficient funds".to_string()));
        }

        let transaction_id = format!("txn_{}_{}", payment.id(), payment.amount().amount());
        self.transactions
            .write()
            .await
            .insert(transaction_id.clone(), payment.amount().clone());

        tracing::debug!(%transaction_id, amount = %payment.amount(), "gateway authorized");
        Ok(transaction_id)
    }

    async fn capture(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_capture.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("capture timed out".to_string()));
        }

        let transactions = self.transactions.read().await;
        let authorized = transactions
            .get(transaction_id)
            .ok_or_else(|| GatewayError::TransactionNotFound(transaction_id.to_string()))?;
        if authorized != amount {
            return Err(GatewayError::AmountMismatch {
                authorized: authorized.clone(),
                requested: amount.clone(),
            });
        }

        tracing::debug!(%transaction_id, %amount, "gateway captured");
        Ok(())
    }

    async fn refund(&self, transaction_id: &str, amount: &Money) -> Result<(), GatewayError> {
        self.refund_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_refund.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("refund rejected".to_string()));
        }

        let mut transactions = self.transactions.write().await;
        if transactions.remove(transaction_id).is_none() {
            return Err(GatewayError::TransactionNotFound(
                transaction_id.to_string(),
            ));
        }

        tracing::debug!(%transaction_id, %amount, "gateway refunded");
        Ok(())
    }
}
