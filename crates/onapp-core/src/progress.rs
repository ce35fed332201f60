//! Polling background transactions until they finish
//!
//! A tracked delete hands back the transaction the server queued for it.
//! [`wait_for_transaction`] polls that transaction with an optional progress
//! callback so a CLI can drive a spinner while library callers stay quiet.

use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::client::Client;
use crate::error::{OnAppError, Result};
use crate::transactions::Transaction;

/// Progress events emitted while waiting on a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionProgressEvent {
    Started {
        transaction_id: i64,
    },
    /// One poll with the status the server reported
    Polling {
        transaction_id: i64,
        status: String,
        elapsed: Duration,
    },
    Completed {
        transaction_id: i64,
    },
    Failed {
        transaction_id: i64,
        error: String,
    },
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(TransactionProgressEvent) + Send + Sync>;

/// Poll a transaction until it completes, fails or `timeout` elapses
///
/// Statuses other than `complete`, `failed` and `cancelled` keep the loop
/// going. The deadline is checked after each poll, so at least one request is
/// always made.
///
/// # Example
///
/// ```rust,ignore
/// use onapp_core::{TransactionProgressEvent, wait_for_transaction};
/// use std::time::Duration;
///
/// let done = wait_for_transaction(
///     &client,
///     transaction.id,
///     Duration::from_secs(300),
///     Duration::from_secs(5),
///     Some(Box::new(|event| {
///         if let TransactionProgressEvent::Polling { status, .. } = event {
///             eprintln!("status: {status}");
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn wait_for_transaction(
    client: &Client,
    transaction_id: i64,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Transaction> {
    let start = Instant::now();
    let transactions = client.transactions();

    emit(
        &on_progress,
        TransactionProgressEvent::Started { transaction_id },
    );

    loop {
        let transaction = transactions.get(transaction_id).await?;
        let status = transaction.status.clone().unwrap_or_default();
        let elapsed = start.elapsed();

        trace!("Transaction {} is {:?}", transaction_id, status);
        emit(
            &on_progress,
            TransactionProgressEvent::Polling {
                transaction_id,
                status: status.clone(),
                elapsed,
            },
        );

        if transaction.is_complete() {
            debug!(
                "Transaction {} completed after {:.1}s",
                transaction_id,
                elapsed.as_secs_f64()
            );
            emit(
                &on_progress,
                TransactionProgressEvent::Completed { transaction_id },
            );
            return Ok(transaction);
        }

        if transaction.is_failed() || transaction.is_cancelled() {
            let error = format!(
                "transaction {} ({}) ended with status '{}'",
                transaction_id,
                transaction.action.as_deref().unwrap_or("unknown action"),
                status
            );
            emit(
                &on_progress,
                TransactionProgressEvent::Failed {
                    transaction_id,
                    error: error.clone(),
                },
            );
            return Err(OnAppError::TransactionFailed(error));
        }

        if start.elapsed() >= timeout {
            return Err(OnAppError::TransactionTimeout(timeout));
        }
        tokio::time::sleep(interval).await;
    }
}

fn emit(callback: &Option<ProgressCallback>, event: TransactionProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
