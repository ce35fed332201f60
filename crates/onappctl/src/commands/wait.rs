//! Spinner output while waiting on a transaction

use indicatif::{ProgressBar, ProgressStyle};
use onapp_core::{ProgressCallback, TransactionProgressEvent};

/// Spinner shown on stderr while a transaction runs
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

/// Callback that mirrors waiter events onto `pb`
pub fn progress_callback(pb: ProgressBar) -> ProgressCallback {
    Box::new(move |event: TransactionProgressEvent| match &event {
        TransactionProgressEvent::Started { transaction_id } => {
            pb.set_message(format!("Transaction {} started", transaction_id));
        }
        TransactionProgressEvent::Polling {
            transaction_id,
            status,
            ..
        } => {
            pb.set_message(format!(
                "Transaction {}: {}",
                transaction_id,
                format_status(status)
            ));
            pb.tick();
        }
        TransactionProgressEvent::Completed { transaction_id } => {
            pb.finish_with_message(format!(
                "Transaction {}: {}",
                transaction_id,
                format_status("complete")
            ));
        }
        TransactionProgressEvent::Failed {
            transaction_id,
            error,
        } => {
            pb.finish_with_message(format!("Transaction {} failed: {}", transaction_id, error));
        }
    })
}

/// Status with an icon for terminals
pub fn format_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "complete" => format!("\u{2713} {}", status),
        "failed" => format!("\u{2717} {}", status),
        "cancelled" => format!("\u{2298} {}", status),
        "running" => format!("\u{21bb} {}", status),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_icons() {
        assert_eq!(format_status("complete"), "\u{2713} complete");
        assert_eq!(format_status("FAILED"), "\u{2717} FAILED");
        assert_eq!(format_status("pending"), "pending");
    }

    #[test]
    fn test_callback_finishes_spinner() {
        let pb = ProgressBar::hidden();
        let callback = progress_callback(pb.clone());

        callback(TransactionProgressEvent::Started { transaction_id: 4 });
        assert!(!pb.is_finished());

        callback(TransactionProgressEvent::Completed { transaction_id: 4 });
        assert!(pb.is_finished());
    }
}
