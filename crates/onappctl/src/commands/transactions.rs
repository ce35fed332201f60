//! Transaction commands

use std::time::Duration;

use onapp_core::{ParentGroup, Transaction, wait_for_transaction};

use super::CommandContext;
use super::resources::{SummaryRow, print_item, print_list};
use super::wait::{format_status, progress_callback, spinner};
use crate::cli::TransactionCommands;
use crate::error::Result as CliResult;
use crate::output::cell;

impl SummaryRow for Transaction {
    const COLUMNS: &'static [&'static str] =
        &["ID", "ACTION", "STATUS", "PARENT", "CREATED"];

    fn cells(&self) -> Vec<String> {
        let parent = match (&self.parent_type, self.parent_id) {
            (Some(parent_type), Some(parent_id)) => format!("{} {}", parent_type, parent_id),
            _ => "-".to_string(),
        };
        vec![
            self.id.to_string(),
            cell(self.action.as_deref()),
            self.status
                .as_deref()
                .map_or_else(|| "-".to_string(), format_status),
            parent,
            cell(self.created_at.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
        ]
    }
}

pub async fn handle_transaction_command(
    cmd: &TransactionCommands,
    ctx: &CommandContext<'_>,
) -> CliResult<()> {
    let client = ctx.client()?;

    match cmd {
        TransactionCommands::List(args) => {
            let (transactions, response) =
                client.transactions().list(args.options().as_ref()).await?;
            print_list(&transactions, &response, ctx)
        }
        TransactionCommands::Get { id } => print_item(&client.transactions().get(*id).await?, ctx),
        TransactionCommands::Latest {
            parent_id,
            parent_type,
        } => {
            let parent = ParentGroup::new(*parent_id, parent_type.as_str());
            print_item(&client.transactions().resolve(&parent).await?, ctx)
        }
        TransactionCommands::Wait {
            id,
            timeout,
            interval,
        } => {
            let pb = spinner(format!("Waiting for transaction {}", id));
            let result = wait_for_transaction(
                &client,
                *id,
                Duration::from_secs(*timeout),
                Duration::from_secs(*interval),
                Some(progress_callback(pb.clone())),
            )
            .await;
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
            print_item(&result?, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_on_disk() -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": 9,
            "action": "destroy_disk",
            "status": "running",
            "parent_id": 5,
            "parent_type": "Disk",
            "created_at": "2024-03-01T10:15:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_transaction_row() {
        let cells = running_on_disk().cells();
        assert_eq!(cells.len(), Transaction::COLUMNS.len());
        assert_eq!(cells[1], "destroy_disk");
        assert_eq!(cells[2], "\u{21bb} running");
        assert_eq!(cells[3], "Disk 5");
        assert_eq!(cells[4], "2024-03-01 10:15:00");
    }

    #[test]
    fn test_transaction_row_without_parent() {
        let cells = Transaction::default().cells();
        assert_eq!(cells[2], "-");
        assert_eq!(cells[3], "-");
    }
}
