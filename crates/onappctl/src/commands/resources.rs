//! Disk, data store, role and backup commands

use std::path::Path;
use std::time::Duration;

use onapp_core::{
    Backup, BackupCreateRequest, CrudKind, DataStore, DeleteOptions, Disk, DiskCreateRequest,
    ResourceKind, ResourceService, Response, Role, Tracked, TrackedDeletion, Untracked,
    delete_and_wait,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::CommandContext;
use super::wait::{format_status, progress_callback, spinner};
use crate::cli::{
    BackupCommands, DataStoreCommands, DiskCommands, ListArgs, RoleCommands, WaitArgs,
};
use crate::error::{OnAppCtlError, Result as CliResult};
use crate::output::{cell, print_output, print_rows};

/// Columns shown for a resource in `auto`/`table` list output
pub trait SummaryRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl SummaryRow for Disk {
    const COLUMNS: &'static [&'static str] =
        &["ID", "LABEL", "SIZE (GB)", "DATA STORE", "VM", "PRIMARY", "BUILT"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.label.as_deref()),
            cell(self.disk_size),
            cell(self.data_store_id),
            cell(self.virtual_machine_id),
            cell(self.primary),
            cell(self.built),
        ]
    }
}

impl SummaryRow for DataStore {
    const COLUMNS: &'static [&'static str] =
        &["ID", "LABEL", "TYPE", "SIZE (GB)", "ENABLED", "IDENTIFIER"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.label.as_deref()),
            cell(self.data_store_type.as_deref()),
            cell(self.data_store_size),
            cell(self.enabled),
            cell(self.identifier.as_deref()),
        ]
    }
}

impl SummaryRow for Role {
    const COLUMNS: &'static [&'static str] = &["ID", "LABEL", "IDENTIFIER", "PERMISSIONS", "USERS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.label.as_deref()),
            cell(self.identifier.as_deref()),
            self.permissions().count().to_string(),
            cell(self.users_count),
        ]
    }
}

impl SummaryRow for Backup {
    const COLUMNS: &'static [&'static str] =
        &["ID", "DISK", "TYPE", "SIZE (KB)", "BUILT", "CREATED", "NOTE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.disk_id),
            cell(self.backup_type.as_deref()),
            cell(self.backup_size),
            cell(self.built),
            cell(self.created_at.as_deref()),
            cell(self.note.as_deref()),
        ]
    }
}

pub async fn handle_disk_command(cmd: &DiskCommands, ctx: &CommandContext<'_>) -> CliResult<()> {
    let client = ctx.client()?;

    match cmd {
        DiskCommands::List(args) => list(&client.disks(), args, ctx).await,
        DiskCommands::Get { id } => print_item(&client.disks().get(*id).await?, ctx),
        DiskCommands::Create { vm_id, data } => {
            let mut request: DiskCreateRequest = read_data(data)?;
            request.virtual_machine_id = *vm_id;
            print_item(&client.disks().create(&request).await?, ctx)
        }
        DiskCommands::Delete { id, wait } => {
            delete_tracked::<Disk>(&client, *id, None, wait, ctx).await
        }
    }
}

pub async fn handle_data_store_command(
    cmd: &DataStoreCommands,
    ctx: &CommandContext<'_>,
) -> CliResult<()> {
    let client = ctx.client()?;

    match cmd {
        DataStoreCommands::List(args) => list(&client.data_stores(), args, ctx).await,
        DataStoreCommands::Get { id } => print_item(&client.data_stores().get(*id).await?, ctx),
        DataStoreCommands::Create { data } => {
            let request = read_data(data)?;
            print_item(&client.data_stores().create(&request).await?, ctx)
        }
        DataStoreCommands::Delete { id, force, wait } => {
            let filter = force.then(DeleteOptions::force);
            delete_tracked::<DataStore>(&client, *id, filter.as_ref(), wait, ctx).await
        }
    }
}

pub async fn handle_role_command(cmd: &RoleCommands, ctx: &CommandContext<'_>) -> CliResult<()> {
    let client = ctx.client()?;

    match cmd {
        RoleCommands::List(args) => list(&client.roles(), args, ctx).await,
        RoleCommands::Get { id } => print_item(&client.roles().get(*id).await?, ctx),
        RoleCommands::Create { data } => {
            let request = read_data(data)?;
            print_item(&client.roles().create(&request).await?, ctx)
        }
        RoleCommands::Delete { id, force } => {
            let filter = force.then(DeleteOptions::force);
            delete_untracked(&client.roles(), *id, filter.as_ref(), ctx).await
        }
    }
}

pub async fn handle_backup_command(
    cmd: &BackupCommands,
    ctx: &CommandContext<'_>,
) -> CliResult<()> {
    let client = ctx.client()?;

    match cmd {
        BackupCommands::List(args) => list(&client.backups(), args, ctx).await,
        BackupCommands::Get { id } => print_item(&client.backups().get(*id).await?, ctx),
        BackupCommands::Create {
            disk_id,
            note,
            force,
        } => {
            let mut request = BackupCreateRequest::for_disk(*disk_id);
            request.note = note.clone();
            request.force = force.then_some(true);
            print_item(&client.backups().create(&request).await?, ctx)
        }
        BackupCommands::Delete { id, wait } => {
            delete_tracked::<Backup>(&client, *id, None, wait, ctx).await
        }
    }
}

/// Print one page of a collection
pub async fn list<K>(
    service: &ResourceService<K>,
    args: &ListArgs,
    ctx: &CommandContext<'_>,
) -> CliResult<()>
where
    K: ResourceKind + SummaryRow,
{
    let (items, response) = service.list(args.options().as_ref()).await?;
    print_list(&items, &response, ctx)
}

pub fn print_list<T>(items: &[T], response: &Response, ctx: &CommandContext<'_>) -> CliResult<()>
where
    T: Serialize + SummaryRow,
{
    if !ctx.is_plain_table() {
        return Ok(print_output(items, ctx.format(), ctx.query)?);
    }

    print_rows(T::COLUMNS, items.iter().map(SummaryRow::cells).collect());
    if let Some(total) = response.total {
        println!("Showing {} of {}", items.len(), total);
    }
    if let Some(next) = &response.links.next {
        debug!("Next page: {}", next);
    }
    Ok(())
}

pub fn print_item<T: Serialize>(item: &T, ctx: &CommandContext<'_>) -> CliResult<()> {
    Ok(print_output(item, ctx.format(), ctx.query)?)
}

async fn delete_untracked<K>(
    service: &ResourceService<K>,
    id: i64,
    filter: Option<&K::DeleteFilter>,
    ctx: &CommandContext<'_>,
) -> CliResult<()>
where
    K: CrudKind<Deletion = Untracked>,
{
    let response = service.delete(id, filter).await?;

    if ctx.is_plain_table() {
        println!("Deleted {} {}", noun::<K>(), id);
        return Ok(());
    }
    print_item(&response, ctx)
}

async fn delete_tracked<K>(
    client: &onapp_core::Client,
    id: i64,
    filter: Option<&K::DeleteFilter>,
    wait: &WaitArgs,
    ctx: &CommandContext<'_>,
) -> CliResult<()>
where
    K: CrudKind<Deletion = Tracked>,
{
    let deletion = if wait.wait {
        let pb = spinner(format!("Deleting {} {}", noun::<K>(), id));
        let result = delete_and_wait::<K>(
            client,
            id,
            filter,
            Duration::from_secs(wait.wait_timeout),
            Duration::from_secs(wait.wait_interval),
            Some(progress_callback(pb.clone())),
        )
        .await;
        if !pb.is_finished() {
            pb.finish_and_clear();
        }
        result?
    } else {
        ResourceService::<K>::new(client.clone())
            .delete(id, filter)
            .await?
    };

    if !ctx.is_plain_table() {
        return print_item(&deletion, ctx);
    }

    print_deletion::<K>(&deletion, wait.wait);
    Ok(())
}

fn print_deletion<K: CrudKind>(deletion: &TrackedDeletion, waited: bool) {
    println!("Deleted {} {}", noun::<K>(), deletion.parent.parent_id);

    match &deletion.transaction {
        Some(transaction) => {
            println!(
                "Transaction {} ({}): {}",
                transaction.id,
                transaction.action.as_deref().unwrap_or("unknown"),
                format_status(transaction.status.as_deref().unwrap_or("unknown"))
            );
            if !waited {
                println!(
                    "To wait for completion, run: onappctl transaction wait {}",
                    transaction.id
                );
            }
        }
        None => println!("No transaction recorded for {}", deletion.parent),
    }
}

/// `data_store` reads as "data store"
fn noun<K: ResourceKind>() -> String {
    K::ENVELOPE.replace('_', " ")
}

/// Parse `--data`: inline JSON, or `@path` to read it from a file
pub fn read_data<T: DeserializeOwned>(data: &str) -> CliResult<T> {
    let content = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path)).map_err(|e| {
            OnAppCtlError::FileError {
                path: path.to_string(),
                message: e.to_string(),
            }
        })?,
        None => data.to_string(),
    };

    serde_json::from_str(&content).map_err(|e| OnAppCtlError::InvalidInput {
        message: format!("--data is not valid JSON for this resource: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use onapp_core::RoleCreateRequest;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_inline_data() {
        let request: RoleCreateRequest =
            read_data(r#"{"label": "Support", "permission_ids": [1, 2]}"#).unwrap();
        assert_eq!(request, RoleCreateRequest::new("Support", vec![1, 2]));
    }

    #[test]
    fn test_read_data_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"label": "data", "disk_size": 20}}"#).unwrap();

        let request: DiskCreateRequest =
            read_data(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(request.label.as_deref(), Some("data"));
        assert_eq!(request.disk_size, Some(20));
        assert_eq!(request.virtual_machine_id, 0);
    }

    #[test]
    fn test_read_data_missing_file() {
        let err = read_data::<RoleCreateRequest>("@/nonexistent/role.json").unwrap_err();
        assert!(matches!(err, OnAppCtlError::FileError { .. }));
    }

    #[test]
    fn test_read_data_invalid_json() {
        let err = read_data::<RoleCreateRequest>("{label").unwrap_err();
        assert!(matches!(err, OnAppCtlError::InvalidInput { .. }));
    }

    #[test]
    fn test_summary_rows() {
        let disk = Disk {
            id: 5,
            label: Some("root".to_string()),
            disk_size: Some(20),
            primary: Some(true),
            ..Default::default()
        };
        let cells = disk.cells();
        assert_eq!(cells.len(), Disk::COLUMNS.len());
        assert_eq!(cells[0], "5");
        assert_eq!(cells[1], "root");
        assert_eq!(cells[2], "20");
        assert_eq!(cells[3], "-");

        let role = Role::default();
        assert_eq!(role.cells()[3], "0");
    }

    #[test]
    fn test_noun() {
        assert_eq!(noun::<DataStore>(), "data store");
        assert_eq!(noun::<Disk>(), "disk");
    }
}
