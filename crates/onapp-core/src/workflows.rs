//! Multi-step operations built on the resource services

use std::time::Duration;

use crate::client::Client;
use crate::error::Result;
use crate::progress::{ProgressCallback, wait_for_transaction};
use crate::resource::{CrudKind, ResourceService, Tracked, TrackedDeletion};

/// Delete a resource and wait for its transaction to finish
///
/// The returned [`TrackedDeletion`] carries the finished transaction. When the
/// server recorded no transaction for the resource the deletion is returned
/// as-is, with `transaction` unset, and nothing is polled.
pub async fn delete_and_wait<K>(
    client: &Client,
    id: i64,
    filter: Option<&K::DeleteFilter>,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<TrackedDeletion>
where
    K: CrudKind<Deletion = Tracked>,
{
    let mut deletion = ResourceService::<K>::new(client.clone())
        .delete(id, filter)
        .await?;

    if let Some(transaction) = deletion.transaction.take() {
        let finished =
            wait_for_transaction(client, transaction.id, timeout, interval, on_progress).await?;
        deletion.transaction = Some(finished);
    }

    Ok(deletion)
}
