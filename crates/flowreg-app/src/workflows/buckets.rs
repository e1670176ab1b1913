//! Bucket administration: list, create, delete.

use flowreg_core::{Bucket, ConsoleError, Result};

use super::DeleteOutcome;
use crate::console::ConsoleCore;
use crate::views::{ColumnDescriptor, TableState};

/// Empty bucket table with the administration columns, sorted by name.
pub fn bucket_table() -> TableState<Bucket> {
    TableState::new(
        vec![
            ColumnDescriptor::sortable("name", "Bucket Name"),
            ColumnDescriptor::fixed("identifier", "Bucket ID"),
            ColumnDescriptor::sortable("createdTimestamp", "Created"),
        ],
        true,
    )
}

/// Fetch every bucket the identity can see.
pub async fn load_buckets(core: &ConsoleCore) -> Result<TableState<Bucket>> {
    let mut table = bucket_table();
    refresh_buckets(core, &mut table).await?;
    Ok(table)
}

/// Replace `table`'s records with a fresh listing, keeping search and sort.
pub async fn refresh_buckets(core: &ConsoleCore, table: &mut TableState<Bucket>) -> Result<()> {
    let buckets = core.api().get_buckets().await?;
    tracing::debug!(count = buckets.len(), "loaded buckets");
    table.set_records(buckets);
    Ok(())
}

/// Create a bucket. The name is trimmed and must not be empty.
pub async fn create_bucket(core: &ConsoleCore, name: &str) -> Result<Bucket> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConsoleError::invalid("Bucket name is required"));
    }
    let bucket = core.api().create_bucket(name).await?;
    tracing::info!(bucket = %bucket.identifier, name, "created bucket");
    Ok(bucket)
}

/// Delete the buckets with the given identifiers, one request each.
pub async fn delete_buckets(core: &ConsoleCore, ids: &[String]) -> DeleteOutcome<Bucket> {
    let mut outcome = DeleteOutcome::default();
    for id in ids {
        match core.api().delete_bucket(id).await {
            Ok(bucket) => outcome.deleted.push(bucket),
            Err(error) => {
                tracing::warn!(bucket = %id, error = %error, "failed to delete bucket");
                outcome.failed.push((id.clone(), error.into()));
            }
        }
    }
    outcome
}

/// Delete the selected buckets and drop them from the table.
pub async fn delete_selected_buckets(
    core: &ConsoleCore,
    table: &mut TableState<Bucket>,
) -> DeleteOutcome<Bucket> {
    let ids: Vec<String> = table
        .selected()
        .iter()
        .map(|b| b.identifier.clone())
        .collect();
    let outcome = delete_buckets(core, &ids).await;
    let remaining = table
        .records()
        .iter()
        .filter(|b| !outcome.was_deleted(&b.identifier, |d| d.identifier.as_str()))
        .cloned()
        .collect();
    table.set_records(remaining);
    outcome
}
