//! Explorer: buckets and their droplets.

use flowreg_core::{Bucket, ConsoleError, Droplet, Result};

use super::buckets::bucket_table;
use crate::console::ConsoleCore;
use crate::views::{ColumnDescriptor, SortOrder, TableState};

/// Explorer state for one visit.
#[derive(Clone, Debug)]
pub struct ExplorerView {
    /// Buckets visible to the identity
    pub buckets: TableState<Bucket>,
    /// Droplets of every visible bucket
    pub droplets: TableState<Droplet>,
    /// Bucket the droplet list is narrowed to
    pub bucket: Option<Bucket>,
}

/// Empty droplet table, most recently modified first.
pub fn droplet_table() -> TableState<Droplet> {
    let mut table = TableState::new(
        vec![
            ColumnDescriptor::sortable("name", "Name"),
            ColumnDescriptor::sortable("modifiedTimestamp", "Last Updated"),
            ColumnDescriptor::sortable("type", "Type"),
            ColumnDescriptor::fixed("bucketName", "Bucket"),
        ],
        true,
    );
    table.set_sort("modifiedTimestamp", SortOrder::Desc);
    table
}

/// Load buckets and droplets, optionally narrowed to one bucket.
///
/// Buckets are fetched first; the droplet request only starts once they
/// arrived.
pub async fn load_explorer(core: &ConsoleCore, bucket_id: Option<&str>) -> Result<ExplorerView> {
    let mut buckets = bucket_table();
    buckets.set_records(core.api().get_buckets().await?);

    let bucket = match bucket_id {
        Some(id) => Some(core.api().get_bucket(id, false).await?),
        None => None,
    };

    let mut droplets = droplet_table();
    droplets.set_records(core.api().get_droplets(bucket_id).await?);

    tracing::debug!(
        buckets = buckets.records().len(),
        droplets = droplets.records().len(),
        bucket = ?bucket_id,
        "loaded explorer"
    );
    Ok(ExplorerView {
        buckets,
        droplets,
        bucket,
    })
}

/// One droplet with its version history.
pub async fn load_droplet(
    core: &ConsoleCore,
    bucket_id: &str,
    droplet_type: &str,
    droplet_id: &str,
) -> Result<Droplet> {
    Ok(core
        .api()
        .get_droplet(bucket_id, droplet_type, droplet_id, true)
        .await?)
}

/// Delete a droplet through its self link.
pub async fn delete_droplet(core: &ConsoleCore, droplet: &Droplet) -> Result<Droplet> {
    let uri = droplet.uri().ok_or_else(|| {
        ConsoleError::invalid(format!("Droplet {} has no link to delete", droplet.identifier))
    })?;
    let deleted = core.api().delete_droplet(uri).await?;
    tracing::info!(droplet = %deleted.identifier, "deleted droplet");
    Ok(deleted)
}
