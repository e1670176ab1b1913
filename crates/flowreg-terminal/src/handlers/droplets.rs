//! Droplet commands

use anyhow::{anyhow, Result};
use flowreg_app::workflows::explorer;
use std::fmt::Write as _;

use super::HandlerContext;
use crate::cli::DropletsCommand;
use crate::output::{apply_list_args, render_table};

/// Run a `droplets` subcommand.
pub async fn handle(ctx: &HandlerContext, command: DropletsCommand) -> Result<String> {
    match command {
        DropletsCommand::List { bucket, list } => {
            let mut view = explorer::load_explorer(ctx.core(), bucket.as_deref()).await?;
            apply_list_args(&mut view.droplets, &list).map_err(|e| anyhow!(e))?;

            let mut out = String::new();
            if let Some(bucket) = &view.bucket {
                let _ = writeln!(out, "bucket: {} ({})", bucket.name, bucket.identifier);
            }
            out.push_str(&render_table(&view.droplets));
            Ok(out)
        }
        DropletsCommand::Show {
            bucket,
            droplet_type,
            id,
        } => {
            let droplet = explorer::load_droplet(ctx.core(), &bucket, &droplet_type, &id).await?;
            let mut out = String::new();
            let _ = writeln!(out, "name:     {}", droplet.name);
            let _ = writeln!(out, "id:       {}", droplet.identifier);
            let _ = writeln!(out, "type:     {}", droplet.droplet_type);
            let _ = writeln!(
                out,
                "bucket:   {}",
                droplet.bucket_name.as_deref().unwrap_or(&droplet.bucket_identifier)
            );
            if let Some(description) = &droplet.description {
                let _ = writeln!(out, "about:    {description}");
            }
            let _ = write!(out, "versions: {}", droplet.snapshot_metadata.len());
            for snapshot in &droplet.snapshot_metadata {
                let version = snapshot.get("version").map(ToString::to_string).unwrap_or_default();
                let comments = snapshot
                    .get("comments")
                    .and_then(|c| c.as_str())
                    .unwrap_or_default();
                let _ = write!(out, "\n  v{version} {comments}");
            }
            Ok(out)
        }
        DropletsCommand::Delete {
            bucket,
            droplet_type,
            id,
        } => {
            let droplet = explorer::load_droplet(ctx.core(), &bucket, &droplet_type, &id).await?;
            let deleted = explorer::delete_droplet(ctx.core(), &droplet).await?;
            Ok(format!("deleted {} ({})", deleted.name, deleted.identifier))
        }
    }
}
