//! Bucket commands

use anyhow::{anyhow, Result};
use flowreg_app::workflows::buckets;
use std::fmt::Write as _;

use super::HandlerContext;
use crate::cli::BucketsCommand;
use crate::output::{apply_list_args, render_error, render_table};

/// Run a `buckets` subcommand.
pub async fn handle(ctx: &HandlerContext, command: BucketsCommand) -> Result<String> {
    match command {
        BucketsCommand::List { list } => {
            let mut table = buckets::load_buckets(ctx.core()).await?;
            apply_list_args(&mut table, &list).map_err(|e| anyhow!(e))?;
            Ok(render_table(&table))
        }
        BucketsCommand::Create { name } => {
            let bucket = buckets::create_bucket(ctx.core(), &name).await?;
            Ok(format!("created bucket {} ({})", bucket.name, bucket.identifier))
        }
        BucketsCommand::Delete { ids } => {
            let mut table = buckets::load_buckets(ctx.core()).await?;
            let mut out = String::new();
            for id in &ids {
                if table.records().iter().any(|b| &b.identifier == id) {
                    table.select(id);
                } else {
                    let _ = writeln!(out, "skipped {id}: no such bucket");
                }
            }

            let outcome = buckets::delete_selected_buckets(ctx.core(), &mut table).await;
            for bucket in &outcome.deleted {
                let _ = writeln!(out, "deleted bucket {} ({})", bucket.name, bucket.identifier);
            }
            for (id, error) in &outcome.failed {
                let _ = writeln!(out, "failed to delete {id}\n{}", render_error(error));
            }
            Ok(out.trim_end().to_string())
        }
    }
}
