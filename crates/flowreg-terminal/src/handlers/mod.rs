//! # CLI Command Handlers
//!
//! Handlers sit between argument parsing and the application core:
//!
//! ```text
//! CLI Args → Handlers → Workflows/Gate → RegistryApi
//! ```
//!
//! Every handler takes a [`HandlerContext`] and returns the text to print.
//! Administrative commands first pass the same gate the console applies to
//! the matching screen.

use anyhow::{bail, Result};
use flowreg_app::GateDecision;
use flowreg_core::ConsoleError;

use crate::cli::Commands;
use crate::output::render_decision;

pub mod buckets;
pub mod droplets;
pub mod handler_context;
pub mod session;
pub mod tenants;

pub use handler_context::HandlerContext;

/// Run one command.
pub async fn execute(ctx: &HandlerContext, command: Commands) -> Result<String> {
    if let Some(url) = command.gated_url() {
        require(ctx, url).await?;
    }

    match command {
        Commands::Login { username, password } => {
            let password = session::resolve_password(password)?;
            session::handle_login(ctx, &username, &password).await
        }
        Commands::Logout => session::handle_logout(ctx).await,
        Commands::Whoami => session::handle_whoami(ctx).await,
        Commands::Navigate { url } => session::handle_navigate(ctx, &url).await,
        Commands::Buckets { command } => buckets::handle(ctx, command).await,
        Commands::Droplets { command } => droplets::handle(ctx, command).await,
        Commands::Users { command } => tenants::handle_users(ctx, command).await,
        Commands::Groups { command } => tenants::handle_groups(ctx, command).await,
    }
}

/// Pass the gate for `url` or fail with what the console would have shown.
async fn require(ctx: &HandlerContext, url: &str) -> Result<()> {
    match ctx.core().gate().authorize_url(url).await {
        GateDecision::Allow => Ok(()),
        GateDecision::Stay { error } => Err(ConsoleError::from(error).into()),
        decision => bail!(render_decision(url, &decision)),
    }
}
