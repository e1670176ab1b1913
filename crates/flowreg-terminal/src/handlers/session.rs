//! login, logout, whoami and navigate

use anyhow::{bail, Context, Result};
use flowreg_app::workflows::auth;
use std::fmt::Write as _;
use std::io::BufRead;

use super::HandlerContext;
use crate::output::render_decision;

/// Environment variable read when `--password` is omitted.
pub const PASSWORD_ENV: &str = "FLOWREG_PASSWORD";

/// Password from the flag, then `FLOWREG_PASSWORD`, then one line of stdin.
pub fn resolve_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        return Ok(password);
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given (use --password, {PASSWORD_ENV} or stdin)");
    }
    Ok(password)
}

/// Log in and report where the console would go next.
pub async fn handle_login(ctx: &HandlerContext, username: &str, password: &str) -> Result<String> {
    let target = auth::login(ctx.core(), username, password).await?;
    if !ctx.persists_tokens() {
        tracing::warn!("no store configured; the session ends with this process");
    }
    let name = ctx
        .core()
        .session()
        .read(|s| s.display_name().map(str::to_string))
        .unwrap_or_else(|| username.to_string());
    Ok(format!("logged in as {name}\nnext: {target}"))
}

/// Clear the token and the session.
pub async fn handle_logout(ctx: &HandlerContext) -> Result<String> {
    auth::logout(ctx.core()).await;
    Ok("logged out".to_string())
}

/// Describe the identity behind the stored token.
pub async fn handle_whoami(ctx: &HandlerContext) -> Result<String> {
    let user = auth::refresh_identity(ctx.core()).await?;
    let session = ctx.core().session().snapshot();

    let mut out = String::new();
    let _ = writeln!(out, "identity:   {}", user.identity);
    let _ = writeln!(out, "anonymous:  {}", user.anonymous);
    let _ = writeln!(out, "can logout: {}", session.can_logout);
    if let Some(expires) = ctx.core().store().get_item_expiration(flowreg_app::JWT_KEY).await {
        let _ = writeln!(out, "token expires (ms): {expires}");
    }
    out.push_str("permissions:");
    for (resource, p) in user.resource_permissions.iter() {
        let _ = write!(
            out,
            "\n  {resource:<20} read={} write={} delete={}",
            p.can_read, p.can_write, p.can_delete
        );
    }
    Ok(out)
}

/// Run `url` through the gate and print the decision.
pub async fn handle_navigate(ctx: &HandlerContext, url: &str) -> Result<String> {
    let decision = ctx.core().gate().authorize_url(url).await;
    Ok(render_decision(url, &decision))
}
