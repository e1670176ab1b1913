//! Login, logout and identity refresh.

use flowreg_core::{ConsoleError, CurrentUser, Result};

use crate::console::ConsoleCore;
use crate::routes::{Location, Route};

/// Log in with a username and password.
///
/// **What it does**: exchanges the credentials for a session token, stores
/// it, loads the identity behind it and updates the session.
/// **Returns**: where to go next: the URL that sent the user to login, or
/// the explorer.
pub async fn login(core: &ConsoleCore, username: &str, password: &str) -> Result<Location> {
    if username.trim().is_empty() {
        return Err(ConsoleError::invalid("Username is required"));
    }

    let token = core.api().post_to_login(username, password).await?;
    let token = token.trim();
    if token.is_empty() {
        return Err(ConsoleError::internal("Login returned an empty token"));
    }
    core.store().store_session_token(token).await;

    let user = core.api().load_current_user().await?;
    // Gate resolutions started before the login must not overwrite it.
    core.session().begin_navigation(None);
    core.session().update(|session| {
        crate::session::apply_current_user(session, &user);
        session.can_logout = !user.anonymous;
    });
    tracing::info!(identity = %user.identity, "logged in");

    let target = core
        .session()
        .read(|s| s.redirect_url.clone())
        .map(|url| Location::parse(&url))
        .filter(|l| l.route != Route::Login)
        .unwrap_or_else(|| Route::Explorer.into());
    Ok(target)
}

/// Forget the session token and reset the session.
pub async fn logout(core: &ConsoleCore) {
    core.store().clear_session_token().await;
    core.session().clear();
    tracing::info!("logged out");
}

/// Reload the identity behind the stored token.
///
/// A 401 clears the stored token before the error is returned.
pub async fn refresh_identity(core: &ConsoleCore) -> Result<CurrentUser> {
    let user = match core.api().load_current_user().await {
        Ok(user) => user,
        Err(error) => {
            if error.is_unauthorized() {
                core.store().clear_session_token().await;
            }
            return Err(error.into());
        }
    };
    let has_token = core.store().has_session_token().await;
    core.session().begin_navigation(None);
    core.session().update(|session| {
        crate::session::apply_current_user(session, &user);
        session.can_logout = has_token && !user.anonymous;
    });
    Ok(user)
}
