use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "app_session_id";

/// Cookie de session posé au login / register
pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.session_cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(config.session_ttl_days))
        .finish()
}

/// Cookie expiré qui efface la session côté navigateur (logout)
pub fn cleared_session_cookie(config: &AppConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.session_cookie_secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}
