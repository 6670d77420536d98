//! Cookie based session ids. History itself lives server side in
//! `AppState`; the cookie only carries the key.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "woby_session";

/// Get the session id from the request cookies, issuing a new one
/// when missing. The returned jar must be included in the response so
/// a new cookie reaches the client.
pub fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            let id = cookie.value().to_string();
            return (jar, id);
        }
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}
