//! Session cookie handling for the web interface
//!
//! The cookie carries only the opaque session token; the identity lives in the
//! server-side `SessionStore`. The value is signed, and a cookie whose
//! signature does not verify reads as absent.

use filedesk::constants::{SESSION_COOKIE, SESSION_TTL_MILLIS};
use sha2::{Digest, Sha512};
use tower_cookies::{Cookie, Cookies, Key};

/// Derive the signing key from a configured secret, or generate a random one.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) if !secret.is_empty() => {
            let digest = Sha512::digest(secret.as_bytes());
            Key::from(digest.as_slice())
        }
        _ => {
            tracing::warn!(
                "No session secret configured; using a random key. Sessions will not survive a restart"
            );
            Key::generate()
        }
    }
}

/// Set the session cookie to `token`.
pub fn issue(cookies: &Cookies, key: &Key, token: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::milliseconds(SESSION_TTL_MILLIS));
    cookies.signed(key).add(cookie);
}

/// Session token from a verified cookie.
pub fn token(cookies: &Cookies, key: &Key) -> Option<String> {
    cookies
        .signed(key)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Expire the session cookie in the browser.
pub fn clear(cookies: &Cookies, key: &Key) {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookies.signed(key).remove(cookie);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_secret_same_key() {
        let a = cookie_key(Some("correct horse"));
        let b = cookie_key(Some("correct horse"));
        let c = cookie_key(Some("battery staple"));
        assert_eq!(a.signing(), b.signing());
        assert_ne!(a.signing(), c.signing());
    }
}
