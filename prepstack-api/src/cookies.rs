/// Token cookie handling
///
/// Both tokens travel as cookies: `accessToken` (short-lived) and
/// `refreshToken` (long-lived). Cookies are HttpOnly always; in production
/// they additionally get `Secure` and `SameSite=Strict`, in development
/// `SameSite=Lax` so local cross-port frontends work.
///
/// The auth middleware also accepts `Authorization: Bearer` for the access
/// token, but refresh is cookie-only.

use axum::http::{header, HeaderMap, HeaderValue};
use prepstack_shared::auth::tokens::TokenPair;

/// Access token cookie name
pub const ACCESS_COOKIE: &str = "accessToken";

/// Refresh token cookie name
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Builds a Set-Cookie value for a token cookie
fn build_cookie(name: &str, value: &str, max_age_secs: i64, production: bool) -> String {
    let mut cookie = format!("{}={}; HttpOnly; Path=/; Max-Age={}", name, value, max_age_secs);

    if production {
        cookie.push_str("; Secure; SameSite=Strict");
    } else {
        cookie.push_str("; SameSite=Lax");
    }

    cookie
}

/// Builds an expired Set-Cookie value that removes the cookie
fn build_clear_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", name)
}

/// Extracts a cookie value from request headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;

            if key == name {
                Some(value.to_string())
            } else {
                None
            }
        })
}

/// Extracts a bearer token from the Authorization header
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

fn header_value(cookie: String) -> HeaderValue {
    // Cookie strings are built from token material and constants; tokens are
    // base64url so this cannot fail.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Appends Set-Cookie headers for a freshly issued token pair
pub fn set_token_cookies(
    headers: &mut HeaderMap,
    pair: &TokenPair,
    access_max_age_secs: i64,
    refresh_max_age_secs: i64,
    production: bool,
) {
    headers.append(
        header::SET_COOKIE,
        header_value(build_cookie(
            ACCESS_COOKIE,
            &pair.access_token,
            access_max_age_secs,
            production,
        )),
    );
    headers.append(
        header::SET_COOKIE,
        header_value(build_cookie(
            REFRESH_COOKIE,
            &pair.refresh_token,
            refresh_max_age_secs,
            production,
        )),
    );
}

/// Appends Set-Cookie headers that clear both token cookies (logout)
pub fn clear_token_cookies(headers: &mut HeaderMap) {
    headers.append(
        header::SET_COOKIE,
        header_value(build_clear_cookie(ACCESS_COOKIE)),
    );
    headers.append(
        header::SET_COOKIE,
        header_value(build_clear_cookie(REFRESH_COOKIE)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_cookie_development() {
        let cookie = build_cookie(ACCESS_COOKIE, "tok", 900, false);

        assert!(cookie.starts_with("accessToken=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=900"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_cookie_production() {
        let cookie = build_cookie(REFRESH_COOKIE, "tok", 604800, true);

        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = build_clear_cookie(ACCESS_COOKIE);
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; accessToken=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, ACCESS_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, REFRESH_COOKIE), None);
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer my-token"),
        );

        assert_eq!(extract_bearer(&headers), Some("my-token".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_set_token_cookies_appends_both() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };

        let mut headers = HeaderMap::new();
        set_token_cookies(&mut headers, &pair, 900, 604800, false);

        let cookies: Vec<_> = headers.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
    }
}
