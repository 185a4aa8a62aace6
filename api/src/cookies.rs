//! Cookie transport for the session's token pair
//!
//! Both tokens travel as HTTP-only, strict same-site cookies. Clearing a
//! cookie sends an immediately expiring cookie with the same name and path.

use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use chrono::Duration;

use parley_core::TokenPair;
use parley_shared::config::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use parley_shared::config::CookieConfig;

/// Builds and reads the access and refresh cookies
#[derive(Debug, Clone)]
pub struct AuthCookies {
    config: CookieConfig,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthCookies {
    /// Cookie lifetimes follow the lifetimes of the tokens they carry
    pub fn new(config: CookieConfig, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            config,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access(&self, token: &str) -> Cookie<'static> {
        self.build(ACCESS_TOKEN_COOKIE, token.to_string(), self.access_ttl)
    }

    pub fn refresh(&self, token: &str) -> Cookie<'static> {
        self.build(REFRESH_TOKEN_COOKIE, token.to_string(), self.refresh_ttl)
    }

    /// Both cookies of a freshly issued or rotated pair
    pub fn issue(&self, pair: &TokenPair) -> [Cookie<'static>; 2] {
        [self.access(&pair.access_token), self.refresh(&pair.refresh_token)]
    }

    /// Removal cookies for both tokens
    pub fn clear(&self) -> [Cookie<'static>; 2] {
        [
            self.removal(ACCESS_TOKEN_COOKIE),
            self.removal(REFRESH_TOKEN_COOKIE),
        ]
    }

    /// Attach both cookies of `pair` to a response under construction
    pub fn set_pair(&self, response: &mut HttpResponseBuilder, pair: &TokenPair) {
        for cookie in self.issue(pair) {
            response.cookie(cookie);
        }
    }

    pub fn clear_all(&self, response: &mut HttpResponseBuilder) {
        for cookie in self.clear() {
            response.cookie(cookie);
        }
    }

    pub fn read_access(request: &HttpRequest) -> Option<String> {
        read(request, ACCESS_TOKEN_COOKIE)
    }

    pub fn read_refresh(request: &HttpRequest) -> Option<String> {
        read(request, REFRESH_TOKEN_COOKIE)
    }

    fn build(&self, name: &'static str, value: String, ttl: Duration) -> Cookie<'static> {
        Cookie::build(name, value)
            .path(self.config.path.clone())
            .http_only(true)
            .secure(self.config.secure)
            .same_site(SameSite::Strict)
            .max_age(time::Duration::seconds(ttl.num_seconds()))
            .finish()
    }

    fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new(), Duration::zero());
        cookie.make_removal();
        cookie
    }
}

/// Non-empty cookie value by name
pub(crate) fn read(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .cookie(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use uuid::Uuid;

    fn cookies(secure: bool) -> AuthCookies {
        AuthCookies::new(
            CookieConfig {
                secure,
                ..CookieConfig::default()
            },
            Duration::minutes(15),
            Duration::days(7),
        )
    }

    #[test]
    fn test_access_cookie_attributes() {
        let cookie = cookies(false).access("token-value");

        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(15)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_refresh_cookie_uses_refresh_lifetime() {
        let cookie = cookies(true).refresh("refresh-value");

        assert_eq!(cookie.name(), REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_issue_sets_both_tokens() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            session_id: Uuid::new_v4(),
        };

        let [access, refresh] = cookies(false).issue(&pair);
        assert_eq!((access.name(), access.value()), (ACCESS_TOKEN_COOKIE, "a"));
        assert_eq!((refresh.name(), refresh.value()), (REFRESH_TOKEN_COOKIE, "r"));
    }

    #[test]
    fn test_clear_expires_immediately() {
        for cookie in cookies(false).clear() {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        }
    }

    #[test]
    fn test_read_ignores_empty_values() {
        let request = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "abc"))
            .cookie(Cookie::new(REFRESH_TOKEN_COOKIE, ""))
            .to_http_request();

        assert_eq!(AuthCookies::read_access(&request).as_deref(), Some("abc"));
        assert_eq!(AuthCookies::read_refresh(&request), None);
    }
}
