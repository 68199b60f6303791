//! Session cookies and the cookie jar replayed on every request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

/// A single cookie with the attributes needed to replay it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Path attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Expiry as unix seconds; `None` for a session cookie
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    /// HttpOnly flag
    #[serde(default)]
    pub http_only: bool,
    /// Secure flag
    #[serde(default)]
    pub secure: bool,
}

impl Cookie {
    /// A session cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            http_only: false,
            secure: false,
        }
    }

    /// Whether the cookie has expired at unix time `now`.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// Unknown attributes are ignored. `Max-Age` wins over `Expires`.
    pub fn parse_set_cookie(header: &str, now: i64) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self::new(name, value.trim().trim_matches('"'));
        let mut max_age = None;
        for attribute in parts {
            let (key, val) = match attribute.split_once('=') {
                Some((key, val)) => (key.trim(), val.trim()),
                None => (attribute.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "domain" if !val.is_empty() => cookie.domain = Some(val.to_string()),
                "path" if !val.is_empty() => cookie.path = Some(val.to_string()),
                "expires" => cookie.expires = parse_http_date(val),
                "max-age" => max_age = val.parse::<i64>().ok(),
                "httponly" => cookie.http_only = true,
                "secure" => cookie.secure = true,
                _ => {}
            }
        }
        if let Some(seconds) = max_age {
            cookie.expires = Some(now.saturating_add(seconds));
        }
        Some(cookie)
    }
}

/// `Thu, 01 Jan 2037 00:00:00 GMT` to unix seconds.
pub(crate) fn parse_http_date(value: &str) -> Option<i64> {
    let normalized = match value.strip_suffix("GMT") {
        Some(rest) => format!("{rest}+0000"),
        None => value.to_string(),
    };
    OffsetDateTime::parse(&normalized, &Rfc2822)
        .ok()
        .map(|at| at.unix_timestamp())
}

/// The set of cookies that make up a session with the exchange.
///
/// Cookies are keyed by name, domain and path, so same-named cookies scoped
/// differently coexist. Serialized as a JSON array of cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Cookie>", into = "Vec<Cookie>")]
pub struct Session {
    cookies: BTreeMap<CookieKey, Cookie>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CookieKey {
    name: String,
    domain: Option<String>,
    path: Option<String>,
}

impl From<&Cookie> for CookieKey {
    fn from(cookie: &Cookie) -> Self {
        Self {
            name: cookie.name.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
        }
    }
}

impl Session {
    /// An empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the cookie with the same name, domain and path.
    pub fn insert(&mut self, cookie: Cookie) {
        self.cookies.insert(CookieKey::from(&cookie), cookie);
    }

    /// Look up a cookie by name, whatever its scope.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.iter().find(|cookie| cookie.name == name)
    }

    /// Iterate over all cookies.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Whether the session has no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Merge `cookies` into this session, replacing entries of the same scope.
    ///
    /// Returns `true` if anything changed.
    pub fn merge(&mut self, cookies: impl IntoIterator<Item = Cookie>) -> bool {
        let mut changed = false;
        for cookie in cookies {
            if self.cookies.get(&CookieKey::from(&cookie)) != Some(&cookie) {
                self.insert(cookie);
                changed = true;
            }
        }
        changed
    }

    /// Render the `Cookie` request header, skipping expired cookies.
    pub fn cookie_header(&self, now: i64) -> Option<String> {
        let header = self
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ");
        (!header.is_empty()).then_some(header)
    }
}

impl From<Vec<Cookie>> for Session {
    fn from(cookies: Vec<Cookie>) -> Self {
        cookies.into_iter().collect()
    }
}

impl From<Session> for Vec<Cookie> {
    fn from(session: Session) -> Self {
        session.cookies.into_values().collect()
    }
}

impl FromIterator<Cookie> for Session {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut session = Self::new();
        for cookie in iter {
            session.insert(cookie);
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let session: Session = vec![
            Cookie::new("cf_clearance", "abc"),
            Cookie::new("__cfduid", "xyz"),
        ]
        .into();

        assert_eq!(
            session.cookie_header(0).as_deref(),
            Some("__cfduid=xyz; cf_clearance=abc")
        );
        assert!(Session::new().cookie_header(0).is_none());
    }

    #[test]
    fn test_expired_cookies_are_not_sent() {
        let mut stale = Cookie::new("old", "1");
        stale.expires = Some(100);
        let session: Session = vec![stale, Cookie::new("fresh", "2")].into();

        assert_eq!(session.cookie_header(50).as_deref(), Some("fresh=2; old=1"));
        assert_eq!(session.cookie_header(100).as_deref(), Some("fresh=2"));
    }

    #[test]
    fn test_parse_set_cookie() {
        let cookie = Cookie::parse_set_cookie(
            "__cfduid=d41d8cd9; expires=Thu, 01 Jan 2037 00:00:00 GMT; path=/; domain=.yobit.net; HttpOnly; Secure",
            0,
        )
        .unwrap();

        assert_eq!(cookie.name, "__cfduid");
        assert_eq!(cookie.value, "d41d8cd9");
        assert_eq!(cookie.domain.as_deref(), Some(".yobit.net"));
        assert_eq!(cookie.path.as_deref(), Some("/"));
        assert_eq!(cookie.expires, Some(2_114_380_800));
        assert!(cookie.http_only);
        assert!(cookie.secure);
    }

    #[test]
    fn test_parse_set_cookie_max_age() {
        let cookie = Cookie::parse_set_cookie("a=b; Max-Age=60", 1_000).unwrap();
        assert_eq!(cookie.expires, Some(1_060));
        assert!(Cookie::parse_set_cookie("novalue", 0).is_none());
        assert!(Cookie::parse_set_cookie("=x", 0).is_none());
    }

    #[test]
    fn test_merge_reports_changes() {
        let mut session: Session = vec![Cookie::new("a", "1")].into();
        assert!(!session.merge(vec![Cookie::new("a", "1")]));
        assert!(session.merge(vec![Cookie::new("a", "2"), Cookie::new("b", "3")]));
        assert_eq!(session.len(), 2);
        assert_eq!(session.get("a").unwrap().value, "2");
    }

    #[test]
    fn test_same_name_different_scope_coexist() {
        let mut root = Cookie::new("__cfduid", "root");
        root.domain = Some(".yobit.net".to_string());
        root.path = Some("/".to_string());
        let mut api = root.clone();
        api.value = "api".to_string();
        api.path = Some("/api/".to_string());

        let mut session: Session = vec![root.clone(), api].into();
        assert_eq!(session.len(), 2);

        let mut refreshed = root;
        refreshed.value = "root2".to_string();
        assert!(session.merge(vec![refreshed]));
        assert_eq!(session.len(), 2);
        assert_eq!(
            session.cookie_header(0).as_deref(),
            Some("__cfduid=root2; __cfduid=api")
        );
    }

    #[test]
    fn test_json_shape() {
        let session: Session = vec![Cookie::new("a", "1")].into();
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"a","value":"1","http_only":false,"secure":false}]"#
        );
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
