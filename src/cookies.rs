//! Session-cookie loading.
//!
//! The cookie file is a JSON array of descriptors in the shape browser
//! devtools and automation tools export: name, value, domain, path, plus
//! optional expiry and flags. A missing file means a guest run; anything
//! else wrong with the file, including an unrecognized `sameSite` value,
//! is an error.

use anyhow::{bail, Context, Result};
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One cookie descriptor as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Unix timestamp in seconds. Negative or absent means a session cookie.
    #[serde(default)]
    pub expires: Option<f64>,
    #[serde(default, rename = "httpOnly")]
    pub http_only: Option<bool>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default, rename = "sameSite")]
    pub same_site: Option<String>,
}

/// Read the cookie file at `path`.
///
/// Returns `Ok(None)` only when the file does not exist; an unreadable or
/// malformed file propagates as an error.
pub fn load_cookie_file(path: &Path) -> Result<Option<Vec<StoredCookie>>> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let cookies: Vec<StoredCookie> = serde_json::from_str(&data)
        .with_context(|| format!("malformed cookie file {}", path.display()))?;
    Ok(Some(cookies))
}

/// Convert stored descriptors into CDP cookie parameters.
pub fn to_cookie_params(cookies: &[StoredCookie]) -> Result<Vec<CookieParam>> {
    cookies.iter().map(cookie_param).collect()
}

fn cookie_param(cookie: &StoredCookie) -> Result<CookieParam> {
    let mut builder = CookieParam::builder()
        .name(cookie.name.clone())
        .value(cookie.value.clone());
    if let Some(domain) = &cookie.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(path) = &cookie.path {
        builder = builder.path(path.clone());
    }
    if let Some(expires) = cookie.expires {
        // Session cookies are commonly exported with expires: -1
        if expires >= 0.0 {
            builder = builder.expires(TimeSinceEpoch::new(expires));
        }
    }
    if let Some(http_only) = cookie.http_only {
        builder = builder.http_only(http_only);
    }
    if let Some(secure) = cookie.secure {
        builder = builder.secure(secure);
    }
    if let Some(same_site) = cookie.same_site.as_deref() {
        let same_site = same_site_from_str(same_site)
            .with_context(|| format!("cookie {:?}", cookie.name))?;
        builder = builder.same_site(same_site);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("invalid cookie {:?}: {e}", cookie.name))
}

fn same_site_from_str(value: &str) -> Result<CookieSameSite> {
    match value {
        "Strict" | "strict" => Ok(CookieSameSite::Strict),
        "Lax" | "lax" => Ok(CookieSameSite::Lax),
        "None" | "none" => Ok(CookieSameSite::None),
        other => bail!("unrecognized sameSite value {other:?}, expected Strict, Lax or None"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXPORTED: &str = r#"[
        {
            "name": "web_session",
            "value": "abc123",
            "domain": ".xiaohongshu.com",
            "path": "/",
            "expires": 1767225600.5,
            "httpOnly": true,
            "secure": true,
            "sameSite": "Lax"
        },
        {
            "name": "visitor",
            "value": "v1",
            "domain": ".xiaohongshu.com",
            "path": "/",
            "expires": -1
        }
    ]"#;

    #[test]
    fn test_load_missing_file_is_none() {
        let result = load_cookie_file(Path::new("does-not-exist/cookies.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(load_cookie_file(file.path()).is_err());
    }

    #[test]
    fn test_load_exported_cookies() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXPORTED.as_bytes()).unwrap();
        let cookies = load_cookie_file(file.path()).unwrap().unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "web_session");
        assert_eq!(cookies[0].http_only, Some(true));
        assert_eq!(cookies[1].expires, Some(-1.0));
        assert!(cookies[1].same_site.is_none());
    }

    #[test]
    fn test_cookie_params_carry_fields() {
        let cookies: Vec<StoredCookie> = serde_json::from_str(EXPORTED).unwrap();
        let params = to_cookie_params(&cookies).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "web_session");
        assert_eq!(params[0].value, "abc123");
        assert_eq!(params[0].domain.as_deref(), Some(".xiaohongshu.com"));
        assert!(params[0].expires.is_some());
        assert!(matches!(params[0].same_site, Some(CookieSameSite::Lax)));
    }

    #[test]
    fn test_session_cookie_expiry_is_dropped() {
        let cookies: Vec<StoredCookie> = serde_json::from_str(EXPORTED).unwrap();
        let params = to_cookie_params(&cookies).unwrap();
        assert!(params[1].expires.is_none());
    }

    #[test]
    fn test_unknown_same_site_is_rejected() {
        let cookie = StoredCookie {
            name: "a".to_string(),
            value: "b".to_string(),
            domain: None,
            path: None,
            expires: None,
            http_only: None,
            secure: None,
            same_site: Some("Sideways".to_string()),
        };
        let err = to_cookie_params(std::slice::from_ref(&cookie)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Sideways"), "error should name the value: {chain}");
        assert!(chain.contains("\"a\""), "error should name the cookie: {chain}");
    }

    #[test]
    fn test_lowercase_same_site_is_accepted() {
        let cookie = StoredCookie {
            name: "a".to_string(),
            value: "b".to_string(),
            domain: None,
            path: None,
            expires: None,
            http_only: None,
            secure: None,
            same_site: Some("strict".to_string()),
        };
        let params = to_cookie_params(std::slice::from_ref(&cookie)).unwrap();
        assert!(matches!(params[0].same_site, Some(CookieSameSite::Strict)));
    }
}
