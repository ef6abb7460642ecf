// collector.rs - The cookie collector boundary.
//
// Real browser automation lives outside this workspace. What it must hand
// back is a `CookieCollection`: cookies already normalized to the
// `ObservedCookie` shape, plus the consent state they were captured in.
// Two local collectors are provided: one reads a browser automation export
// from disk, the other wraps a pasted `name=value` list.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cookie::{normalize, ConsentState, ObservedCookie, SameSite};
use crate::error::CollectError;

/// Cookies observed for one site in one consent state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieCollection {
    pub site: String,
    pub consent_state: ConsentState,
    pub cookies: Vec<ObservedCookie>,
    /// False when only cookie names were captured (pasted lists), so
    /// Secure/HttpOnly/SameSite flags carry no information.
    #[serde(default = "default_attributes_known")]
    pub attributes_known: bool,
}

fn default_attributes_known() -> bool {
    true
}

/// Source of observed cookies for a site.
///
/// Implementations return `Err` when they could not observe the site;
/// `Ok` with an empty list means the site genuinely set no cookies.
pub trait CookieCollector {
    fn collect(&self, site: &str) -> Result<CookieCollection, CollectError>;

    /// Collector name (for logging/debugging).
    fn name(&self) -> &str;
}

/// One cookie in a browser automation export (Playwright / Puppeteer /
/// CDP `Network.getAllCookies` shape).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportedCookie {
    name: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    path: String,
    /// Unix seconds; -1 (or absent) for session cookies.
    #[serde(default)]
    expires: Option<f64>,
    #[serde(default)]
    http_only: bool,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    same_site: Option<String>,
}

/// Either a bare cookie array or a storage-state object with a `cookies` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExportFile {
    Bare(Vec<ExportedCookie>),
    State { cookies: Vec<ExportedCookie> },
}

impl ExportedCookie {
    fn into_observed(self, fallback_domain: &str) -> ObservedCookie {
        let domain = if self.domain.trim().is_empty() {
            fallback_domain.to_string()
        } else {
            self.domain
        };
        let same_site = match self.same_site.as_deref() {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(cookie = %self.name, "{}; treating as unspecified", e);
                SameSite::Unspecified
            }),
            None => SameSite::Unspecified,
        };
        ObservedCookie {
            name: self.name,
            domain,
            path: self.path,
            expires: self.expires.and_then(expiry_from_unix),
            secure: self.secure,
            http_only: self.http_only,
            same_site,
            category: None,
        }
    }
}

fn expiry_from_unix(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(seconds.trunc() as i64, 0)
}

/// Parse a browser automation cookie export from a JSON string.
pub fn parse_export(json: &str, site: &str) -> Result<Vec<ObservedCookie>, serde_json::Error> {
    let file: ExportFile = serde_json::from_str(json)?;
    let exported = match file {
        ExportFile::Bare(cookies) => cookies,
        ExportFile::State { cookies } => cookies,
    };
    let fallback = crate::classify::normalize_host(site);
    Ok(normalize(
        exported
            .into_iter()
            .map(|c| c.into_observed(&fallback))
            .collect(),
    ))
}

/// Reads cookies from a JSON export written by an external browser run.
pub struct JsonExportCollector {
    path: PathBuf,
    consent_state: ConsentState,
}

impl JsonExportCollector {
    pub fn new(path: impl Into<PathBuf>, consent_state: ConsentState) -> Self {
        Self {
            path: path.into(),
            consent_state,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CookieCollector for JsonExportCollector {
    fn collect(&self, site: &str) -> Result<CookieCollection, CollectError> {
        let data = fs::read_to_string(&self.path).map_err(|source| CollectError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        let cookies = parse_export(&data, site).map_err(|source| CollectError::MalformedExport {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            "JsonExportCollector: {} cookie(s) from {}",
            cookies.len(),
            self.path.display()
        );
        Ok(CookieCollection {
            site: site.to_string(),
            consent_state: self.consent_state,
            cookies,
            attributes_known: true,
        })
    }

    fn name(&self) -> &str {
        "json-export"
    }
}

/// Parse a pasted cookie list into name-only cookies scoped to `site`.
///
/// Entries are split on newlines, commas, and semicolons; anything after
/// `=` is a value and is discarded. Names are deduplicated and sorted
/// case-insensitively.
pub fn parse_cookie_list(raw: &str, site: &str) -> Vec<ObservedCookie> {
    let domain = crate::classify::normalize_host(site);
    let mut names: Vec<&str> = raw
        .split(['\n', ',', ';'])
        .map(|token| token.split_once('=').map_or(token, |(name, _)| name).trim())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    names.dedup();
    normalize(
        names
            .into_iter()
            .map(|name| ObservedCookie::new(name, domain.clone()))
            .collect(),
    )
}

/// Wraps a pasted cookie list (for example a copied `Cookie:` header).
pub struct RawListCollector {
    raw: String,
    consent_state: ConsentState,
}

impl RawListCollector {
    pub fn new(raw: impl Into<String>, consent_state: ConsentState) -> Self {
        Self {
            raw: raw.into(),
            consent_state,
        }
    }
}

impl CookieCollector for RawListCollector {
    fn collect(&self, site: &str) -> Result<CookieCollection, CollectError> {
        let cookies = parse_cookie_list(&self.raw, site);
        tracing::debug!("RawListCollector: {} cookie name(s)", cookies.len());
        Ok(CookieCollection {
            site: site.to_string(),
            consent_state: self.consent_state,
            cookies,
            attributes_known: false,
        })
    }

    fn name(&self) -> &str {
        "raw-list"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXPORT: &str = r#"[
        {"name": "_ga", "value": "GA1.2.3", "domain": ".example.com", "path": "/",
         "expires": 1790000000.5, "httpOnly": false, "secure": true, "sameSite": "Lax"},
        {"name": "IDE", "value": "x", "domain": ".doubleclick.net", "path": "/",
         "expires": -1, "httpOnly": true, "secure": true, "sameSite": "None"},
        {"name": "_ga", "value": "dup", "domain": "example.com", "path": "/"}
    ]"#;

    #[test]
    fn parses_bare_export_and_dedups() {
        let cookies = parse_export(EXPORT, "https://example.com").unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "_ga");
        assert_eq!(cookies[0].domain, "example.com");
        assert_eq!(cookies[0].same_site, SameSite::Lax);
        assert_eq!(
            cookies[0].expires.unwrap().timestamp(),
            1_790_000_000
        );
        assert!(cookies[1].is_session());
        assert_eq!(cookies[1].same_site, SameSite::None);
        assert!(cookies[1].http_only);
    }

    #[test]
    fn parses_storage_state_export() {
        let json = r#"{"cookies": [{"name": "sid", "domain": "", "path": ""}], "origins": []}"#;
        let cookies = parse_export(json, "https://www.shop.example").unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].domain, "shop.example");
        assert_eq!(cookies[0].path, "/");
    }

    #[test]
    fn unknown_same_site_is_unspecified() {
        let json = r#"[{"name": "a", "domain": "x.com", "sameSite": "weird"}]"#;
        let cookies = parse_export(json, "x.com").unwrap();
        assert_eq!(cookies[0].same_site, SameSite::Unspecified);
    }

    #[test]
    fn json_collector_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let collector = JsonExportCollector::new(file.path(), ConsentState::BeforeConsent);
        let collection = collector.collect("example.com").unwrap();
        assert_eq!(collection.cookies.len(), 2);
        assert_eq!(collection.consent_state, ConsentState::BeforeConsent);
        assert_eq!(collection.site, "example.com");
        assert_eq!(collector.name(), "json-export");
    }

    #[test]
    fn missing_file_is_a_collection_failure() {
        let collector =
            JsonExportCollector::new("/nonexistent/cookies.json", ConsentState::Unknown);
        match collector.collect("example.com") {
            Err(CollectError::ReadFailed { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/cookies.json"))
            }
            other => panic!("expected ReadFailed, got {:?}", other),
        }
    }

    #[test]
    fn malformed_file_is_a_collection_failure() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"cookies\"}").unwrap();
        let collector = JsonExportCollector::new(file.path(), ConsentState::Unknown);
        assert!(matches!(
            collector.collect("example.com"),
            Err(CollectError::MalformedExport { .. })
        ));
    }

    #[test]
    fn empty_export_is_not_a_failure() {
        let cookies = parse_export("[]", "example.com").unwrap();
        assert!(cookies.is_empty());
    }

    #[test]
    fn parses_pasted_cookie_list() {
        let raw = "_ga=GA1.2; _fbp=fb.1\nsessionid=abc, lang=en;_ga=again\n\n";
        let cookies = parse_cookie_list(raw, "https://www.example.com/");
        let names: Vec<&str> = cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["_fbp", "_ga", "lang", "sessionid"]);
        assert!(cookies.iter().all(|c| c.domain == "example.com"));
    }

    #[test]
    fn raw_list_collector_never_fails() {
        let collector = RawListCollector::new("", ConsentState::AfterAccept);
        let collection = collector.collect("example.com").unwrap();
        assert!(collection.cookies.is_empty());
        assert_eq!(collection.consent_state, ConsentState::AfterAccept);
        assert!(!collection.attributes_known);
    }
}
