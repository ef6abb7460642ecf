// cookie.rs - The normalized cookie shape handed to the auditor.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use pl_policy::CookieCategory;
use serde::{Deserialize, Serialize};

/// The cookie's SameSite attribute.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    Strict,
    Lax,
    None,
    /// Attribute not set; browsers treat this as Lax.
    #[default]
    Unspecified,
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" | "no_restriction" => Ok(SameSite::None),
            "" | "unspecified" => Ok(SameSite::Unspecified),
            _ => Err(format!(
                "Invalid SameSite value: '{}'. Valid values: strict, lax, none",
                s
            )),
        }
    }
}

/// Where in the consent flow the cookies were captured.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConsentState {
    /// Page loaded, banner not yet answered.
    BeforeConsent,
    AfterAccept,
    AfterReject,
    #[default]
    Unknown,
}

impl ConsentState {
    /// States in which tracking cookies should not be present at all.
    pub fn forbids_tracking(self) -> bool {
        matches!(self, ConsentState::BeforeConsent | ConsentState::AfterReject)
    }
}

impl FromStr for ConsentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "before_consent" | "before" => Ok(ConsentState::BeforeConsent),
            "after_accept" | "accepted" => Ok(ConsentState::AfterAccept),
            "after_reject" | "rejected" => Ok(ConsentState::AfterReject),
            "unknown" => Ok(ConsentState::Unknown),
            _ => Err(format!(
                "Invalid consent state: '{}'. Valid states: before_consent, after_accept, after_reject, unknown",
                s
            )),
        }
    }
}

impl fmt::Display for ConsentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsentState::BeforeConsent => write!(f, "before_consent"),
            ConsentState::AfterAccept => write!(f, "after_accept"),
            ConsentState::AfterReject => write!(f, "after_reject"),
            ConsentState::Unknown => write!(f, "unknown"),
        }
    }
}

/// A cookie observed in the browser for the audited site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObservedCookie {
    pub name: String,
    /// Domain the cookie is scoped to, without a leading dot.
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Absolute expiry. `None` means a session cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub same_site: SameSite,
    /// Category assigned upstream; when absent the auditor classifies it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CookieCategory>,
}

fn default_path() -> String {
    "/".to_string()
}

impl ObservedCookie {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            path: default_path(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            category: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_expiry(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn with_category(mut self, category: CookieCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// True for cookies that end with the browser session.
    pub fn is_session(&self) -> bool {
        self.expires.is_none()
    }
}

/// Normalize and deduplicate a raw cookie list.
///
/// Names are trimmed, domains lowercased without a leading dot, empty paths
/// become `/`. Cookies without a name are dropped. Duplicates by
/// (name, domain, path) keep their first occurrence.
pub fn normalize(cookies: Vec<ObservedCookie>) -> Vec<ObservedCookie> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut out = Vec::with_capacity(cookies.len());
    for mut cookie in cookies {
        cookie.name = cookie.name.trim().to_string();
        if cookie.name.is_empty() {
            tracing::warn!(domain = %cookie.domain, "dropping cookie without a name");
            continue;
        }
        cookie.domain = cookie
            .domain
            .trim()
            .trim_start_matches('.')
            .to_lowercase();
        if cookie.path.trim().is_empty() {
            cookie.path = default_path();
        }
        let key = (cookie.name.clone(), cookie.domain.clone(), cookie.path.clone());
        if seen.insert(key) {
            out.push(cookie);
        }
    }
    out
}
