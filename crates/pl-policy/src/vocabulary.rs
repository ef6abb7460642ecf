// vocabulary.rs - The canonical category enums and static term tables.
//
// Both the term classifier and the cookie auditor read from this module:
// risk terms are grouped by `RiskCategory`, and cookie disclosure terms are
// keyed by `CookieCategory`. Nothing here is mutable at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of privacy-risk language a term represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// What is collected and how (explicit input, tracking, identifiers).
    Collection,
    /// Who else receives the data and under which exceptions.
    Sharing,
    /// User controls: access, deletion, consent, opt-out.
    Rights,
    /// Storage safeguards and how long data is kept.
    Retention,
    /// Weasel words that leave the policy open-ended.
    Vague,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Collection,
        RiskCategory::Sharing,
        RiskCategory::Rights,
        RiskCategory::Retention,
        RiskCategory::Vague,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Collection => "collection",
            RiskCategory::Sharing => "sharing",
            RiskCategory::Rights => "rights",
            RiskCategory::Retention => "retention",
            RiskCategory::Vague => "vague",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collection" => Ok(RiskCategory::Collection),
            "sharing" => Ok(RiskCategory::Sharing),
            "rights" => Ok(RiskCategory::Rights),
            "retention" => Ok(RiskCategory::Retention),
            "vague" => Ok(RiskCategory::Vague),
            _ => Err(format!(
                "Invalid risk category: '{}'. Valid categories: collection, sharing, rights, retention, vague",
                s
            )),
        }
    }
}

/// How alarming a finding is. Ordered so that `High` is the greatest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Purpose of a cookie. Shared by cookie classification and the policy
/// disclosure check, so the two can never disagree on what "analytics" means.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CookieCategory {
    /// Session, CSRF, and authentication cookies the site cannot work without.
    Essential,
    /// Preferences such as language or theme.
    Functional,
    Analytics,
    Advertising,
    Unknown,
}

impl CookieCategory {
    pub const ALL: [CookieCategory; 5] = [
        CookieCategory::Essential,
        CookieCategory::Functional,
        CookieCategory::Analytics,
        CookieCategory::Advertising,
        CookieCategory::Unknown,
    ];

    /// Categories whose presence must be disclosed by the policy.
    pub fn is_non_essential(self) -> bool {
        matches!(
            self,
            CookieCategory::Functional | CookieCategory::Analytics | CookieCategory::Advertising
        )
    }

    /// Analytics and advertising cookies, which need consent before loading.
    pub fn is_tracking(self) -> bool {
        matches!(self, CookieCategory::Analytics | CookieCategory::Advertising)
    }

    /// Policy phrases that count as disclosing this category.
    pub fn disclosure_terms(self) -> &'static [&'static str] {
        match self {
            CookieCategory::Essential => &[
                "strictly necessary",
                "essential cookies",
                "authentication",
                "session cookies",
            ],
            CookieCategory::Functional => &[
                "preferences",
                "functional cookies",
                "site settings",
                "language settings",
            ],
            CookieCategory::Analytics => &[
                "analytics",
                "measurement",
                "google analytics",
                "mixpanel",
                "amplitude",
                "segment",
            ],
            CookieCategory::Advertising => &[
                "advertising",
                "ad network",
                "targeted ads",
                "remarketing",
                "doubleclick",
                "facebook pixel",
            ],
            CookieCategory::Unknown => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CookieCategory::Essential => "essential",
            CookieCategory::Functional => "functional",
            CookieCategory::Analytics => "analytics",
            CookieCategory::Advertising => "advertising",
            CookieCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CookieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phrases that indicate the policy offers an opt-out or "do not sell" control.
pub const OPT_OUT_TERMS: &[&str] = &["opt-out", "opt out", "do not sell"];

/// A named group of literal terms sharing a category, subgroup, and severity.
#[derive(Debug, Clone, Copy)]
pub struct TermGroup {
    pub category: RiskCategory,
    pub subgroup: &'static str,
    pub severity: Severity,
    pub literals: &'static [&'static str],
}

/// One risk term, flattened out of its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskTerm {
    pub category: RiskCategory,
    pub subgroup: &'static str,
    pub literal: &'static str,
    pub severity: Severity,
}

/// The static risk term table, in classification order.
pub const TERM_GROUPS: &[TermGroup] = &[
    TermGroup {
        category: RiskCategory::Collection,
        subgroup: "Explicit Data",
        severity: Severity::Medium,
        literals: &[
            "collect",
            "gather",
            "provided by you",
            "registration",
            "account creation",
        ],
    },
    TermGroup {
        category: RiskCategory::Collection,
        subgroup: "Automated Tracking",
        severity: Severity::Medium,
        literals: &[
            "automatically collect",
            "tracking technologies",
            "cookies",
            "web beacons",
            "pixel tags",
            "Local Shared Objects",
        ],
    },
    TermGroup {
        category: RiskCategory::Collection,
        subgroup: "High-Risk Identifiers",
        severity: Severity::High,
        literals: &[
            "IP address",
            "device identifier",
            "geolocation",
            "biometric data",
            "browsing history",
            "SSN",
            "government-issued ID",
        ],
    },
    TermGroup {
        category: RiskCategory::Sharing,
        subgroup: "Entities",
        severity: Severity::High,
        literals: &[
            "third party",
            "third parties",
            "affiliates",
            "service providers",
            "subsidiaries",
            "business partners",
            "advertising networks",
            "data broker",
        ],
    },
    TermGroup {
        category: RiskCategory::Sharing,
        subgroup: "Actions",
        severity: Severity::High,
        literals: &["share", "don't currently sell", "sell", "disclose", "transfer"],
    },
    TermGroup {
        category: RiskCategory::Sharing,
        subgroup: "Exceptions",
        severity: Severity::High,
        literals: &[
            "business transfers",
            "legal requirements",
            "law enforcement",
            "subpoena",
            "merger",
            "bankruptcy",
        ],
    },
    TermGroup {
        category: RiskCategory::Rights,
        subgroup: "Access & Deletion",
        severity: Severity::Medium,
        literals: &[
            "right to access",
            "right to be forgotten",
            "request deletion",
            "rectify",
            "update your information",
        ],
    },
    TermGroup {
        category: RiskCategory::Rights,
        subgroup: "Consent Mechanisms",
        severity: Severity::Medium,
        literals: &[
            "opt-out",
            "withdraw consent",
            "unsubscribe",
            "Do Not Sell or Share My Personal Information",
            "privacy choices",
        ],
    },
    TermGroup {
        category: RiskCategory::Retention,
        subgroup: "Security Standards",
        severity: Severity::Medium,
        literals: &[
            "encryption",
            "Secure Socket Layer (SSL)",
            "anonymize",
            "pseudonymization",
            "safeguards",
        ],
    },
    TermGroup {
        category: RiskCategory::Retention,
        subgroup: "Timelines",
        severity: Severity::Low,
        literals: &[
            "retain",
            "retention period",
            "as long as necessary",
            "delete after",
        ],
    },
    TermGroup {
        category: RiskCategory::Vague,
        subgroup: "Vague Qualifiers",
        severity: Severity::High,
        literals: &["may include", "might collect", "possibly", "could"],
    },
    TermGroup {
        category: RiskCategory::Vague,
        subgroup: "Open-Ended Lists",
        severity: Severity::High,
        literals: &["such as", "including, but not limited to"],
    },
    TermGroup {
        category: RiskCategory::Vague,
        subgroup: "Conditional Promises",
        severity: Severity::High,
        literals: &[
            "commercially reasonable",
            "generally",
            "as applicable",
            "as needed",
        ],
    },
];

/// Every risk term in table order.
pub fn risk_terms() -> impl Iterator<Item = RiskTerm> {
    TERM_GROUPS.iter().flat_map(|group| {
        group.literals.iter().map(move |&literal| RiskTerm {
            category: group.category,
            subgroup: group.subgroup,
            literal,
            severity: group.severity,
        })
    })
}
