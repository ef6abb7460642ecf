// classify.rs - Cookie category and first/third-party heuristics.
//
// Name patterns are tried in a fixed order (analytics, advertising,
// essential, functional) and the first hit wins. Cookies whose names say
// nothing are then matched on well-known tracker domains.

use std::sync::LazyLock;

use pl_policy::CookieCategory;
use regex::Regex;

const NAME_PATTERNS: &[(CookieCategory, &[&str])] = &[
    (
        CookieCategory::Analytics,
        &[
            r"^_ga($|_)",
            r"^_gid$",
            r"^_gat",
            r"analytics",
            r"mixpanel",
            r"amplitude",
            r"segment",
            r"^ajs_",
            r"^_hj",
            r"^_pk_",
            r"^_clck$",
            r"^_clsk$",
        ],
    ),
    (
        CookieCategory::Advertising,
        &[
            r"^_fbp$",
            r"^_fbc$",
            r"doubleclick",
            r"(^|[_.\-])ads?($|[_.\-])",
            r"^_{1,2}gads$",
            r"^_{1,2}gpi$",
            r"gcl_au",
            r"^_gcl_",
            r"ttclid",
            r"^_ttp$",
            r"criteo",
            r"^ide$",
            r"^test_cookie$",
            r"^_uet",
            r"^muid$",
        ],
    ),
    (
        CookieCategory::Essential,
        &[
            r"session",
            r"sess",
            r"csrf",
            r"xsrf",
            r"auth",
            r"token",
            r"consent",
            r"^__cf_bm$",
            r"^cf_clearance$",
        ],
    ),
    (
        CookieCategory::Functional,
        &[r"pref", r"lang", r"locale", r"theme", r"remember"],
    ),
];

const TRACKER_DOMAINS: &[(CookieCategory, &[&str])] = &[
    (
        CookieCategory::Analytics,
        &[
            "google-analytics.com",
            "hotjar.com",
            "mixpanel.com",
            "amplitude.com",
            "segment.io",
            "clarity.ms",
        ],
    ),
    (
        CookieCategory::Advertising,
        &[
            "doubleclick.net",
            "facebook.com",
            "facebook.net",
            "criteo.com",
            "criteo.net",
            "adnxs.com",
            "adsrvr.org",
            "tiktok.com",
            "bing.com",
            "ads.linkedin.com",
            "taboola.com",
            "outbrain.com",
        ],
    ),
];

static COMPILED_NAME_PATTERNS: LazyLock<Vec<(CookieCategory, Vec<Regex>)>> = LazyLock::new(|| {
    NAME_PATTERNS
        .iter()
        .map(|(category, patterns)| {
            let regexes = patterns
                .iter()
                .filter_map(|p| match Regex::new(p) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!(pattern = p, error = %e, "cookie pattern failed to compile");
                        None
                    }
                })
                .collect();
            (*category, regexes)
        })
        .collect()
});

/// Categorize a cookie from its name and domain.
pub fn classify_cookie(name: &str, domain: &str) -> CookieCategory {
    let lower = name.to_lowercase();
    for (category, regexes) in COMPILED_NAME_PATTERNS.iter() {
        if regexes.iter().any(|re| re.is_match(&lower)) {
            return *category;
        }
    }

    let domain = normalize_host(domain);
    for (category, domains) in TRACKER_DOMAINS {
        if domains.iter().any(|d| domain_matches(&domain, d)) {
            return *category;
        }
    }
    CookieCategory::Unknown
}

/// Reduce a site URL or cookie domain to a bare lowercase host:
/// no scheme, port, path, leading dot, or `www.` prefix.
pub fn normalize_host(input: &str) -> String {
    let mut host = input.trim();
    if let Some(pos) = host.find("://") {
        host = &host[pos + 3..];
    }
    if let Some(pos) = host.find(|c: char| matches!(c, '/' | '?' | '#')) {
        host = &host[..pos];
    }
    if let Some(pos) = host.rfind(':') {
        host = &host[..pos];
    }
    let host = host.trim_start_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// `host` equals `domain` or is one of its subdomains.
fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// A cookie is first-party when its domain is the site, a subdomain of it,
/// or a parent domain of it.
pub fn is_third_party(cookie_domain: &str, site: &str) -> bool {
    let cookie = normalize_host(cookie_domain);
    let site = normalize_host(site);
    if cookie.is_empty() || site.is_empty() {
        return false;
    }
    !(domain_matches(&cookie, &site) || domain_matches(&site, &cookie))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_names() {
        for name in ["_ga", "_ga_ABC123", "_gid", "_gat_UA-1", "_hjSessionUser_1", "ajs_user_id"] {
            assert_eq!(
                classify_cookie(name, "example.com"),
                CookieCategory::Analytics,
                "{}",
                name
            );
        }
    }

    #[test]
    fn advertising_names() {
        for name in ["_fbp", "IDE", "_gcl_au", "__gads", "criteo_uid", "ads_prefs", "_uetsid"] {
            assert_eq!(
                classify_cookie(name, "example.com"),
                CookieCategory::Advertising,
                "{}",
                name
            );
        }
    }

    #[test]
    fn ad_inside_a_word_is_not_advertising() {
        assert_eq!(classify_cookie("loaded", "example.com"), CookieCategory::Unknown);
        assert_eq!(classify_cookie("header_v2", "example.com"), CookieCategory::Unknown);
    }

    #[test]
    fn essential_and_functional_names() {
        assert_eq!(classify_cookie("PHPSESSID", "example.com"), CookieCategory::Essential);
        assert_eq!(classify_cookie("csrftoken", "example.com"), CookieCategory::Essential);
        assert_eq!(classify_cookie("OptanonConsent", "example.com"), CookieCategory::Essential);
        assert_eq!(classify_cookie("lang", "example.com"), CookieCategory::Functional);
        assert_eq!(classify_cookie("ui_theme", "example.com"), CookieCategory::Functional);
    }

    #[test]
    fn tracker_domain_fallback() {
        assert_eq!(classify_cookie("fr", ".facebook.com"), CookieCategory::Advertising);
        assert_eq!(classify_cookie("uid", "px.ads.linkedin.com"), CookieCategory::Advertising);
        assert_eq!(classify_cookie("x", "www.hotjar.com"), CookieCategory::Analytics);
        assert_eq!(classify_cookie("x", "notfacebook.com"), CookieCategory::Unknown);
    }

    #[test]
    fn host_normalization() {
        assert_eq!(normalize_host("https://www.Example.com:8443/privacy?x=1"), "example.com");
        assert_eq!(normalize_host(".shop.example.com"), "shop.example.com");
        assert_eq!(normalize_host("example.com"), "example.com");
    }

    #[test]
    fn third_party_detection() {
        assert!(!is_third_party("example.com", "https://www.example.com"));
        assert!(!is_third_party(".example.com", "shop.example.com"));
        assert!(!is_third_party("cdn.example.com", "example.com"));
        assert!(is_third_party("doubleclick.net", "example.com"));
        assert!(is_third_party("badexample.com", "example.com"));
        assert!(!is_third_party("", "example.com"));
    }
}
