//! URL sanitization and normalization.
//!
//! Turns a user-supplied string into a canonical absolute URL or a
//! validation failure. Three steps: sanitize (reject dangerous schemes),
//! normalize (ensure an `https://` prefix, lowercase the scheme), validate
//! (parse, check scheme/hostname/length). Pure function, no side effects.

use url::{Host, Url};

use crate::constants::MAX_URL_LENGTH;

#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    DangerousProtocol(String),
    UnsupportedScheme(String),
    InvalidFormat(String),
    MissingDomain,
    TooLong(usize),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol detected: {}", proto)
            }
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme: {}. Only http and https are allowed",
                scheme
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingDomain => {
                write!(f, "Invalid URL: must include a valid domain name")
            }
            Self::TooLong(len) => write!(
                f,
                "URL is too long ({} characters, max {})",
                len, MAX_URL_LENGTH
            ),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// Schemes rejected outright. Rejection is an explicit failure, never a
/// silent strip.
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "vbscript:",
    "file:",
    "about:",
];

/// Sanitize and normalize a raw URL string.
///
/// On success the returned string is canonical: idempotent under a second
/// pass, scheme lowercased, `https://` prepended when the input had no
/// scheme. The host must be `localhost`, an IPv4 literal, or contain at
/// least one dot (single-word hostnames like `test` are rejected).
pub fn sanitize_and_normalize(raw: &str) -> Result<String, UrlValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = trimmed.to_lowercase();
    for proto in DANGEROUS_PROTOCOLS {
        if lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    // Ensure a scheme prefix; when one is present, lowercase the scheme
    // only and leave the rest of the string untouched.
    let prefix_len = if trimmed
        .get(..8)
        .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
    {
        Some(8)
    } else if trimmed
        .get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case("http://"))
    {
        Some(7)
    } else {
        None
    };

    let normalized = match prefix_len {
        Some(n) => format!("{}{}", trimmed[..n].to_ascii_lowercase(), &trimmed[n..]),
        None => format!("https://{}", trimmed),
    };

    if normalized.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(normalized.len()));
    }

    let parsed =
        Url::parse(&normalized).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_string())),
    }

    match parsed.host() {
        Some(Host::Domain(domain)) => {
            if domain != "localhost" && !domain.contains('.') {
                return Err(UrlValidationError::MissingDomain);
            }
        }
        Some(Host::Ipv4(_)) => {}
        // IPv6 literals have no dot and are not localhost; they fall
        // outside the accepted host forms.
        Some(Host::Ipv6(_)) => return Err(UrlValidationError::MissingDomain),
        None => {
            return Err(UrlValidationError::InvalidFormat(
                "missing host".to_string(),
            ));
        }
    }

    Ok(normalized)
}
