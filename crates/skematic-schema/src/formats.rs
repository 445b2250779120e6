//! # Format Registry
//!
//! Fixed table of string-format predicates backing the `format` keyword and
//! the inference engine's format detection. Format checking is advisory:
//! the validator consults the registry only when `check_formats` is set,
//! and an unknown format name is always accepted.
//!
//! Shape-only predicates are precompiled regexes; `date` and `date-time`
//! additionally go through chrono so `2021-02-30` is rejected, and the IP
//! formats delegate to `std::net` address parsing.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

static URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("uri pattern compiles"));

static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
    )
    .expect("uuid pattern compiles")
});

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

static TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.\d+)?([Zz]|[+-]([01]\d|2[0-3]):[0-5]\d)?$")
        .expect("time pattern compiles")
});

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("hostname pattern compiles")
});

/// Detection order for inference: most specific shapes first. `hostname`
/// is deliberately absent — it matches nearly any bare word and would
/// drown real detections.
const DETECTORS: &[&str] = &[
    "uuid",
    "date-time",
    "date",
    "time",
    "email",
    "ipv4",
    "ipv6",
    "uri",
];

/// Name → predicate table for string formats.
pub struct FormatRegistry;

impl FormatRegistry {
    /// Every format name the registry understands.
    pub const KNOWN: &'static [&'static str] = &[
        "email",
        "uri",
        "uuid",
        "date",
        "date-time",
        "time",
        "ipv4",
        "ipv6",
        "hostname",
    ];

    /// Check `candidate` against the named format. `None` means the name
    /// is not in the registry (advisory: callers treat it as valid).
    pub fn check(name: &str, candidate: &str) -> Option<bool> {
        match name {
            "email" => Some(EMAIL.is_match(candidate)),
            "uri" => Some(URI.is_match(candidate)),
            "uuid" => Some(UUID.is_match(candidate)),
            "date" => Some(
                DATE_SHAPE.is_match(candidate)
                    && NaiveDate::parse_from_str(candidate, "%Y-%m-%d").is_ok(),
            ),
            "date-time" => Some(DateTime::parse_from_rfc3339(candidate).is_ok()),
            "time" => Some(TIME.is_match(candidate)),
            "ipv4" => Some(candidate.parse::<std::net::Ipv4Addr>().is_ok()),
            "ipv6" => Some(candidate.parse::<std::net::Ipv6Addr>().is_ok()),
            "hostname" => Some(candidate.len() <= 253 && HOSTNAME.is_match(candidate)),
            _ => None,
        }
    }

    /// All detector formats matching `candidate`, in detection priority
    /// order.
    pub fn detect(candidate: &str) -> Vec<&'static str> {
        DETECTORS
            .iter()
            .copied()
            .filter(|name| Self::check(name, candidate) == Some(true))
            .collect()
    }
}
