//! Local input validation, run before any network call.

use regex::Regex;
use std::net::{IpAddr, Ipv6Addr};
use std::sync::LazyLock;

use crate::error::{ApiError, Result};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Validates the format of an email address. Surrounding whitespace is ignored.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ApiError::validation("Email is required").into());
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("Email cannot be empty").into());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ApiError::validation("Invalid email format").into());
    }
    Ok(())
}

/// Validates an IPv4 or IPv6 address. Surrounding whitespace is ignored.
///
/// An IPv6 address may carry a zone suffix such as `fe80::1%eth0`.
pub fn validate_ip(ip: &str) -> Result<()> {
    if ip.is_empty() {
        return Err(ApiError::validation("IP address is required").into());
    }
    let ip = ip.trim();
    if ip.is_empty() {
        return Err(ApiError::validation("IP address cannot be empty").into());
    }
    if !is_ip_address(ip) {
        return Err(ApiError::validation("Invalid IP address format").into());
    }
    Ok(())
}

fn is_ip_address(ip: &str) -> bool {
    match ip.split_once('%') {
        Some((addr, zone)) => {
            !zone.is_empty()
                && !zone.contains(['%', ' ', '\t'])
                && addr.parse::<Ipv6Addr>().is_ok()
        }
        None => ip.parse::<IpAddr>().is_ok(),
    }
}
