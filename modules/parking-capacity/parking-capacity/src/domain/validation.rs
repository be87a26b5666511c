//! Input validation shared by the admission services.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::error::DomainError;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static MAC_ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("static regex should not panic")
});

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static IPV4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("static regex should not panic")
});

/// # Errors
///
/// Returns `Validation` on `mac_address` if it is not six hex pairs.
pub fn validate_mac_address(mac_address: &str) -> Result<(), DomainError> {
    if MAC_ADDRESS_REGEX.is_match(mac_address) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "mac_address",
            format!("'{mac_address}' is not a MAC address (expected six hex pairs separated by ':' or '-')"),
        ))
    }
}

/// # Errors
///
/// Returns `Validation` on `last_ip` if it is not a dotted-quad IPv4 address.
pub fn validate_last_ip(last_ip: &str) -> Result<(), DomainError> {
    if IPV4_REGEX.is_match(last_ip) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "last_ip",
            format!("'{last_ip}' is not a dotted-quad IPv4 address"),
        ))
    }
}

/// MAC first, then IP.
///
/// # Errors
///
/// Returns `Validation` naming the first offending field.
pub fn validate_gateway_addresses(mac_address: &str, last_ip: &str) -> Result<(), DomainError> {
    validate_mac_address(mac_address)?;
    validate_last_ip(last_ip)
}

/// # Errors
///
/// Returns `Validation` on `width` or `length` if it is not positive.
pub fn validate_zone_dimensions(width: Decimal, length: Decimal) -> Result<(), DomainError> {
    if width <= Decimal::ZERO {
        return Err(DomainError::validation("width", "must be greater than zero"));
    }
    if length <= Decimal::ZERO {
        return Err(DomainError::validation("length", "must be greater than zero"));
    }
    Ok(())
}

/// # Errors
///
/// Returns `Validation` on a blank `name` or a negative `available_area`.
pub fn validate_parking_fields(name: &str, available_area: Decimal) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "must not be blank"));
    }
    if available_area < Decimal::ZERO {
        return Err(DomainError::validation(
            "available_area",
            "must not be negative",
        ));
    }
    Ok(())
}

/// # Errors
///
/// Returns `Validation` if `street` or `complement` is blank.
pub fn validate_location_query(street: &str, complement: &str) -> Result<(), DomainError> {
    if street.trim().is_empty() {
        return Err(DomainError::validation("street", "must not be blank"));
    }
    if complement.trim().is_empty() {
        return Err(DomainError::validation("complement", "must not be blank"));
    }
    Ok(())
}
