//! Target address validation and reachability probing
//!
//! The PC agent must not be installed against a malformed address, so the
//! dotted-quad check is strict. Reachability, on the other hand, is only a
//! best-effort ping: the network may simply not be up yet at install time.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Address validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddrError {
    /// Empty input
    #[error("Address is empty")]
    Empty,

    /// Not four dot-separated fields
    #[error("'{input}' is not a dotted-quad IPv4 address")]
    NotDottedQuad {
        /// The rejected input
        input: String,
    },

    /// A field is not a decimal number in 0..=255
    #[error("'{octet}' is not a valid IPv4 octet (0-255)")]
    BadOctet {
        /// The rejected field
        octet: String,
    },
}

/// Parse a strict dotted-quad IPv4 address
///
/// Rejects empty input, hostnames, IPv6, embedded whitespace and octets
/// outside 0-255. Surrounding whitespace is trimmed before validation.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr, AddrError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddrError::Empty);
    }

    let fields: Vec<&str> = trimmed.split('.').collect();
    if fields.len() != 4 {
        return Err(AddrError::NotDottedQuad {
            input: trimmed.to_string(),
        });
    }

    let mut octets = [0u8; 4];
    for (i, field) in fields.iter().enumerate() {
        if field.is_empty()
            || field.len() > 3
            || !field.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AddrError::BadOctet {
                octet: (*field).to_string(),
            });
        }
        octets[i] = field.parse().map_err(|_| AddrError::BadOctet {
            octet: (*field).to_string(),
        })?;
    }

    Ok(Ipv4Addr::from(octets))
}

/// Single best-effort ping to a host
///
/// Returns whether one ICMP echo came back within the timeout. A `false`
/// here is advisory only; installation proceeds regardless.
pub fn ping(host: &str) -> bool {
    crate::cmd::run_command_quiet("ping", &["-c", "1", "-W", "2", host])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_addresses() {
        assert_eq!(parse_ipv4("10.0.0.225").unwrap(), Ipv4Addr::new(10, 0, 0, 225));
        assert_eq!(parse_ipv4("0.0.0.0").unwrap(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(
            parse_ipv4("255.255.255.255").unwrap(),
            Ipv4Addr::new(255, 255, 255, 255)
        );
        // Surrounding whitespace is tolerated
        assert_eq!(
            parse_ipv4(" 192.168.1.42 ").unwrap(),
            Ipv4Addr::new(192, 168, 1, 42)
        );
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(parse_ipv4(""), Err(AddrError::Empty));
        assert_eq!(parse_ipv4("   "), Err(AddrError::Empty));
    }

    #[test]
    fn test_rejects_non_dotted_quad() {
        assert!(matches!(
            parse_ipv4("raspberrypi.local"),
            Err(AddrError::NotDottedQuad { .. })
        ));
        assert!(matches!(
            parse_ipv4("10.0.0"),
            Err(AddrError::NotDottedQuad { .. })
        ));
        assert!(matches!(
            parse_ipv4("10.0.0.1.5"),
            Err(AddrError::NotDottedQuad { .. })
        ));
        assert!(matches!(parse_ipv4("::1"), Err(AddrError::NotDottedQuad { .. })));
    }

    #[test]
    fn test_rejects_bad_octets() {
        assert!(matches!(parse_ipv4("10.0.0.256"), Err(AddrError::BadOctet { .. })));
        assert!(matches!(parse_ipv4("10..0.1"), Err(AddrError::BadOctet { .. })));
        assert!(matches!(parse_ipv4("10.0.0.1a"), Err(AddrError::BadOctet { .. })));
        assert!(matches!(parse_ipv4("10.0.0.+1"), Err(AddrError::BadOctet { .. })));
        // Over-long field even if numerically small once truncated
        assert!(matches!(parse_ipv4("10.0.0.0225"), Err(AddrError::BadOctet { .. })));
        // Embedded whitespace inside a field
        assert!(matches!(parse_ipv4("10.0. 0.1"), Err(AddrError::BadOctet { .. })));
    }
}
