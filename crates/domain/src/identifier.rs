// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket identifiers and QR payloads.
//!
//! Identifiers are 16 symbols from the Crockford base-32 alphabet, each
//! symbol taken from five bits of operating-system randomness (80 bits per
//! identifier). They are unguessable and carry no ordering.
//!
//! The generator does not check uniqueness. Storage rejects duplicates on
//! create and the issuance coordinator retries with a fresh identifier.
//!
//! A QR payload binds an identifier to its event:
//!
//! ```text
//! ADMIT1.<event_id>.<ticket_id>.<check>
//! ```
//!
//! `<check>` is two alphabet symbols computed over `<event_id>.<ticket_id>`.
//! Gates also accept a bare identifier typed in by an operator.

use crate::error::DomainError;
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Number of symbols in a ticket identifier.
pub const TICKET_ID_LEN: usize = 16;

/// Crockford base-32: digits and uppercase letters without I, L, O and U.
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Prefix of a versioned QR payload.
const PAYLOAD_PREFIX: &str = "ADMIT1";

/// A system-wide unique ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(String);

impl TicketId {
    /// Parses and normalizes a ticket identifier.
    ///
    /// Input is uppercased and the look-alike letters `O`, `I` and `L` are
    /// read as `0`, `1` and `1`, so identifiers typed by hand still resolve.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTicketId` if the length is wrong or a
    /// symbol is outside the alphabet.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'O' => '0',
                'I' | 'L' => '1',
                other => other,
            })
            .collect();

        if normalized.len() != TICKET_ID_LEN {
            return Err(DomainError::InvalidTicketId(format!(
                "Ticket id must be {TICKET_ID_LEN} characters, got {}",
                normalized.chars().count()
            )));
        }
        if let Some(bad) = normalized.bytes().find(|b| !ALPHABET.contains(b)) {
            return Err(DomainError::InvalidTicketId(format!(
                "Ticket id contains invalid character '{}'",
                char::from(bad)
            )));
        }
        Ok(Self(normalized))
    }

    /// Builds an identifier from raw random bytes, five bits per symbol.
    fn from_entropy(bytes: &[u8; TICKET_ID_LEN]) -> Self {
        let id: String = bytes
            .iter()
            .map(|b| char::from(ALPHABET[usize::from(b & 0x1F)]))
            .collect();
        Self(id)
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TicketId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.0
    }
}

/// A source of cryptographically secure random bytes.
pub trait EntropySource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the source is unavailable.
    fn fill(&self, dest: &mut [u8]) -> Result<(), String>;
}

/// The operating system's random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        let mut rng: OsRng = OsRng;
        rng.try_fill_bytes(dest).map_err(|e| e.to_string())
    }
}

/// Generates ticket identifiers.
///
/// Holds no mutable state, so one generator can be shared by any number of
/// concurrent issuance batches.
#[derive(Debug, Clone, Default)]
pub struct TicketIdGenerator<E = OsEntropy> {
    entropy: E,
}

impl TicketIdGenerator<OsEntropy> {
    /// Creates a generator backed by the operating system.
    #[must_use]
    pub const fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> TicketIdGenerator<E> {
    /// Creates a generator backed by a specific entropy source.
    #[must_use]
    pub const fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// Generates a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GenerationUnavailable` if the entropy source
    /// fails. No weaker fallback is attempted.
    pub fn generate(&self) -> Result<TicketId, DomainError> {
        let mut bytes: [u8; TICKET_ID_LEN] = [0; TICKET_ID_LEN];
        self.entropy
            .fill(&mut bytes)
            .map_err(DomainError::GenerationUnavailable)?;
        Ok(TicketId::from_entropy(&bytes))
    }
}

/// Derives the QR payload for a ticket.
///
/// The result depends only on the identifier and the event.
#[must_use]
pub fn qr_payload(event_id: i64, ticket_id: &TicketId) -> String {
    let body: String = format!("{event_id}.{ticket_id}");
    let check: String = checksum(&body);
    format!("{PAYLOAD_PREFIX}.{body}.{check}")
}

fn checksum(body: &str) -> String {
    let acc: u32 = body
        .bytes()
        .fold(0_u32, |acc, b| (acc.wrapping_mul(31) + u32::from(b)) % 1024);
    let hi: u8 = ALPHABET[(acc >> 5) as usize & 0x1F];
    let lo: u8 = ALPHABET[acc as usize & 0x1F];
    [char::from(hi), char::from(lo)].iter().collect()
}

/// The result of decoding a presented code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCode {
    /// The ticket the code refers to.
    pub ticket_id: TicketId,
    /// The event named by a full QR payload. `None` for bare identifiers.
    pub event_id: Option<i64>,
}

/// Decodes a scanned or typed code.
///
/// # Errors
///
/// Returns `DomainError::MalformedCode` if the code is neither a valid QR
/// payload nor a bare ticket identifier.
pub fn decode_scan_code(code: &str) -> Result<ScanCode, DomainError> {
    let code: String = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(DomainError::MalformedCode(String::from("Code is empty")));
    }

    let Some(rest) = code.strip_prefix(PAYLOAD_PREFIX) else {
        return TicketId::parse(&code)
            .map(|ticket_id| ScanCode {
                ticket_id,
                event_id: None,
            })
            .map_err(|e| DomainError::MalformedCode(e.to_string()));
    };

    let parts: Vec<&str> = rest.split('.').collect();
    let [prefix_tail, event_part, id_part, check_part] = parts.as_slice() else {
        return Err(DomainError::MalformedCode(String::from(
            "Payload must have four dot-separated fields",
        )));
    };
    if !prefix_tail.is_empty() {
        return Err(DomainError::MalformedCode(String::from(
            "Unsupported payload version",
        )));
    }

    let event_id: i64 = event_part
        .parse()
        .map_err(|_| DomainError::MalformedCode(format!("Invalid event id '{event_part}'")))?;
    let ticket_id: TicketId =
        TicketId::parse(id_part).map_err(|e| DomainError::MalformedCode(e.to_string()))?;

    if checksum(&format!("{event_id}.{ticket_id}")) != *check_part {
        return Err(DomainError::MalformedCode(String::from(
            "Checksum mismatch",
        )));
    }

    Ok(ScanCode {
        ticket_id,
        event_id: Some(event_id),
    })
}
