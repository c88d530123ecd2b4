// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    DomainError, EntropySource, TICKET_ID_LEN, TicketId, TicketIdGenerator, decode_scan_code,
    qr_payload,
};

struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), String> {
        Err(String::from("entropy pool closed"))
    }
}

struct ZeroEntropy;

impl EntropySource for ZeroEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), String> {
        dest.fill(0);
        Ok(())
    }
}

#[test]
fn test_generated_ids_have_fixed_length_and_alphabet() {
    let generator = TicketIdGenerator::new();
    for _ in 0..100 {
        let id: TicketId = generator.generate().unwrap();
        assert_eq!(id.as_str().len(), TICKET_ID_LEN);
        assert!(TicketId::parse(id.as_str()).is_ok());
        assert!(
            !id.as_str().contains(['I', 'L', 'O', 'U']),
            "{id} contains an excluded symbol"
        );
    }
}

#[test]
fn test_generated_ids_are_distinct() {
    let generator = TicketIdGenerator::new();
    let ids: HashSet<TicketId> = (0..10_000).map(|_| generator.generate().unwrap()).collect();
    assert_eq!(ids.len(), 10_000);
}

#[test]
fn test_generator_shared_across_threads() {
    let generator = Arc::new(TicketIdGenerator::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            std::thread::spawn(move || {
                (0..500)
                    .map(|_| generator.generate().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all: HashSet<TicketId> = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(all.insert(id));
        }
    }
    assert_eq!(all.len(), 4_000);
}

#[test]
fn test_entropy_failure_is_reported() {
    let generator = TicketIdGenerator::with_entropy(FailingEntropy);
    assert_eq!(
        generator.generate(),
        Err(DomainError::GenerationUnavailable(String::from(
            "entropy pool closed"
        )))
    );
}

#[test]
fn test_generation_is_a_pure_function_of_entropy() {
    let generator = TicketIdGenerator::with_entropy(ZeroEntropy);
    assert_eq!(generator.generate().unwrap().as_str(), "0000000000000000");
    assert_eq!(generator.generate(), generator.generate());
}

#[test]
fn test_parse_normalizes_case_and_look_alikes() {
    let id = TicketId::parse("abcdefghjkmnpqrs").unwrap();
    assert_eq!(id.as_str(), "ABCDEFGHJKMNPQRS");

    let id = TicketId::parse(" o1il0000AAAABBBB ").unwrap();
    assert_eq!(id.as_str(), "01110000AAAABBBB");
}

#[test]
fn test_parse_rejects_bad_length_and_symbols() {
    assert!(matches!(
        TicketId::parse("ABC"),
        Err(DomainError::InvalidTicketId(_))
    ));
    assert!(matches!(
        TicketId::parse("ABCDEFGHJKMNPQRU"),
        Err(DomainError::InvalidTicketId(_))
    ));
    assert!(matches!(
        TicketId::parse("ABCDEFGHJKMNPQR-"),
        Err(DomainError::InvalidTicketId(_))
    ));
}

#[test]
fn test_qr_payload_is_deterministic() {
    let id = TicketId::parse("7K3M9QXW2B4N6P8R").unwrap();
    let first = qr_payload(42, &id);
    let second = qr_payload(42, &id);
    assert_eq!(first, second);
    assert!(first.starts_with("ADMIT1.42.7K3M9QXW2B4N6P8R."));
    assert_ne!(first, qr_payload(43, &id));
}

#[test]
fn test_decode_full_payload() {
    let id = TicketId::parse("7K3M9QXW2B4N6P8R").unwrap();
    let payload = qr_payload(42, &id);

    let decoded = decode_scan_code(&payload).unwrap();
    assert_eq!(decoded.ticket_id, id);
    assert_eq!(decoded.event_id, Some(42));

    let decoded = decode_scan_code(&payload.to_lowercase()).unwrap();
    assert_eq!(decoded.ticket_id, id);
}

#[test]
fn test_decode_bare_identifier() {
    let decoded = decode_scan_code("7k3m9qxw2b4n6p8r").unwrap();
    assert_eq!(decoded.ticket_id.as_str(), "7K3M9QXW2B4N6P8R");
    assert_eq!(decoded.event_id, None);
}

#[test]
fn test_decode_rejects_tampered_payload() {
    let id = TicketId::parse("7K3M9QXW2B4N6P8R").unwrap();
    let payload = qr_payload(42, &id);
    let tampered = payload.replacen(".42.", ".41.", 1);

    assert_eq!(
        decode_scan_code(&tampered),
        Err(DomainError::MalformedCode(String::from("Checksum mismatch")))
    );
}

#[test]
fn test_decode_rejects_garbage() {
    for code in [
        "",
        "   ",
        "hello",
        "ADMIT1.42.7K3M9QXW2B4N6P8R",
        "ADMIT1.x.7K3M9QXW2B4N6P8R.00",
        "ADMIT2.42.7K3M9QXW2B4N6P8R.00",
        "https://example.com/t/7K3M9QXW2B4N6P8R",
    ] {
        assert!(
            matches!(decode_scan_code(code), Err(DomainError::MalformedCode(_))),
            "{code:?} should be malformed"
        );
    }
}

#[test]
fn test_ticket_id_serde_validates() {
    let id: TicketId = serde_json::from_str("\"7k3m9qxw2b4n6p8r\"").unwrap();
    assert_eq!(id.as_str(), "7K3M9QXW2B4N6P8R");
    assert!(serde_json::from_str::<TicketId>("\"short\"").is_err());
}
