use albumcrate::spotify::build_query;
use albumcrate::types::{AlbumRecord, SimplifiedArtist};
use albumcrate::utils::*;

fn artist(name: &str) -> SimplifiedArtist {
    SimplifiedArtist {
        id: None,
        name: name.to_string(),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // URL safe base64 without padding
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert!(!challenge.contains('='));
}

#[test]
fn test_generate_code_challenge_rfc7636_vector() {
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_build_query_both_terms() {
    assert_eq!(
        build_query("Pink Floyd", "The Wall"),
        "artist:Pink Floyd album:The Wall"
    );
}

#[test]
fn test_build_query_omits_blank_terms() {
    assert_eq!(build_query("Pink Floyd", ""), "artist:Pink Floyd");
    assert_eq!(build_query("  ", "Animals"), "album:Animals");
    assert_eq!(build_query("", "   "), "");
}

#[test]
fn test_build_query_trims_terms() {
    assert_eq!(build_query("  Björk ", " Homogenic  "), "artist:Björk album:Homogenic");
}

#[test]
fn test_dedupe_records_keeps_first() {
    let mut records = vec![
        AlbumRecord::new("Radiohead", "Kid A", "2000", "Top Rated"),
        AlbumRecord::new("Radiohead", "Amnesiac", "2001", "8.0+"),
        AlbumRecord::new("Radiohead", "Kid A", "2000", "8.0+"),
        AlbumRecord::new("Burial", "Untrue", "2007", "DIY Featured"),
    ];

    dedupe_records(&mut records);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].rating, "Top Rated");
    assert_eq!(records[1].album, "Amnesiac");
    assert_eq!(records[2].artist, "Burial");
}

#[test]
fn test_join_artists() {
    assert_eq!(join_artists(&[]), "");
    assert_eq!(join_artists(&[artist("Daft Punk")]), "Daft Punk");
    assert_eq!(
        join_artists(&[artist("Run The Jewels"), artist("Zack de la Rocha")]),
        "Run The Jewels, Zack de la Rocha"
    );
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Illinois", 20), "Illinois");
    assert_eq!(truncate("Illinois", 8), "Illinois");
    assert_eq!(truncate("Illinoise", 8), "Illinoi…");
    assert_eq!(truncate("Beyoncé", 4).chars().count(), 4);
}
