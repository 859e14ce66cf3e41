use plshuffle::utils::*;

#[test]
fn test_generate_job_id() {
    let id = generate_job_id();

    // Should be exactly 16 characters
    assert_eq!(id.len(), 16);

    // Should contain only alphanumeric characters
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated ids should be different
    assert_ne!(id, generate_job_id());
}

#[test]
fn test_parse_playlist_id_bare() {
    assert_eq!(
        parse_playlist_id("37i9dQZF1DXcBWIGoYBM5M").as_deref(),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
    assert_eq!(
        parse_playlist_id("  37i9dQZF1DXcBWIGoYBM5M\n").as_deref(),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
}

#[test]
fn test_parse_playlist_id_uri() {
    assert_eq!(
        parse_playlist_id("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").as_deref(),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
}

#[test]
fn test_parse_playlist_id_url() {
    assert_eq!(
        parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123")
            .as_deref(),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );

    // Localized links carry an extra path segment
    assert_eq!(
        parse_playlist_id("https://open.spotify.com/intl-de/playlist/37i9dQZF1DXcBWIGoYBM5M")
            .as_deref(),
        Some("37i9dQZF1DXcBWIGoYBM5M")
    );
}

#[test]
fn test_parse_playlist_id_rejects_other_input() {
    assert_eq!(parse_playlist_id(""), None);
    assert_eq!(parse_playlist_id("   "), None);
    assert_eq!(
        parse_playlist_id("https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3"),
        None
    );
    assert_eq!(parse_playlist_id("not a playlist"), None);
}

#[test]
fn test_shuffled_playlist_naming() {
    assert_eq!(shuffled_playlist_name("Road Trip"), "Road Trip (Shuffled)");
    assert_eq!(
        shuffled_playlist_description("Road Trip"),
        "Shuffled version of Road Trip"
    );
}

#[test]
fn test_encode_cover_image() {
    assert_eq!(encode_cover_image(b"jpeg"), "anBlZw==");
    assert_eq!(encode_cover_image(&[]), "");

    // Standard alphabet with padding, as the upload endpoint expects
    let encoded = encode_cover_image(&[0xFB, 0xFF, 0xFE]);
    assert_eq!(encoded, "+//+");
}
