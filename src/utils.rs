use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{Rng, distr::Alphanumeric};

pub fn generate_job_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Extracts a playlist id from a bare id, a `spotify:playlist:` URI or an
/// `open.spotify.com/playlist/` URL. Returns `None` for anything else.
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = if let Some(rest) = input.strip_prefix("spotify:playlist:") {
        rest
    } else if let Some(pos) = input.find("open.spotify.com/") {
        let path = &input[pos + "open.spotify.com/".len()..];
        let path = path.split(['?', '#']).next().unwrap_or_default();
        // localized links look like open.spotify.com/intl-de/playlist/<id>
        let mut segments = path.split('/').skip_while(|s| *s != "playlist");
        segments.next()?;
        segments.next()?
    } else {
        input
    };

    if !candidate.is_empty() && candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

pub fn shuffled_playlist_name(source_name: &str) -> String {
    format!("{} (Shuffled)", source_name)
}

pub fn shuffled_playlist_description(source_name: &str) -> String {
    format!("Shuffled version of {}", source_name)
}

/// Base64 payload expected by the cover upload endpoint.
pub fn encode_cover_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
