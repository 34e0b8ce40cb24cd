/// Whether a message carries nothing worth translating.
///
/// True for empty/whitespace-only text, and for text made only of
/// supplementary-plane code points (emoji, pictographs) and whitespace.
pub fn is_noise(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed
            .chars()
            .all(|c| c.is_whitespace() || is_supplementary(c))
}

/// Outside the Basic Multilingual Plane (U+10000 and above).
fn is_supplementary(c: char) -> bool {
    u32::from(c) > 0xFFFF
}
