use unicode_segmentation::UnicodeSegmentation;

/// What to do with an incoming text before it reaches the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextClass {
    /// Nothing but emoji and whitespace: no reply.
    Skip,
    Translate,
}

pub fn classify(text: &str) -> TextClass {
    if is_only_emojis(text) {
        TextClass::Skip
    } else {
        TextClass::Translate
    }
}

/// True when the text has nothing left once emoji and whitespace are removed.
/// An empty string counts as emoji-only.
pub fn is_only_emojis(text: &str) -> bool {
    strip_emojis(text).trim().is_empty()
}

/// Remove every emoji from `text`, keeping everything else in place.
///
/// Works on grapheme clusters so that ZWJ sequences, flags and skin-tone
/// variants are removed as a unit instead of leaving stray modifiers behind.
pub fn strip_emojis(text: &str) -> String {
    text.graphemes(true)
        .filter(|g| !is_emoji_grapheme(g))
        .collect()
}

fn is_emoji_grapheme(grapheme: &str) -> bool {
    if emojis::get(grapheme).is_some() {
        return true;
    }

    // Sequences the emoji table doesn't list verbatim (unknown ZWJ combos,
    // stray variation selectors) still count when built only from emoji parts.
    let mut buf = [0u8; 4];
    grapheme.chars().all(|c| {
        is_emoji_component(c) || emojis::get(c.encode_utf8(&mut buf)).is_some()
    })
}

fn is_emoji_component(c: char) -> bool {
    matches!(
        c,
        '\u{200D}'                      // zero width joiner
            | '\u{FE0E}'..='\u{FE0F}'   // variation selectors
            | '\u{20E3}'                // combining keycap
            | '\u{1F1E6}'..='\u{1F1FF}' // regional indicators
            | '\u{1F3FB}'..='\u{1F3FF}' // skin tones
            | '\u{E0020}'..='\u{E007F}' // tags
    )
}
