//! Clean generated text before it is handed to the narration service.

use emojito::find_emoji;
use regex::Regex;

/// True for decorative code points the narrator must never receive:
/// dingbats, private-use glyphs, variation selectors, emoji planes and the
/// bullet/arrow characters used for list decoration.
fn is_decorative(c: char) -> bool {
    matches!(c,
        '\u{2700}'..='\u{27BF}'
        | '\u{E000}'..='\u{F8FF}'
        | '\u{FE0F}'
        | '\u{1F000}'..='\u{1FFFF}'
        | '•' | '·' | '→' | '←' | '↔'
        | '◾' | '◽' | '◆' | '◇' | '◉' | '◎' | '○' | '●')
}

/// Strip formatting and decoration from `text`, leaving plain speakable
/// words.
///
/// Markup punctuation goes first, then emoji and symbol glyphs, then
/// `[label](url)` spans are rewritten to their label. Whitespace runs
/// collapse to single spaces and the result is trimmed. Input without any
/// of these just comes back whitespace-normalized.
pub fn sanitize(text: &str) -> String {
    let markup = Regex::new(r"[*_`#>~\-]+").unwrap();
    let link = Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap();

    let stripped = markup.replace_all(text, "");

    let found = find_emoji(&stripped);
    let mut cleaned = stripped.to_string();
    for emoji in &found {
        cleaned = cleaned.replace(emoji.glyph, "");
    }

    let cleaned = link.replace_all(&cleaned, "$1");
    let cleaned: String = cleaned.chars().filter(|c| !is_decorative(*c)).collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn strips_markup_punctuation() {
        assert_eq!(sanitize("**Bonjour** `toi` #titre"), "Bonjour toi titre");
    }

    #[test]
    fn rewrites_links_to_their_label() {
        assert_eq!(
            sanitize("Va voir [la doc](https://example.com/doc) !"),
            "Va voir la doc !"
        );
    }

    #[test]
    fn drops_emoji_and_bullets() {
        assert_eq!(sanitize("Salut 👋 • premier point"), "Salut premier point");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize("  Bonjour \n\n  à   toi  "), "Bonjour à toi");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize("Comment vas-tu ?"), "Comment vastu ?");
        assert_eq!(sanitize("Bonjour."), "Bonjour.");
    }

    #[test]
    fn never_panics_on_odd_input() {
        for input in ["", "   ", "](", "[]()", "\u{FE0F}\u{1F600}"] {
            let _ = sanitize(input);
        }
        assert_eq!(sanitize("[]()"), "");
    }
}
