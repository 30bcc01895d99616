use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthStr;

/// Pictographs plus the joiners, selectors and modifiers that glue them into
/// sequences. Plain digits, `#` and `*` are not matched even
/// though Unicode lists them as emoji components.
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Presentation}\p{Emoji_Modifier}\x{FE0F}\x{200D}\x{20E3}]+\s*",
    )
    .expect("emoji pattern is a valid regex")
});

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Left-align `s` in a field of `width` cells.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = display_width(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(w));
    out.push_str(s);
    for _ in w..width {
        out.push(' ');
    }
    out
}

/// Remove emoji (and the whitespace following each run of them).
pub fn strip_emojis(s: &str) -> String {
    EMOJI_RE.replace_all(s, "").into_owned()
}

/// Normalized form used to compare names: trimmed, lower-cased.
pub fn fold_name(s: &str) -> String {
    s.trim().to_lowercase()
}
