//! Search-key normalization
//!
//! Rendered chapters and extraction snapshots disagree on typography: curly
//! versus straight quotes, en/em dashes versus hyphens, non-breaking versus
//! plain spaces. Both sides are folded to ASCII before searching.
//!
//! Every mapping is one char to one char, so a normalized string has the same
//! char count as its source and char offsets found in it address the source.

use alloc::borrow::Cow;
use alloc::string::String;

/// Fold a single char to its search form
#[inline]
pub fn normalize_char(ch: char) -> char {
    match ch {
        // single quotes, low-9 quote, reversed quote, prime
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
        // double quotes, low-9 double quote, reversed double quote, double prime
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
        // hyphen, non-breaking hyphen, figure dash, en dash, em dash, bar
        '\u{2010}'..='\u{2015}' => '-',
        // no-break space, figure space, narrow no-break space
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
        other => other,
    }
}

/// Normalize `text` for searching
///
/// Borrows when nothing needs folding.
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.is_ascii() || !text.chars().any(|ch| normalize_char(ch) != ch) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().map(normalize_char).collect::<String>())
}
