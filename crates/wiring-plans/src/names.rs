//! Room and zone name normalisation
//!
//! Names are typed by hand into three different files (config, crop table,
//! CSV exports), often by tools that substitute typographic quotes or wrap
//! long names across lines. Every name comparison goes through
//! [`normalize_name`].

/// Typographic punctuation mapped to its ASCII form
const PUNCTUATION_MAP: [(char, char); 3] = [
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
];

/// Collapse whitespace runs to single spaces, trim, and map curly quotes to
/// ASCII quotes.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .map(|c| {
            PUNCTUATION_MAP
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}
