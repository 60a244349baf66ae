//! Text canonicalization: trim, lowercase, fold diacritics.
//!
//! Every comparison in the crate (cache keys, word lists, duplicate
//! detection, letter checks) goes through `normalize`, so "Éléphant " and
//! "elephant" are the same word.

/// Maps a lowercase Latin letter carrying a diacritic to its base letter.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' | 'ì' => 'i',
        'ô' | 'ö' | 'ó' | 'ò' | 'õ' => 'o',
        'û' | 'ü' | 'ù' | 'ú' => 'u',
        'ÿ' | 'ý' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        'š' => 's',
        'ž' => 'z',
        other => other,
    }
}

/// Combining diacritical marks block (U+0300..U+036F), dropped so that
/// decomposed input ("e" + combining acute) folds the same as precomposed.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Canonicalizes raw text: trims surrounding whitespace, lowercases, folds
/// diacritics to base letters. Idempotent; whitespace-only input normalizes
/// to the empty string.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        if is_combining_mark(c) {
            continue;
        }
        for lower in c.to_lowercase() {
            match lower {
                'œ' => out.push_str("oe"),
                'æ' => out.push_str("ae"),
                other => out.push(fold_diacritic(other)),
            }
        }
    }
    out
}

/// Canonical form of a round letter.
pub fn normalize_letter(letter: char) -> char {
    letter
        .to_lowercase()
        .map(fold_diacritic)
        .next()
        .unwrap_or(letter)
}

/// Whether an already-normalized word starts with the round's mandated
/// letter. Empty words never match.
pub fn first_letter_matches(normalized_word: &str, letter: char) -> bool {
    normalized_word
        .chars()
        .next()
        .map(|c| c == normalize_letter(letter))
        .unwrap_or(false)
}
