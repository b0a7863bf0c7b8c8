//! Fuzzy key matching and naming-convention helpers for suggestions.

use strsim::levenshtein;

/// At most this many near matches are suggested.
pub const MAX_SUGGESTIONS: usize = 3;

/// Edit distance at or below which two keys count as near matches.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Finds keys similar to `target` among `keys`.
///
/// A key qualifies when its case-insensitive Levenshtein distance to the
/// target is at most [`MAX_EDIT_DISTANCE`], or when either string contains
/// the other (case-insensitive). Matches keep the order in which the keys
/// appear, capped at [`MAX_SUGGESTIONS`].
///
/// # Examples
///
/// ```
/// use json_doctor::similar::similar_keys;
///
/// let keys = ["title", "count"];
/// let found = similar_keys("titel", keys.iter().copied());
///
/// assert_eq!(found, vec!["title"]);
/// ```
pub fn similar_keys<'a>(target: &str, keys: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let target_lower = target.to_lowercase();
    let mut found = Vec::new();
    for key in keys {
        if found.len() == MAX_SUGGESTIONS {
            break;
        }
        let key_lower = key.to_lowercase();
        let close = levenshtein(&target_lower, &key_lower) <= MAX_EDIT_DISTANCE;
        let contained = !target_lower.is_empty()
            && (key_lower.contains(&target_lower) || target_lower.contains(&key_lower));
        if close || contained {
            found.push(key);
        }
    }
    found
}

// ------------------------------------------------------------ Case conversion

/// Splits an identifier into its words, handling `snake_case`, `kebab-case`,
/// `camelCase`, `PascalCase` and acronym runs like `HTTPServer`.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            // current is non-empty, so chars[i - 1] belongs to it.
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false);
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Converts an identifier to `snake_case`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts an identifier to `camelCase`.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Converts an identifier to `PascalCase`.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}
