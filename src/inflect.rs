//! Naming helpers shared by every generator.
//!
//! Only regular English plurals and a short irregular list are handled; model
//! names are expected to be simple nouns such as `category` or `productTag`.

use convert_case::{Case, Casing};

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "news",
    "data",
];

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pascal_case(word: &str) -> String {
    word.to_case(Case::Pascal)
}

pub fn camel_case(word: &str) -> String {
    word.to_case(Case::Camel)
}

/// Pluralizes the last word of a camelCase or snake_case identifier.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let split = last_word_start(word);
    let (head, tail) = word.split_at(split);
    let lower = tail.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == lower) {
        let plural = if tail.starts_with(|c: char| c.is_uppercase()) {
            capitalize(plural)
        } else {
            (*plural).to_string()
        };
        return format!("{head}{plural}");
    }

    let plural_tail = if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        format!("{}ies", &tail[..tail.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        format!("{tail}es")
    } else if lower.ends_with("fe") {
        format!("{}ves", &tail[..tail.len() - 2])
    } else if lower.ends_with('f') && !lower.ends_with("ff") {
        format!("{}ves", &tail[..tail.len() - 1])
    } else {
        format!("{tail}s")
    };

    format!("{head}{plural_tail}")
}

fn ends_with_vowel_y(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() >= 2 && matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u')
}

fn last_word_start(word: &str) -> usize {
    word.char_indices()
        .rev()
        .find(|(idx, c)| *idx > 0 && (c.is_uppercase() || *c == '_'))
        .map(|(idx, c)| if c == '_' { idx + 1 } else { idx })
        .unwrap_or(0)
}
