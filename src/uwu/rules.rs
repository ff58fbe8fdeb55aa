//! Offline, deterministic uwu-ification.
//!
//! Lookalike and invisible characters are folded away first so that a cursed
//! user cannot dodge the rewrite with stylized glyphs or zero-width joiners.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::Uwuifier;
use crate::error::TransformError;

pub const FACES: [&str; 5] = ["uwu", "owo", ">w<", "^w^", "(・ω・)"];

pub struct RuleUwuifier;

#[async_trait]
impl Uwuifier for RuleUwuifier {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn uwuify(&self, text: &str) -> Result<String, TransformError> {
        Ok(uwuify(text))
    }
}

/// Full rewrite: [`rewrite`] plus a trailing face.
pub fn uwuify(text: &str) -> String {
    let body = rewrite(text);
    let face = face_for(&body);
    let body = body.trim_end();
    if body.is_empty() {
        face.to_string()
    } else {
        format!("{body} {face}")
    }
}

/// Everything except the face, in fixed order.
pub fn rewrite(text: &str) -> String {
    let text = normalize(text).to_lowercase();
    let text = text
        .replace(|c: char| matches!(c, 'l' | 'r'), "w")
        .replace("th", "d")
        .replace("ove", "uv");
    let text = nya_pattern().replace_all(&text, "ny$1");
    stutter(&text)
}

/// Drops zero-width and bidi control characters, then folds compatibility
/// forms and accents down to their base letters.
pub fn normalize(text: &str) -> String {
    let visible: String = text.chars().filter(|c| !is_invisible(*c)).collect();
    visible.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
    )
}

fn nya_pattern() -> &'static Regex {
    static NYA: OnceLock<Regex> = OnceLock::new();
    NYA.get_or_init(|| Regex::new(r"\bn([aeiou])").expect("nya pattern is valid"))
}

/// `hello` -> `h-hello`. Only the first letter of the whole string.
fn stutter(text: &str) -> String {
    match text.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((at, first)) => format!("{}{}-{}", &text[..at], first, &text[at..]),
        None => text.to_string(),
    }
}

/// CRC-32 of the rewritten text picks the face.
fn face_for(text: &str) -> &'static str {
    FACES[crc32fast::hash(text.as_bytes()) as usize % FACES.len()]
}
