//! Tag lookup inside the text block.
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

/// Compiled tag patterns, one per tag name.
static TAG_PATTERNS: LazyLock<Mutex<HashMap<String, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn tag_pattern(tag: &str) -> Option<Regex> {
    let mut patterns = TAG_PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(regex) = patterns.get(tag) {
        return Some(regex.clone());
    }
    let regex = Regex::new(&format!(r"(?s):{}:(.*?)(?:\s:|$)", regex::escape(tag))).ok()?;
    patterns.insert(tag.to_string(), regex.clone());
    Some(regex)
}

/// Returns the value of `:TAG:` inside a text block, or `None` if the tag is absent.
///
/// The value runs until the first whitespace followed by a colon (the start of the
/// next tag line) or the end of the block. Carriage returns are removed, trailing
/// line feeds and a trailing colon are trimmed. Inner line feeds of multi-line
/// values are kept.
pub fn extract_tag(block: &str, tag: &str) -> Option<String> {
    let regex = tag_pattern(tag)?;
    let value = regex.captures(block)?.get(1)?.as_str();

    let value = value.replace('\r', "");
    let value = value.trim_end_matches('\n');
    Some(value.strip_suffix(':').unwrap_or(value).to_string())
}
