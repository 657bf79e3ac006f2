//! Text cleanup for image titles and captions.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::xml::decode_entity;

/// Pattern for matching HTML/XML tags, including comments.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z!?][^>]*>").expect("invalid tag regex")
});

/// Pattern for named and numeric character references.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9A-Fa-f]+|#[0-9]+|[A-Za-z]+);").expect("invalid entity regex")
});

/// Remove HTML tags from `text`, decode character references and trim
/// surrounding whitespace.
///
/// The result is plain text; serialization escapes it again. Unknown named
/// references other than `&nbsp;` are kept verbatim.
#[must_use]
pub fn strip_tags(text: &str) -> String {
    let stripped = TAG_PATTERN.replace_all(text, "");
    ENTITY_PATTERN
        .replace_all(&stripped, |caps: &Captures<'_>| match &caps[1] {
            "nbsp" => " ".to_owned(),
            entity => decode_entity(entity),
        })
        .trim()
        .to_owned()
}

/// Strip tags and drop the value if nothing is left.
pub(crate) fn clean(text: Option<&str>) -> Option<String> {
    let cleaned = strip_tags(text?);
    (!cleaned.is_empty()).then_some(cleaned)
}
