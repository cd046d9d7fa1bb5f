use crate::parsing::token::Tag;

/// Checks whether any `class` attribute of the tag lists `value` as one of its
/// whitespace-separated class names.
pub fn has_class(tag: &Tag, value: &str) -> bool {
    tag.attributes
        .iter()
        .filter(|attr| attr.key == "class")
        .any(|attr| attr.value.split_whitespace().any(|class| class == value))
}
