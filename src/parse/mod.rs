pub mod annotation_parser;
pub mod annotation_serializer;
pub mod legacy;

pub use annotation_parser::{
    Annotations, DUE_DATE_FORMAT, LineKind, classify_line, extract_annotations, parse_due_date,
};
pub use annotation_serializer::{annotation_lines, due_line, inject_annotations, tag_line};
pub use legacy::convert_legacy_tags;

/// Tags are stored one per line inside `[tag:...]`, so they cannot hold a
/// closing bracket or a line break.
pub fn is_valid_tag(tag: &str) -> bool {
    let tag = tag.trim();
    !tag.is_empty() && !tag.contains(']') && !tag.contains('\n') && !tag.contains('\r')
}
