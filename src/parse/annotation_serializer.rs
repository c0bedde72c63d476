use chrono::NaiveDate;

use super::annotation_parser::DUE_DATE_FORMAT;

/// `[tag:value]`
pub fn tag_line(tag: &str) -> String {
    format!("[tag:{}]", tag.trim())
}

/// `[due:YYYY-MM-DD]`
pub fn due_line(date: NaiveDate) -> String {
    format!("[due:{}]", date.format(DUE_DATE_FORMAT))
}

/// Build the annotation header: the due line first, then one line per tag.
/// Returns an empty vec when there is nothing to encode.
pub fn annotation_lines(tags: Option<&[String]>, due_date: Option<NaiveDate>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(date) = due_date {
        lines.push(due_line(date));
    }
    for tag in tags.unwrap_or_default() {
        lines.push(tag_line(tag));
    }
    lines
}

/// Prefix a body with its annotation lines, separated by one blank line.
/// With no tags and no due date the body is returned unchanged.
pub fn inject_annotations(body: &str, tags: Option<&[String]>, due_date: Option<NaiveDate>) -> String {
    let header = annotation_lines(tags, due_date);
    if header.is_empty() {
        return body.to_string();
    }

    let mut out = header.join("\n");
    if body.is_empty() {
        out.push('\n');
    } else {
        out.push_str("\n\n");
        out.push_str(body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tag_line() {
        assert_eq!(tag_line("urgent"), "[tag:urgent]");
        assert_eq!(tag_line(" padded "), "[tag:padded]");
    }

    #[test]
    fn test_due_line() {
        assert_eq!(due_line(date(2025, 12, 31)), "[due:2025-12-31]");
        assert_eq!(due_line(date(2026, 1, 5)), "[due:2026-01-05]");
    }

    #[test]
    fn test_inject_nothing_returns_body() {
        assert_eq!(inject_annotations("Just text", None, None), "Just text");
    }

    #[test]
    fn test_inject_empty_tag_list_matches_absent() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            inject_annotations("Just text", Some(&empty), None),
            inject_annotations("Just text", None, None)
        );
    }

    #[test]
    fn test_inject_tags() {
        let t = tags(&["urgent", "bug"]);
        assert_eq!(
            inject_annotations("Original content", Some(&t), None),
            "[tag:urgent]\n[tag:bug]\n\nOriginal content"
        );
    }

    #[test]
    fn test_inject_due_and_tags() {
        let t = tags(&["test"]);
        assert_eq!(
            inject_annotations("Task content", Some(&t), Some(date(2025, 12, 31))),
            "[due:2025-12-31]\n[tag:test]\n\nTask content"
        );
    }

    #[test]
    fn test_inject_due_only_with_empty_body() {
        assert_eq!(
            inject_annotations("", None, Some(date(2025, 12, 31))),
            "[due:2025-12-31]\n"
        );
    }
}
