use super::annotation_serializer::tag_line;

/// Rewrite old-style `tags: a, b` lines as one `[tag:...]` line per tag.
///
/// Every other line is kept with trailing whitespace removed. Returns `None`
/// when the text holds no legacy tag line, so callers can skip the write.
pub fn convert_legacy_tags(raw: &str) -> Option<String> {
    let mut changed = false;
    let mut out = Vec::new();

    for line in raw.lines() {
        match legacy_tag_values(line) {
            Some(values) => {
                changed = true;
                out.extend(values.iter().map(|t| tag_line(t)));
            }
            None => out.push(line.trim_end().to_string()),
        }
    }

    if !changed {
        return None;
    }

    let mut text = out.join("\n");
    if raw.ends_with('\n') {
        text.push('\n');
    }
    Some(text)
}

/// Tag values from a `tags:` line, or `None` if the line is something else
fn legacy_tag_values(line: &str) -> Option<Vec<&str>> {
    let rest = line.strip_prefix("tags:")?;
    Some(
        rest.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.contains(']'))
            .collect(),
    )
}
