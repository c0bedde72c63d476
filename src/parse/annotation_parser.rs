use chrono::NaiveDate;

/// Date format used inside `[due:...]` lines
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Structured fields pulled out of a stored task body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    /// `None` when the text had no tag lines at all
    pub tags: Option<Vec<String>>,
    pub due_date: Option<NaiveDate>,
    /// The text with every annotation line removed, trimmed
    pub body: String,
}

/// What a single line of stored text turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `[tag:value]`, value untrimmed
    Tag(&'a str),
    /// `[due:value]`, value unparsed
    Due(&'a str),
    Body,
}

/// Classify one line. Annotations must occupy the whole line (surrounding
/// whitespace aside) and their value must not contain `]`.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if let Some(value) = annotation_value(trimmed, "[tag:") {
        LineKind::Tag(value)
    } else if let Some(value) = annotation_value(trimmed, "[due:") {
        LineKind::Due(value)
    } else {
        LineKind::Body
    }
}

fn annotation_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let inner = line.strip_prefix(prefix)?.strip_suffix(']')?;
    if inner.contains(']') {
        return None;
    }
    Some(inner)
}

/// Parse a due-date value, tolerating surrounding whitespace
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DUE_DATE_FORMAT).ok()
}

/// Split stored task text into its tags, due date and plain body.
///
/// Every annotation line is removed from the body, including due lines whose
/// date does not parse. Those leave the due date unset and emit a warning.
/// Lines are split on `\n` only, so CRLF bodies keep their `\r`.
pub fn extract_annotations(raw: &str) -> Annotations {
    let mut tags: Option<Vec<String>> = None;
    let mut due_date = None;
    let mut body_lines = Vec::new();

    for line in raw.split('\n') {
        match classify_line(line) {
            LineKind::Tag(value) => {
                let tags = tags.get_or_insert_with(Vec::new);
                let value = value.trim();
                if !value.is_empty() {
                    tags.push(value.to_string());
                }
            }
            LineKind::Due(value) => match parse_due_date(value) {
                Some(date) => due_date = Some(date),
                None => {
                    tracing::warn!(value, "ignoring unparsable due date annotation");
                }
            },
            LineKind::Body => body_lines.push(line),
        }
    }

    Annotations {
        tags,
        due_date,
        body: body_lines.join("\n").trim().to_string(),
    }
}
