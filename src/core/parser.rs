use crate::domain::model::RawRow;

/// Split a single CSV line into trimmed fields.
///
/// Each `"` toggles quoting and is dropped from the output; commas inside a
/// quoted section belong to the field. There is no escaped-quote handling, and
/// an unclosed quote simply runs to the end of the line.
pub fn parse_line(line: &str) -> RawRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    RawRow::new(fields)
}

/// Non-blank physical lines of `text`, in order.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}

/// Parse every non-blank line of `text`.
pub fn parse_text(text: &str) -> Vec<RawRow> {
    non_blank_lines(text).map(parse_line).collect()
}
