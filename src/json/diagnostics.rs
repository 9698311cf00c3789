//! JSON error diagnostics with source-annotated messages

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// JSON syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("JSON syntax error: {message}")]
#[diagnostic(code(umlt::json::syntax))]
pub struct JsonSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,

    line: usize,
    column: usize,
}

impl JsonSyntaxError {
    /// Create a syntax error from a serde_json error
    pub fn from_serde_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help,
            message,
            line,
            column,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based (line, column) of the error
    pub fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// Parse JSON text, turning failures into a located diagnostic
pub fn parse_value(source: &str, filename: &str) -> Result<serde_json::Value, JsonSyntaxError> {
    serde_json::from_str(source).map_err(|e| JsonSyntaxError::from_serde_error(&e, source, filename))
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = i + 1;
        }
    }

    if current_line < line {
        return source.len().saturating_sub(1);
    }

    let rest = &source[line_start..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    let col_offset = rest[..line_len]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(j, _)| j)
        .unwrap_or(line_len);

    line_start + col_offset
}

/// Generate helpful suggestions based on error message
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last item of an object or array.".to_string());
    }

    if msg_lower.contains("expected `,` or `}`") || msg_lower.contains("expected `,` or `]`") {
        return Some("Add commas between items: [item1, item2, item3]".to_string());
    }

    if msg_lower.contains("key must be a string") {
        return Some("Object keys must be double-quoted: {\"key\": \"value\"}".to_string());
    }

    if msg_lower.contains("eof while parsing") {
        return Some("The document ends early - check for a missing closing bracket or brace.".to_string());
    }

    if msg_lower.contains("control character") {
        return Some("Escape newlines and tabs inside strings as \\n and \\t.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 2), 13);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("trailing comma at line 1 column 9").is_some());
        assert!(generate_help("EOF while parsing an object").is_some());
        assert!(generate_help("key must be a string").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_parse_value_reports_location() {
        let err = parse_value("{\n  \"a\": 1,\n}", "doc.json").unwrap_err();
        assert_eq!(err.location().0, 3);
        assert!(err.message().contains("trailing comma"));
    }
}
