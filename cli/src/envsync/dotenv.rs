//! `.env` file parsing and rendering

use std::collections::BTreeMap;

/// Environment variables keyed by name, ordered for stable output
pub type EnvMap = BTreeMap<String, String>;

/// Whether `key` matches `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse `.env` contents.
///
/// Blank lines and `#` comments are skipped, each line is split at its first
/// `=`, one pair of matching outer quotes is stripped. Invalid keys are
/// dropped and the last occurrence of a key wins.
pub fn parse(contents: &str) -> EnvMap {
    let mut vars = EnvMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if !is_valid_key(key) {
            continue;
        }
        vars.insert(key.to_string(), parse_value(value.trim()));
    }
    vars
}

fn parse_value(raw: &str) -> String {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return unescape(&raw[1..raw.len() - 1], quote == '"');
        }
    }
    raw.to_string()
}

/// Undo escaping inside a quoted value. Double quotes also carry `\\`, `\n`
/// and `\r`; unknown sequences are kept verbatim.
fn unescape(inner: &str, double: bool) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') if double => out.push('\\'),
            Some('n') if double => out.push('\n'),
            Some('r') if double => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Render a value so that [`parse`] reads it back unchanged
pub fn format_value(value: &str) -> String {
    let needs_quotes = value.contains(['\n', '\r', '"'])
        || value.starts_with('\'')
        || value.trim() != value;
    if !needs_quotes {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Render `.env` contents with a leading comment block
pub fn render(vars: &EnvMap, header: &[String]) -> String {
    let mut out = String::new();
    for line in header {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    if !header.is_empty() {
        out.push('\n');
    }
    for (key, value) in vars {
        out.push_str(key);
        out.push('=');
        out.push_str(&format_value(value));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_rules() {
        let contents = r#"
# comment
  DB_HOST = localhost
EMPTY=
QUOTED="hello \"world\""
SINGLE='it\'s'
URL=postgres://u:p@h/db?a=b
1BAD=x
bad-key=x
no_equals_sign
DUP=first
DUP=second
"#;
        let vars = parse(contents);
        assert_eq!(
            vars,
            map(&[
                ("DB_HOST", "localhost"),
                ("EMPTY", ""),
                ("QUOTED", "hello \"world\""),
                ("SINGLE", "it's"),
                ("URL", "postgres://u:p@h/db?a=b"),
                ("DUP", "second"),
            ])
        );
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("_A1"));
        assert!(is_valid_key("api_key"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("9LIVES"));
        assert!(!is_valid_key("WITH SPACE"));
    }

    #[test]
    fn test_render_round_trip() {
        let vars = map(&[("A", "1"), ("B", "two words"), ("C", "line1\nline2")]);
        let body = render(&vars, &[]);

        assert!(body.contains("A=1\n"));
        assert!(body.contains("B=two words\n"));
        assert!(body.contains("C=\"line1\\nline2\"\n"));
        assert_eq!(parse(&body), vars);
    }

    #[test]
    fn test_render_escapes_awkward_values() {
        let vars = map(&[
            ("PADDED", "  spaced  "),
            ("QUOTES", r#"say "hi""#),
            ("SLASHES", r"C:\path\n"),
            ("LEADING", "'x'"),
            ("CRLF", "a\r\nb"),
        ]);
        let body = render(&vars, &["header".to_string()]);

        assert!(body.starts_with("# header\n\n"));
        assert_eq!(parse(&body), vars);
    }

    #[test]
    fn test_backslash_without_quotes_is_literal() {
        let vars = map(&[("PATTERN", r"\d+\w")]);
        let body = render(&vars, &[]);
        assert_eq!(body, "PATTERN=\\d+\\w\n");
        assert_eq!(parse(&body), vars);
    }

    #[test]
    fn test_quoted_escape_decoding() {
        let contents = r#"
WIN="C:\\new\\dir"
NL="a\nb"
SQ='a\nb \"q\"'
UNKNOWN="\t"
"#;
        let vars = parse(contents);
        assert_eq!(vars["WIN"], r"C:\new\dir");
        assert_eq!(vars["NL"], "a\nb");
        // Single quotes only decode quote escapes
        assert_eq!(vars["SQ"], r#"a\nb "q""#);
        assert_eq!(vars["UNKNOWN"], r"\t");
    }
}
