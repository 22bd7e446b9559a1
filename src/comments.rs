//! Source comment lookup and KDoc rendering
//!
//! protoc attaches comments to descriptors through `SourceCodeInfo`, a flat
//! list of locations keyed by numeric paths into the descriptor tree. Lookups
//! here match a path exactly; prefixes never match.

use prost_types::source_code_info::Location;

/// Find the comment attached to the descriptor at `path`
///
/// The leading comment wins when non-empty, otherwise the trailing comment is
/// used. Returns `None` when no location matches or both comments are empty.
pub fn find_comment<'a>(locations: &'a [Location], path: &[i32]) -> Option<&'a str> {
    locations
        .iter()
        .find(|location| location.path == path)
        .and_then(comment_of)
}

/// Select the comment text of a single location
fn comment_of(location: &Location) -> Option<&str> {
    let leading = location.leading_comments.as_deref().unwrap_or_default();
    if !leading.is_empty() {
        return Some(leading);
    }

    location
        .trailing_comments
        .as_deref()
        .filter(|trailing| !trailing.is_empty())
}

/// Render a comment as a KDoc block
///
/// The first line (`/**`) is not indented so the block can be placed after
/// the template's own indentation; every following line is prefixed with
/// `indent` spaces.
pub fn format_kdoc(comment: &str, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    let escaped = escape_html(comment);

    let mut lines: Vec<&str> = escaped.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut out = String::from("/**\n");
    out.push_str(&format!("{prefix} * <pre>\n"));
    for line in lines {
        out.push_str(&format!("{prefix} * {line}\n"));
    }
    out.push_str(&format!("{prefix} * </pre>\n"));
    out.push_str(&format!("{prefix} */"));
    out
}

/// Escape the HTML metacharacters that would break a `<pre>` block
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(path: Vec<i32>, leading: Option<&str>, trailing: Option<&str>) -> Location {
        Location {
            path,
            leading_comments: leading.map(str::to_string),
            trailing_comments: trailing.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_leading_comment_preferred() {
        let locations = vec![location(vec![6, 0], Some(" leading\n"), Some(" trailing\n"))];
        assert_eq!(find_comment(&locations, &[6, 0]), Some(" leading\n"));
    }

    #[test]
    fn test_trailing_comment_fallback() {
        let locations = vec![
            location(vec![6, 0], None, Some(" trailing\n")),
            location(vec![6, 1], Some(""), Some(" other\n")),
        ];
        assert_eq!(find_comment(&locations, &[6, 0]), Some(" trailing\n"));
        assert_eq!(find_comment(&locations, &[6, 1]), Some(" other\n"));
    }

    #[test]
    fn test_no_comment_is_none() {
        let locations = vec![
            location(vec![6, 0], None, None),
            location(vec![6, 1], Some(""), Some("")),
        ];
        assert_eq!(find_comment(&locations, &[6, 0]), None);
        assert_eq!(find_comment(&locations, &[6, 1]), None);
        assert_eq!(find_comment(&locations, &[6, 2]), None);
    }

    #[test]
    fn test_path_must_match_exactly() {
        let locations = vec![
            location(vec![6, 0, 2, 0], Some(" method\n"), None),
            location(vec![6, 0, 2, 0, 1], Some(" name\n"), None),
        ];
        assert_eq!(find_comment(&locations, &[6, 0]), None);
        assert_eq!(find_comment(&locations, &[6, 0, 2, 0]), Some(" method\n"));
    }

    #[test]
    fn test_format_kdoc() {
        let kdoc = format_kdoc(" Sends a greeting\n to <someone>\n", 4);
        assert_eq!(
            kdoc,
            "/**\n     * <pre>\n     *  Sends a greeting\n     *  to &lt;someone&gt;\n     * </pre>\n     */"
        );
    }

    #[test]
    fn test_format_kdoc_without_indent() {
        let kdoc = format_kdoc("Tom & Jerry's \"show\"", 0);
        assert_eq!(
            kdoc,
            "/**\n * <pre>\n * Tom &amp; Jerry&#39;s &quot;show&quot;\n * </pre>\n */"
        );
    }
}
