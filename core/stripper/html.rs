//! Markup comments, `<!-- -->`, plus the embedded sub-grammars HTML allows:
//! the body of a `<style>` tag follows CSS comment rules and the body of a
//! `<script>` tag follows JavaScript rules, both covered by the c-family
//! machine. A literal closing tag always ends its region, matching how
//! browsers tokenize, even when it appears inside a sub-language string.
//! XML callers disable embedded regions and get pure markup comments.

use super::c_family;
use super::common::{CommentMatch, LanguageScan, StripError};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

pub fn find_comments(input: &str, embedded: bool) -> Result<LanguageScan, StripError> {
    let lower = input.to_ascii_lowercase();
    let bytes = input.as_bytes();
    let mut scan = LanguageScan::default();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if input[i..].starts_with(COMMENT_OPEN) {
            match input[i + COMMENT_OPEN.len()..].find(COMMENT_CLOSE) {
                Some(rel) => {
                    let to = i + COMMENT_OPEN.len() + rel + COMMENT_CLOSE.len();
                    scan.matches.push(CommentMatch { from: i, to });
                    i = to;
                }
                None => {
                    scan.matches.push(CommentMatch {
                        from: i,
                        to: input.len(),
                    });
                    scan.unterminated = true;
                    i = input.len();
                }
            }
            continue;
        }
        if embedded {
            if let Some(end) = embedded_region(input, &lower, &mut scan, i, "style")? {
                i = end;
                continue;
            }
            if let Some(end) = embedded_region(input, &lower, &mut scan, i, "script")? {
                i = end;
                continue;
            }
        }
        if is_tag_open(bytes, i) {
            i = skip_tag(bytes, i);
        } else {
            i += 1;
        }
    }
    Ok(scan)
}

/// Recognizes `<style ...>` / `<script ...>` at `at`, runs the c-family
/// machine over the body and returns the offset to resume markup scanning
/// at (the start of the closing tag, or end of input for an unclosed body).
fn embedded_region(
    input: &str,
    lower: &str,
    scan: &mut LanguageScan,
    at: usize,
    name: &str,
) -> Result<Option<usize>, StripError> {
    let rest = &lower[at + 1..];
    if !rest.starts_with(name) {
        return Ok(None);
    }
    match lower.as_bytes().get(at + 1 + name.len()) {
        Some(b' ' | b'\t' | b'\r' | b'\n' | b'>') => {}
        _ => return Ok(None),
    }

    let body_start = skip_tag(input.as_bytes(), at);
    let close_tag = format!("</{name}");
    let body_end = lower[body_start..]
        .find(&close_tag)
        .map_or(lower.len(), |rel| body_start + rel);

    let inner = c_family::find_comments(&input[body_start..body_end])?;
    scan.matches.extend(inner.matches.iter().map(|m| CommentMatch {
        from: body_start + m.from,
        to: body_start + m.to,
    }));
    scan.unterminated |= inner.unterminated;
    Ok(Some(body_end))
}

/// A `<` only opens a tag when followed by a name or `/`; `a < b` in text
/// stays text.
fn is_tag_open(bytes: &[u8], at: usize) -> bool {
    matches!(bytes.get(at + 1), Some(b) if b.is_ascii_alphabetic() || *b == b'/')
}

/// Advances past a tag's closing `>`, treating quoted attribute values as
/// opaque so `<div title="-->">` cannot end a comment or start a region.
fn skip_tag(bytes: &[u8], at: usize) -> usize {
    let mut i = at + 1;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') => quote = Some(b'"'),
            (None, b'\'') => quote = Some(b'\''),
            (None, b'>') => return i + 1,
            (None, _) => {}
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(input: &str, embedded: bool) -> Vec<(usize, usize)> {
        find_comments(input, embedded)
            .unwrap()
            .matches
            .iter()
            .map(|m| (m.from, m.to))
            .collect()
    }

    #[test]
    fn finds_markup_comment() {
        assert_eq!(spans("<p>hi</p><!-- bye -->", true), vec![(9, 21)]);
    }

    #[test]
    fn css_comment_inside_style_region() {
        let src = "<style>/* css */ .a{}</style>";
        assert_eq!(spans(src, true), vec![(7, 15)]);
    }

    #[test]
    fn js_comments_inside_script_region() {
        let src = "<script>\nvar x = 1; // note\n/* block */\n</script>";
        assert_eq!(spans(src, true), vec![(20, 27), (28, 39)]);
    }

    #[test]
    fn markup_comment_rules_do_not_apply_inside_script() {
        // "<!--" inside a script body is left to the JS grammar, which
        // treats it as plain tokens.
        let src = "<script>var s = \"<!-- not a comment -->\";</script>";
        assert!(spans(src, true).is_empty());
    }

    #[test]
    fn closing_tag_ends_region_even_inside_string() {
        let src = "<script>var s = \"</script>\"; // unreachable";
        assert!(spans(src, true).is_empty());
    }

    #[test]
    fn attribute_value_cannot_open_a_comment() {
        let src = "<div title=\"<!-- x -->\">body</div>";
        assert!(spans(src, true).is_empty());
    }

    #[test]
    fn uppercase_style_tag_is_recognized() {
        let src = "<STYLE>/* c */</STYLE>";
        assert_eq!(spans(src, true), vec![(7, 14)]);
    }

    #[test]
    fn xml_mode_ignores_embedded_regions() {
        let src = "<style>/* keep */</style><!-- drop -->";
        assert_eq!(spans(src, false), vec![(25, 38)]);
    }

    #[test]
    fn lone_angle_bracket_in_text_is_harmless() {
        let src = "a < b <!-- gone -->";
        assert_eq!(spans(src, true), vec![(6, 19)]);
    }

    #[test]
    fn unterminated_markup_comment_is_flagged() {
        let scan = find_comments("<p>x</p><!-- open", true).unwrap();
        assert!(scan.unterminated);
        assert_eq!(scan.matches, vec![CommentMatch { from: 8, to: 17 }]);
    }
}
