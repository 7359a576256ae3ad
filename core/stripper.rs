pub mod c_family;
pub mod common;
pub mod hash_line;
pub mod html;
pub mod python;
pub mod ruby;

pub use common::{CommentMatch, LanguageScan, StripError};

use crate::language::Grammar;
use crate::preserve::PreserveSet;

pub fn find_language_comments(content: &str, grammar: Grammar) -> Result<LanguageScan, StripError> {
    match grammar {
        Grammar::CFamily => c_family::find_comments(content),
        Grammar::HashLine => hash_line::find_comments(content),
        Grammar::Python => python::find_comments(content),
        Grammar::Ruby => ruby::find_comments(content),
        Grammar::Html => html::find_comments(content, true),
        Grammar::Xml => html::find_comments(content, false),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    pub content: String,
    /// Comment spans that lost at least one byte.
    pub comments_removed: usize,
    /// A block comment ran to end of input without its close token.
    pub unterminated: bool,
}

/// Strips comments from `content`. Comment spans are found by the grammar's
/// machine, preserve matches are carved out of them, lines left with nothing
/// but removed comment text disappear entirely (terminator included), and
/// inline comments vanish while their line survives. Running the result
/// through `strip` again yields no further change.
pub fn strip(
    content: &str,
    grammar: Grammar,
    preserve: &PreserveSet,
) -> Result<StripOutcome, StripError> {
    let mut scan = find_language_comments(content, grammar)?;
    if scan.matches.is_empty() {
        return Ok(StripOutcome {
            content: content.to_string(),
            comments_removed: 0,
            unterminated: scan.unterminated,
        });
    }
    scan.matches.sort_by_key(|m| m.from);

    let removal = preserve.carve(content, &scan.matches);
    let comments_removed = scan
        .matches
        .iter()
        .filter(|m| removal.iter().any(|r| r.from < m.to && r.to > m.from))
        .count();

    let mut spans = comment_only_lines(content, &removal);
    spans.extend(removal);
    let spans = common::merge_spans(spans);
    let stripped = common::remove_spans(content.to_string(), &spans)?;

    Ok(StripOutcome {
        content: stripped,
        comments_removed,
        unterminated: scan.unterminated,
    })
}

/// Lines whose visible content is entirely covered by removal spans are
/// deleted as whole lines, terminator included, so a file of comments
/// shrinks instead of turning into a ladder of blank lines.
fn comment_only_lines(content: &str, removal: &[CommentMatch]) -> Vec<CommentMatch> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    for line in content.split_inclusive('\n') {
        let line_end = line_start + line.len();
        let body = line.trim_end_matches('\n').trim_end_matches('\r');
        let trimmed = body.trim();
        if !trimmed.is_empty() {
            let from = line_start + (body.len() - body.trim_start().len());
            let to = from + trimmed.len();
            if covered(from, to, removal) {
                lines.push(CommentMatch {
                    from: line_start,
                    to: line_end,
                });
            }
        }
        line_start = line_end;
    }
    lines
}

/// True when every byte of `[from, to)` lies inside the sorted, disjoint
/// span list.
fn covered(from: usize, to: usize, spans: &[CommentMatch]) -> bool {
    let mut position = from;
    for span in spans {
        if span.to <= position {
            continue;
        }
        if span.from > position {
            return false;
        }
        position = span.to;
        if position >= to {
            return true;
        }
    }
    position >= to
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Grammar;

    fn strip_with_defaults(content: &str, grammar: Grammar) -> StripOutcome {
        strip(content, grammar, &PreserveSet::default()).unwrap()
    }

    #[test]
    fn comment_only_line_disappears_entirely() {
        let outcome = strip_with_defaults("# comment\nprint(1)\n", Grammar::Python);
        assert_eq!(outcome.content, "print(1)\n");
        assert_eq!(outcome.comments_removed, 1);
    }

    #[test]
    fn inline_comment_keeps_the_line() {
        let outcome = strip_with_defaults("print(1)  # why\n", Grammar::Python);
        assert_eq!(outcome.content, "print(1)  \n");
        assert_eq!(outcome.comments_removed, 1);
    }

    #[test]
    fn string_literal_contents_are_untouched() {
        let src = "x = \"// not a comment\";\n";
        let outcome = strip_with_defaults(src, Grammar::CFamily);
        assert_eq!(outcome.content, src);
        assert_eq!(outcome.comments_removed, 0);
    }

    #[test]
    fn preserve_match_survives_comment_removal() {
        let outcome = strip_with_defaults(".a {}\n/* color: #FF00FF */\n", Grammar::CFamily);
        assert!(outcome.content.contains("#FF00FF"));
        assert!(!outcome.content.contains("/*"));
        assert_eq!(outcome.comments_removed, 1);
    }

    #[test]
    fn fully_preserved_comment_counts_as_untouched() {
        let outcome = strip_with_defaults("#!/bin/sh\necho hi\n", Grammar::HashLine);
        assert_eq!(outcome.content, "#!/bin/sh\necho hi\n");
        assert_eq!(outcome.comments_removed, 0);
    }

    #[test]
    fn html_embedded_regions_strip_independently() {
        let src = "<style>/* css comment */ .a{}</style>\n<!-- html comment -->\n<p>text</p>\n";
        let outcome = strip_with_defaults(src, Grammar::Html);
        assert_eq!(outcome.content, "<style> .a{}</style>\n<p>text</p>\n");
    }

    #[test]
    fn file_of_only_comments_strips_to_nothing() {
        let outcome = strip_with_defaults("// one\n// two\n", Grammar::CFamily);
        assert_eq!(outcome.content, "");
        assert_eq!(outcome.comments_removed, 2);
    }

    #[test]
    fn unterminated_block_is_reported_and_removed() {
        let outcome = strip_with_defaults("code();\n/* open\nmore\n", Grammar::CFamily);
        assert!(outcome.unterminated);
        assert_eq!(outcome.content, "code();\n");
    }

    #[test]
    fn stripping_is_idempotent() {
        let samples: &[(&str, Grammar)] = &[
            ("int a; // x\n/* y */ int b;\n", Grammar::CFamily),
            ("# top\nx = 1  # note\ns = '#'\n", Grammar::Python),
            ("echo hi # note\n# see https://x.io\n", Grammar::HashLine),
            ("=begin\ndocs\n=end\nputs 1 # t\n", Grammar::Ruby),
            (
                "<!-- c -->\n<style>/* s */ body{}</style>\n<script>1; // j\n</script>\n",
                Grammar::Html,
            ),
        ];
        for (src, grammar) in samples {
            let once = strip_with_defaults(src, *grammar);
            let twice = strip_with_defaults(&once.content, *grammar);
            assert_eq!(once.content, twice.content, "not idempotent for {src:?}");
            assert_eq!(twice.comments_removed, 0);
        }
    }

    #[test]
    fn empty_input_is_unchanged() {
        let outcome = strip_with_defaults("", Grammar::CFamily);
        assert_eq!(outcome.content, "");
    }
}
