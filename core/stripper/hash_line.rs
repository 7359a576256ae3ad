//! `#` line comments for shell, Perl, YAML, TOML, Dockerfile, conf and
//! Makefile sources. A hash opens a comment only at the start of a word,
//! so `${#var}` and URL fragments like `http://host/x#y` survive. Double
//! quotes honor backslash escapes; single quotes are literal, matching
//! shell and TOML semantics.

use super::common::{CommentMatch, End, LanguageScan, Start, StripError, find_comments_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Boundary,
    Word,
    Comment,
    StringDbl,
    StringDblEsc,
    StringSgl,
    End,
}
impl Start for ParseState {
    fn start() -> Self {
        ParseState::Boundary
    }
}
impl End for ParseState {
    fn end() -> Self {
        ParseState::End
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseAction {
    Nothing,
    CommentStart,
    CommentEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentTrackState {
    NotInComment,
    InComment(usize),
}
impl Start for CommentTrackState {
    fn start() -> Self {
        CommentTrackState::NotInComment
    }
}

fn state_transition(from: ParseState, current_char: Option<char>) -> (ParseState, ParseAction) {
    match current_char {
        Some(c) => match from {
            ParseState::Boundary => match c {
                '#' => (ParseState::Comment, ParseAction::CommentStart),
                '"' => (ParseState::StringDbl, ParseAction::Nothing),
                '\'' => (ParseState::StringSgl, ParseAction::Nothing),
                ' ' | '\t' | '\n' => (ParseState::Boundary, ParseAction::Nothing),
                _ => (ParseState::Word, ParseAction::Nothing),
            },
            ParseState::Word => match c {
                ' ' | '\t' | '\n' => (ParseState::Boundary, ParseAction::Nothing),
                '"' => (ParseState::StringDbl, ParseAction::Nothing),
                '\'' => (ParseState::StringSgl, ParseAction::Nothing),
                _ => (ParseState::Word, ParseAction::Nothing),
            },
            ParseState::Comment => match c {
                '\n' => (ParseState::Boundary, ParseAction::CommentEnd),
                _ => (ParseState::Comment, ParseAction::Nothing),
            },
            ParseState::StringDbl => match c {
                '"' => (ParseState::Word, ParseAction::Nothing),
                '\\' => (ParseState::StringDblEsc, ParseAction::Nothing),
                _ => (ParseState::StringDbl, ParseAction::Nothing),
            },
            ParseState::StringDblEsc => (ParseState::StringDbl, ParseAction::Nothing),
            ParseState::StringSgl => match c {
                '\'' => (ParseState::Word, ParseAction::Nothing),
                _ => (ParseState::StringSgl, ParseAction::Nothing),
            },
            ParseState::End => (ParseState::End, ParseAction::Nothing),
        },
        None => match from {
            ParseState::Comment => (ParseState::End, ParseAction::CommentEnd),
            _ => (ParseState::End, ParseAction::Nothing),
        },
    }
}

fn do_action(
    action: ParseAction,
    mut comment_state: CommentTrackState,
    position: usize,
    mut scan: LanguageScan,
) -> Result<(CommentTrackState, LanguageScan), StripError> {
    match action {
        ParseAction::Nothing => {}
        ParseAction::CommentStart => {
            if let CommentTrackState::NotInComment = comment_state {
                comment_state = CommentTrackState::InComment(position);
            }
        }
        ParseAction::CommentEnd => {
            if let CommentTrackState::InComment(from) = comment_state {
                scan.matches.push(CommentMatch { from, to: position });
                comment_state = CommentTrackState::NotInComment;
            }
        }
    }
    Ok((comment_state, scan))
}

pub fn find_comments(input: &str) -> Result<LanguageScan, StripError> {
    find_comments_impl(input, state_transition, do_action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(input: &str) -> Vec<(usize, usize)> {
        find_comments(input)
            .unwrap()
            .matches
            .iter()
            .map(|m| (m.from, m.to))
            .collect()
    }

    #[test]
    fn finds_trailing_comment() {
        assert_eq!(spans("key: value # note\n"), vec![(11, 17)]);
    }

    #[test]
    fn whole_line_comment_starts_at_hash() {
        assert_eq!(spans("  # indented\nrun\n"), vec![(2, 12)]);
    }

    #[test]
    fn hash_inside_word_is_not_a_comment() {
        assert!(spans("url=http://host/page#frag\n").is_empty());
        assert!(spans("echo ${#array[@]}\n").is_empty());
    }

    #[test]
    fn hash_inside_strings_is_ignored() {
        assert!(spans("msg=\"channel #general\"\n").is_empty());
        assert!(spans("lit='#not-a-comment'\n").is_empty());
    }

    #[test]
    fn escaped_double_quote_keeps_string_open() {
        assert!(spans("s=\"a \\\" # b\"\n").is_empty());
    }

    #[test]
    fn comment_at_eof_without_newline() {
        assert_eq!(spans("value = 1 # tail"), vec![(10, 16)]);
    }
}
