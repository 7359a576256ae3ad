//! Ruby comments come in two shapes: `#` to end of line, and `=begin` /
//! `=end` blocks that must sit at column zero. The block form is line
//! oriented, so it is resolved in a dedicated pass before the character
//! machine runs; hash matches that fall inside a block are discarded.

use super::common::{CommentMatch, End, LanguageScan, Start, StripError, find_comments_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Normal,
    Comment,
    StringDbl,
    StringDblEsc,
    StringSgl,
    StringSglEsc,
    End,
}
impl Start for ParseState {
    fn start() -> Self {
        ParseState::Normal
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
            ParseState::Normal => match c {
                '#' => (ParseState::Comment, ParseAction::CommentStart),
                '"' => (ParseState::StringDbl, ParseAction::Nothing),
                '\'' => (ParseState::StringSgl, ParseAction::Nothing),
                _ => (ParseState::Normal, ParseAction::Nothing),
            },
            ParseState::Comment => match c {
                '\n' => (ParseState::Normal, ParseAction::CommentEnd),
                _ => (ParseState::Comment, ParseAction::Nothing),
            },
            ParseState::StringDbl => match c {
                '"' => (ParseState::Normal, ParseAction::Nothing),
                '\\' => (ParseState::StringDblEsc, ParseAction::Nothing),
                _ => (ParseState::StringDbl, ParseAction::Nothing),
            },
            ParseState::StringDblEsc => (ParseState::StringDbl, ParseAction::Nothing),
            ParseState::StringSgl => match c {
                '\'' => (ParseState::Normal, ParseAction::Nothing),
                '\\' => (ParseState::StringSglEsc, ParseAction::Nothing),
                _ => (ParseState::StringSgl, ParseAction::Nothing),
            },
            ParseState::StringSglEsc => (ParseState::StringSgl, ParseAction::Nothing),
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

/// Line-oriented pass for `=begin` / `=end`. The close marker's own line is
/// part of the comment; its terminator is not, so whole-line removal stays a
/// later, shared decision.
fn block_spans(input: &str) -> (Vec<CommentMatch>, bool) {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let at = offset;
        offset += line.len();
        let body = line.trim_end_matches('\n').trim_end_matches('\r');
        if open.is_none() {
            if body == "=begin" || body.starts_with("=begin ") || body.starts_with("=begin\t") {
                open = Some(at);
            }
        } else if body == "=end" || body.starts_with("=end ") || body.starts_with("=end\t") {
            let from = open.take().unwrap_or(at);
            spans.push(CommentMatch {
                from,
                to: at + body.len(),
            });
        }
    }
    match open {
        Some(from) => {
            spans.push(CommentMatch {
                from,
                to: input.len(),
            });
            (spans, true)
        }
        None => (spans, false),
    }
}

pub fn find_comments(input: &str) -> Result<LanguageScan, StripError> {
    let (blocks, unterminated) = block_spans(input);
    let line_scan = find_comments_impl(input, state_transition, do_action)?;

    let mut matches: Vec<CommentMatch> = line_scan
        .matches
        .into_iter()
        .filter(|m| !blocks.iter().any(|b| m.from >= b.from && m.from < b.to))
        .collect();
    matches.extend(blocks);
    matches.sort_by_key(|m| m.from);
    Ok(LanguageScan {
        matches,
        unterminated,
    })
}
