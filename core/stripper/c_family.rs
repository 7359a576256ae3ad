//! `//` and `/* */` recognition for the C-like half of the catalog: C, C++,
//! Java, JavaScript, TypeScript, Go, Rust, Swift, Kotlin and the CSS family.
//! Block comments do not nest; the first close token wins. Backtick strings
//! cover Go raw strings and JavaScript template literals.

use super::common::{CommentMatch, End, LanguageScan, Start, StripError, find_comments_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Normal,
    FirstSlash,
    LineComment,
    BlockComment,
    BlockCommentSawStar,
    StringDbl,
    StringDblEsc,
    StringSgl,
    StringSglEsc,
    StringTick,
    StringTickEsc,
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
    CommentMightStart,
    ConfirmLineComment,
    ConfirmBlockComment,
    DismissPotential,
    LineCommentEnd,
    BlockCommentEnd,
    BlockCommentEofEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentTrackState {
    NotIn,
    SawFirstSlash { slash_idx: usize },
    InLine { start_idx: usize },
    InBlock { start_idx: usize },
}
impl Start for CommentTrackState {
    fn start() -> Self {
        CommentTrackState::NotIn
    }
}

fn state_transition(from: ParseState, current_char: Option<char>) -> (ParseState, ParseAction) {
    match current_char {
        Some(c) => match from {
            ParseState::Normal => match c {
                '/' => (ParseState::FirstSlash, ParseAction::CommentMightStart),
                '"' => (ParseState::StringDbl, ParseAction::Nothing),
                '\'' => (ParseState::StringSgl, ParseAction::Nothing),
                '`' => (ParseState::StringTick, ParseAction::Nothing),
                _ => (ParseState::Normal, ParseAction::Nothing),
            },
            ParseState::FirstSlash => match c {
                '/' => (ParseState::LineComment, ParseAction::ConfirmLineComment),
                '*' => (ParseState::BlockComment, ParseAction::ConfirmBlockComment),
                '"' => (ParseState::StringDbl, ParseAction::DismissPotential),
                '\'' => (ParseState::StringSgl, ParseAction::DismissPotential),
                '`' => (ParseState::StringTick, ParseAction::DismissPotential),
                _ => (ParseState::Normal, ParseAction::DismissPotential),
            },
            ParseState::LineComment => match c {
                '\n' => (ParseState::Normal, ParseAction::LineCommentEnd),
                _ => (ParseState::LineComment, ParseAction::Nothing),
            },
            ParseState::BlockComment => match c {
                '*' => (ParseState::BlockCommentSawStar, ParseAction::Nothing),
                _ => (ParseState::BlockComment, ParseAction::Nothing),
            },
            ParseState::BlockCommentSawStar => match c {
                '/' => (ParseState::Normal, ParseAction::BlockCommentEnd),
                '*' => (ParseState::BlockCommentSawStar, ParseAction::Nothing),
                _ => (ParseState::BlockComment, ParseAction::Nothing),
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
            ParseState::StringTick => match c {
                '`' => (ParseState::Normal, ParseAction::Nothing),
                '\\' => (ParseState::StringTickEsc, ParseAction::Nothing),
                _ => (ParseState::StringTick, ParseAction::Nothing),
            },
            ParseState::StringTickEsc => (ParseState::StringTick, ParseAction::Nothing),
            ParseState::End => (ParseState::End, ParseAction::Nothing),
        },
        None => match from {
            ParseState::FirstSlash => (ParseState::End, ParseAction::DismissPotential),
            ParseState::LineComment => (ParseState::End, ParseAction::LineCommentEnd),
            ParseState::BlockComment | ParseState::BlockCommentSawStar => {
                (ParseState::End, ParseAction::BlockCommentEofEnd)
            }
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
        ParseAction::CommentMightStart => {
            if let CommentTrackState::NotIn = comment_state {
                comment_state = CommentTrackState::SawFirstSlash {
                    slash_idx: position,
                };
            }
        }
        ParseAction::ConfirmLineComment => {
            if let CommentTrackState::SawFirstSlash { slash_idx } = comment_state {
                comment_state = CommentTrackState::InLine {
                    start_idx: slash_idx,
                };
            } else {
                comment_state = CommentTrackState::NotIn;
            }
        }
        ParseAction::ConfirmBlockComment => {
            if let CommentTrackState::SawFirstSlash { slash_idx } = comment_state {
                comment_state = CommentTrackState::InBlock {
                    start_idx: slash_idx,
                };
            } else {
                comment_state = CommentTrackState::NotIn;
            }
        }
        ParseAction::DismissPotential => {
            if let CommentTrackState::SawFirstSlash { .. } = comment_state {
                comment_state = CommentTrackState::NotIn;
            }
        }
        ParseAction::LineCommentEnd => {
            if let CommentTrackState::InLine { start_idx } = comment_state {
                scan.matches.push(CommentMatch {
                    from: start_idx,
                    to: position,
                });
            }
            comment_state = CommentTrackState::NotIn;
        }
        ParseAction::BlockCommentEnd => {
            if let CommentTrackState::InBlock { start_idx } = comment_state {
                scan.matches.push(CommentMatch {
                    from: start_idx,
                    to: position + 1,
                });
            }
            comment_state = CommentTrackState::NotIn;
        }
        ParseAction::BlockCommentEofEnd => {
            if let CommentTrackState::InBlock { start_idx } = comment_state {
                scan.matches.push(CommentMatch {
                    from: start_idx,
                    to: position,
                });
                scan.unterminated = true;
            }
            comment_state = CommentTrackState::NotIn;
        }
    }
    Ok((comment_state, scan))
}

pub fn find_comments(input: &str) -> Result<LanguageScan, StripError> {
    find_comments_impl(input, state_transition, do_action)
}
