//! Python `#` comments. The bulk of the machine exists to track the string
//! forms a hash may hide in: single- and double-quoted strings, their
//! triple-quoted variants, and backslash escapes. Docstrings are strings,
//! not comments, and are left alone.

use super::common::{CommentMatch, End, LanguageScan, Start, StripError, find_comments_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Normal,
    Comment,
    StringDbl,
    StringDblEsc,
    StringSgl,
    StringSglEsc,
    MaybeTripleDbl,
    MaybeTripleDbl2,
    InTripleDbl,
    TripleDblEsc,
    TripleDblSaw1,
    TripleDblSaw2,
    MaybeTripleSgl,
    MaybeTripleSgl2,
    InTripleSgl,
    TripleSglEsc,
    TripleSglSaw1,
    TripleSglSaw2,
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
    use ParseAction::*;
    use ParseState::*;
    match current_char {
        Some(c) => match from {
            Normal => match c {
                '#' => (Comment, CommentStart),
                '"' => (MaybeTripleDbl, Nothing),
                '\'' => (MaybeTripleSgl, Nothing),
                _ => (Normal, Nothing),
            },
            Comment => match c {
                '\n' => (Normal, CommentEnd),
                _ => (Comment, Nothing),
            },

            MaybeTripleDbl => match c {
                '"' => (MaybeTripleDbl2, Nothing),
                '\\' => (StringDblEsc, Nothing),
                '\n' => (Normal, Nothing),
                _ => (StringDbl, Nothing),
            },
            MaybeTripleDbl2 => match c {
                '"' => (InTripleDbl, Nothing),
                '#' => (Comment, CommentStart),
                '\'' => (MaybeTripleSgl, Nothing),
                '\n' => (Normal, Nothing),
                _ => (Normal, Nothing),
            },
            StringDbl => match c {
                '"' => (Normal, Nothing),
                '\\' => (StringDblEsc, Nothing),
                '\n' => (Normal, Nothing),
                _ => (StringDbl, Nothing),
            },
            StringDblEsc => (StringDbl, Nothing),
            InTripleDbl => match c {
                '"' => (TripleDblSaw1, Nothing),
                '\\' => (TripleDblEsc, Nothing),
                _ => (InTripleDbl, Nothing),
            },
            TripleDblEsc => (InTripleDbl, Nothing),
            TripleDblSaw1 => match c {
                '"' => (TripleDblSaw2, Nothing),
                '\\' => (TripleDblEsc, Nothing),
                _ => (InTripleDbl, Nothing),
            },
            TripleDblSaw2 => match c {
                '"' => (Normal, Nothing),
                '\\' => (TripleDblEsc, Nothing),
                _ => (InTripleDbl, Nothing),
            },

            MaybeTripleSgl => match c {
                '\'' => (MaybeTripleSgl2, Nothing),
                '\\' => (StringSglEsc, Nothing),
                '\n' => (Normal, Nothing),
                _ => (StringSgl, Nothing),
            },
            MaybeTripleSgl2 => match c {
                '\'' => (InTripleSgl, Nothing),
                '#' => (Comment, CommentStart),
                '"' => (MaybeTripleDbl, Nothing),
                '\n' => (Normal, Nothing),
                _ => (Normal, Nothing),
            },
            StringSgl => match c {
                '\'' => (Normal, Nothing),
                '\\' => (StringSglEsc, Nothing),
                '\n' => (Normal, Nothing),
                _ => (StringSgl, Nothing),
            },
            StringSglEsc => (StringSgl, Nothing),
            InTripleSgl => match c {
                '\'' => (TripleSglSaw1, Nothing),
                '\\' => (TripleSglEsc, Nothing),
                _ => (InTripleSgl, Nothing),
            },
            TripleSglEsc => (InTripleSgl, Nothing),
            TripleSglSaw1 => match c {
                '\'' => (TripleSglSaw2, Nothing),
                '\\' => (TripleSglEsc, Nothing),
                _ => (InTripleSgl, Nothing),
            },
            TripleSglSaw2 => match c {
                '\'' => (Normal, Nothing),
                '\\' => (TripleSglEsc, Nothing),
                _ => (InTripleSgl, Nothing),
            },

            End => (End, Nothing),
        },
        None => match from {
            Comment => (End, CommentEnd),
            _ => (End, Nothing),
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
