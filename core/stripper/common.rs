pub type StripError = &'static str;

/// Byte span of one comment, start delimiter included, end-of-line excluded
/// for line comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentMatch {
    pub from: usize,
    pub to: usize,
}

/// Everything one pass over a file produced: the comment spans plus whether a
/// block comment ran off the end of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageScan {
    pub matches: Vec<CommentMatch>,
    pub unterminated: bool,
}

pub trait Start: Sized {
    fn start() -> Self;
}

pub trait End: Sized {
    fn end() -> Self;
}

/// Drives a character-level scanner: `state_transition` advances the parse
/// state, `do_action` interprets the emitted action against the comment
/// tracking state and accumulates spans. The input is visited once, then the
/// transition function is fed `None` so end-of-input can close a pending
/// line comment or flag an unterminated block.
pub fn find_comments_impl<ParseState, ParseAction, CommentState, StateTransitionFn, DoActionFn>(
    input: &str,
    state_transition: StateTransitionFn,
    do_action: DoActionFn,
) -> Result<LanguageScan, StripError>
where
    ParseState: Start + End + Copy + Eq,
    ParseAction: Copy + Eq,
    CommentState: Start + Copy + Eq,
    StateTransitionFn: Fn(ParseState, Option<char>) -> (ParseState, ParseAction),
    DoActionFn: Fn(
        ParseAction,
        CommentState,
        usize,
        LanguageScan,
    ) -> Result<(CommentState, LanguageScan), StripError>,
{
    let mut scan = LanguageScan::default();
    let mut parse_state = ParseState::start();
    let mut comment_state = CommentState::start();
    let mut char_indices = input.char_indices();

    loop {
        let char_info = char_indices.next();
        let current_char = char_info.map(|(_, c)| c);
        let position = char_info.map_or(input.len(), |(idx, _)| idx);

        let (next_parse_state, action) = state_transition(parse_state, current_char);
        let (next_comment_state, next_scan) = do_action(action, comment_state, position, scan)?;

        parse_state = next_parse_state;
        comment_state = next_comment_state;
        scan = next_scan;

        if current_char.is_none() {
            if parse_state != ParseState::end() {
                return Err("Scanner did not reach its end state at end of input");
            }
            break;
        }
    }
    Ok(scan)
}

/// Collapses a possibly overlapping span list into a sorted, disjoint one.
pub fn merge_spans(mut spans: Vec<CommentMatch>) -> Vec<CommentMatch> {
    if spans.len() < 2 {
        return spans;
    }
    spans.sort_by_key(|s| s.from);
    let mut merged: Vec<CommentMatch> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.from <= last.to => last.to = last.to.max(span.to),
            _ => merged.push(span),
        }
    }
    merged
}

/// Deletes the given spans from `input`. Spans must be sorted, disjoint and
/// lie on character boundaries; both properties are checked before any byte
/// is touched.
pub fn remove_spans(mut input: String, spans: &[CommentMatch]) -> Result<String, StripError> {
    if spans.is_empty() {
        return Ok(input);
    }
    check_span_bounds(&input, spans)?;
    check_sorted_spans_disjoint(spans)?;

    for span in spans.iter().rev() {
        input.drain(span.from..span.to);
    }
    Ok(input)
}

fn check_span_bounds(input: &str, spans: &[CommentMatch]) -> Result<(), StripError> {
    let len = input.len();
    for span in spans {
        if span.from > len || span.to > len || span.from > span.to {
            return Err("Span indices out of bounds or inverted");
        }
        if !input.is_char_boundary(span.from) || !input.is_char_boundary(span.to) {
            return Err("Span does not lie on a character boundary");
        }
    }
    Ok(())
}

fn check_sorted_spans_disjoint(spans: &[CommentMatch]) -> Result<(), StripError> {
    let mut last_to = 0;
    for span in spans {
        if span.from < last_to {
            return Err("Spans are overlapping");
        }
        last_to = span.to;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_spans_drops_ranges_back_to_front() {
        let input = "abc // one\ndef // two".to_string();
        let spans = vec![
            CommentMatch { from: 4, to: 10 },
            CommentMatch { from: 15, to: 21 },
        ];
        let result = remove_spans(input, &spans).unwrap();
        assert_eq!(result, "abc \ndef ");
    }

    #[test]
    fn remove_spans_rejects_overlap() {
        let spans = vec![
            CommentMatch { from: 0, to: 5 },
            CommentMatch { from: 3, to: 8 },
        ];
        assert!(remove_spans("0123456789".to_string(), &spans).is_err());
    }

    #[test]
    fn remove_spans_rejects_out_of_bounds() {
        let spans = vec![CommentMatch { from: 2, to: 99 }];
        assert!(remove_spans("short".to_string(), &spans).is_err());
    }

    #[test]
    fn merge_spans_unions_overlapping_ranges() {
        let merged = merge_spans(vec![
            CommentMatch { from: 5, to: 9 },
            CommentMatch { from: 0, to: 6 },
            CommentMatch { from: 12, to: 14 },
        ]);
        assert_eq!(
            merged,
            vec![CommentMatch { from: 0, to: 9 }, CommentMatch { from: 12, to: 14 }]
        );
    }
}
