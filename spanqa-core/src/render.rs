//! Span to answer text

use crate::span::Span;

/// Answer emitted when the selected position has no paragraph token
pub const NO_ANSWER: &str = "-";

/// Render `span` against the paragraph tokens.
///
/// `valid_len` is the real token count of the untruncated paragraph. Spans
/// ending at or past it collapse to the start token, or to [`NO_ANSWER`] when
/// the start index has no token either.
pub fn render(span: &Span, tokens: &[String], valid_len: usize) -> String {
    let token_at = |index: usize| {
        tokens
            .get(index)
            .map(String::as_str)
            .unwrap_or(NO_ANSWER)
            .to_string()
    };

    if span.end() >= valid_len || span.start() == span.end() {
        return token_at(span.start());
    }

    match tokens.get(span.start()..=span.end().min(tokens.len().saturating_sub(1))) {
        Some(slice) if !slice.is_empty() => slice.join(" "),
        _ => NO_ANSWER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 15).unwrap()
    }

    #[test]
    fn test_single_token() {
        let toks = tokens("the quick brown fox jumps");
        assert_eq!(render(&span(2, 2), &toks, 5), "brown");
    }

    #[test]
    fn test_multi_token() {
        let toks = tokens("the quick brown fox jumps");
        assert_eq!(render(&span(1, 3), &toks, 5), "quick brown fox");
        assert_eq!(render(&span(0, 4), &toks, 5), "the quick brown fox jumps");
    }

    #[test]
    fn test_end_past_valid_len_uses_start_token() {
        let toks = tokens("the quick brown fox jumps");
        assert_eq!(render(&span(3, 7), &toks, 5), "fox");
        assert_eq!(render(&span(4, 5), &toks, 5), "jumps");
    }

    #[test]
    fn test_start_out_of_range_is_sentinel() {
        let toks = tokens("the quick brown fox jumps");
        assert_eq!(render(&span(9, 9), &toks, 5), NO_ANSWER);
        assert_eq!(render(&span(6, 10), &toks, 5), NO_ANSWER);
    }

    #[test]
    fn test_empty_paragraph() {
        assert_eq!(render(&span(0, 0), &[], 0), NO_ANSWER);
    }

    #[test]
    fn test_tokens_shorter_than_valid_len() {
        let toks = tokens("alpha beta");
        assert_eq!(render(&span(0, 3), &toks, 6), "alpha beta");
        assert_eq!(render(&span(3, 4), &toks, 6), NO_ANSWER);
    }
}
