// Chat transcript domain models and citation scanning

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. The transcript is append-only and lives for the
/// chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A piece of assistant text after citation scanning.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    /// An inline `[Source: <id>]` token, carrying the extracted id.
    Citation(String),
}

const CITATION_OPEN: &str = "[Source: ";

/// Split assistant text on literal `[Source: <id>]` tokens, preserving
/// order. Unterminated brackets stay plain text; a token never spans
/// another opening bracket.
pub fn split_citations(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pos = 0; // start of pending plain text
    let mut search = 0; // where to look for the next candidate

    while let Some(found) = text[search..].find(CITATION_OPEN) {
        let open = search + found;
        let id_start = open + CITATION_OPEN.len();
        match text[id_start..].find(']') {
            Some(rel) if !text[id_start..id_start + rel].contains('[') => {
                if open > pos {
                    segments.push(Segment::Text(text[pos..open].to_string()));
                }
                segments.push(Segment::Citation(text[id_start..id_start + rel].to_string()));
                pos = id_start + rel + 1;
                search = pos;
            }
            // Unterminated, or another token opens before this one closes:
            // the candidate is plain text; keep scanning past its opener.
            _ => search = id_start,
        }
    }

    if pos < text.len() || segments.is_empty() {
        segments.push(Segment::Text(text[pos..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token() {
        let segments = split_citations("Rent is high [Source: ABC123] this year");
        assert_eq!(
            segments,
            vec![
                Segment::Text("Rent is high ".to_string()),
                Segment::Citation("ABC123".to_string()),
                Segment::Text(" this year".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_token_single_segment() {
        let segments = split_citations("No citations at all");
        assert_eq!(segments, vec![Segment::Text("No citations at all".to_string())]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_citations(""), vec![Segment::Text(String::new())]);
    }

    #[test]
    fn test_adjacent_tokens() {
        let segments = split_citations("[Source: A][Source: B]");
        assert_eq!(
            segments,
            vec![
                Segment::Citation("A".to_string()),
                Segment::Citation("B".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_bracket_stays_text() {
        let segments = split_citations("see [Source: ABC and nothing closes");
        assert_eq!(
            segments,
            vec![Segment::Text("see [Source: ABC and nothing closes".to_string())]
        );
    }

    #[test]
    fn test_token_does_not_span_another_open() {
        // The first open has no close of its own; only the inner token
        // should match.
        let segments = split_citations("a [Source: x [Source: B] tail");
        assert_eq!(
            segments,
            vec![
                Segment::Text("a [Source: x ".to_string()),
                Segment::Citation("B".to_string()),
                Segment::Text(" tail".to_string()),
            ]
        );
    }
}
