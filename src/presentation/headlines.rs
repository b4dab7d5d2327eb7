//! Splitting a multi-line submission into headlines.

/// One non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    /// 0-based position in the batch, after blank lines are dropped.
    pub position: usize,
    /// The line as typed, line terminator removed.
    pub raw: String,
    /// `raw` trimmed; this is what gets sent for analysis.
    pub text: String,
}

/// Split `input` on newlines, dropping blank and whitespace-only lines.
pub fn split_headlines(input: &str) -> Vec<Headline> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(position, line)| Headline {
            position,
            raw: line.to_string(),
            text: line.trim().to_string(),
        })
        .collect()
}

/// The texts to submit, in batch order.
pub fn texts(headlines: &[Headline]) -> Vec<String> {
    headlines.iter().map(|h| h.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_excluded_and_positions_compact() {
        let hs = split_headlines("Fed holds rates\n\n   \n\tApple beats estimates  \n");
        assert_eq!(hs.len(), 2);
        assert_eq!(hs[0].position, 0);
        assert_eq!(hs[0].text, "Fed holds rates");
        assert_eq!(hs[1].position, 1);
        assert_eq!(hs[1].raw, "\tApple beats estimates  ");
        assert_eq!(hs[1].text, "Apple beats estimates");
    }

    #[test]
    fn crlf_line_endings() {
        let hs = split_headlines("one\r\ntwo\r\n\r\nthree");
        assert_eq!(texts(&hs), vec!["one", "two", "three"]);
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert!(split_headlines("").is_empty());
        assert!(split_headlines(" \n\t\n  ").is_empty());
    }
}
