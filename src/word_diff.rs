//! Positional word-level diff
//!
//! Tokens are compared by position only: token `i` of the new text is the
//! same when the old text has an identical token at `i`. An inserted or
//! deleted word therefore marks every later word as different. This matches
//! how changed cells have always been annotated and must stay positional.

use serde::{Deserialize, Serialize};

/// One whitespace-delimited token of the new value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub text: String,
    pub different: bool,
}

/// Word diff annotation for one cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDiff {
    pub tokens: Vec<WordToken>,
}

impl WordDiff {
    /// Compare `new_text` against `old_text` token by token
    pub fn compute(old_text: &str, new_text: &str) -> Self {
        let old_tokens: Vec<&str> = old_text.split_whitespace().collect();
        let tokens = new_text
            .split_whitespace()
            .enumerate()
            .map(|(i, token)| WordToken {
                text: token.to_string(),
                different: old_tokens.get(i) != Some(&token),
            })
            .collect();

        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn different_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.different).count()
    }

    /// Rejoin the tokens with single spaces, wrapping different ones
    pub fn render(&self, open: &str, close: &str) -> String {
        self.tokens
            .iter()
            .map(|t| {
                if t.different {
                    format!("{}{}{}", open, t.text, close)
                } else {
                    t.text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
