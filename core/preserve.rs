//! Preserve patterns: regexes whose matches must survive stripping even when
//! they sit inside a comment. The matched substring is spliced back; the
//! rest of the comment stays eligible for removal.

use crate::CoreError;
use crate::stripper::CommentMatch;
use regex::Regex;

const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    (r"#[0-9a-fA-F]{3,8}\b", "hex color codes"),
    (r#"https?://[^\s'"<>()\[\]]+"#, "http(s) URLs"),
    (r"#![^\r\n]*", "shebang lines"),
    (
        r"#\s*(include|define|ifndef|ifdef|endif|elif|else|if|pragma|undef)\b[^\r\n]*",
        "C preprocessor directives",
    ),
];

#[derive(Debug, Clone)]
pub struct PreservePattern {
    pub regex: Regex,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct PreserveSet {
    patterns: Vec<PreservePattern>,
}

impl Default for PreserveSet {
    fn default() -> Self {
        Self::build(&[], false).expect("default preserve patterns compile")
    }
}

impl PreserveSet {
    /// Compiles the default patterns plus `user` ones; `override_defaults`
    /// drops the defaults entirely. An invalid user regex is a setup error,
    /// surfaced before any file is touched.
    pub fn build(user: &[String], override_defaults: bool) -> Result<Self, CoreError> {
        let mut patterns = Vec::new();
        if !override_defaults {
            for (raw, description) in DEFAULT_PATTERNS {
                let regex = Regex::new(raw)
                    .map_err(|e| CoreError::Config(format!("default pattern {raw:?}: {e}")))?;
                patterns.push(PreservePattern {
                    regex,
                    description: (*description).to_string(),
                });
            }
        }
        for raw in user {
            let regex = Regex::new(raw).map_err(|e| {
                CoreError::Config(format!("invalid preserve pattern {raw:?}: {e}"))
            })?;
            patterns.push(PreservePattern {
                regex,
                description: format!("user pattern {raw}"),
            });
        }
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[PreservePattern] {
        &self.patterns
    }

    /// Turns comment spans into removal spans. Every preserve match inside a
    /// comment is subtracted from it; what remains of the comment is
    /// removed. Input spans must be sorted and disjoint; the output keeps
    /// that property.
    pub fn carve(&self, content: &str, comments: &[CommentMatch]) -> Vec<CommentMatch> {
        let mut removal = Vec::with_capacity(comments.len());
        for comment in comments {
            let text = &content[comment.from..comment.to];
            let mut kept: Vec<(usize, usize)> = Vec::new();
            for pattern in &self.patterns {
                for hit in pattern.regex.find_iter(text) {
                    kept.push((comment.from + hit.start(), comment.from + hit.end()));
                }
            }
            if kept.is_empty() {
                removal.push(*comment);
                continue;
            }
            kept.sort_unstable();
            let mut cursor = comment.from;
            for (keep_from, keep_to) in kept {
                if keep_from > cursor {
                    removal.push(CommentMatch {
                        from: cursor,
                        to: keep_from,
                    });
                }
                cursor = cursor.max(keep_to);
            }
            if cursor < comment.to {
                removal.push(CommentMatch {
                    from: cursor,
                    to: comment.to,
                });
            }
        }
        removal
    }
}
