//! Regex-driven rewriting of whole documents.

use regex::{Captures, Regex};

/// Result of rewriting a document in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Number of matches that were actually replaced.
    pub replacements: usize,
}

impl Rewrite {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            replacements: 0,
        }
    }
}

/// Replace every match of `pattern` in `text` with the output of `replace`.
///
/// Returning `None` from `replace` keeps the matched text as-is and the match
/// is not counted.
pub fn rewrite<F>(text: &str, pattern: &Regex, mut replace: F) -> Rewrite
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let mut replacements = 0;
    let updated = pattern.replace_all(text, |caps: &Captures<'_>| match replace(caps) {
        Some(replacement) => {
            replacements += 1;
            replacement
        }
        None => caps[0].to_string(),
    });
    Rewrite {
        text: updated.into_owned(),
        replacements,
    }
}

/// Named capture group or empty string when the group did not participate.
pub fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_replaced_matches() {
        let re = Regex::new(r"\d+").expect("regex");
        let out = rewrite("a1 b22 c333", &re, |caps| {
            (caps[0].len() > 1).then(|| "N".to_string())
        });
        assert_eq!(out.text, "a1 bN cN");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn replacement_values_are_taken_literally() {
        let re = Regex::new(r"url=(?P<v>\S+)").expect("regex");
        let out = rewrite("url=old", &re, |_| Some("url=$v${v}".to_string()));
        assert_eq!(out.text, "url=$v${v}");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn no_match_leaves_text_untouched() {
        let re = Regex::new("missing").expect("regex");
        let out = rewrite("nothing here\n", &re, |_| Some("x".to_string()));
        assert_eq!(out, Rewrite::unchanged("nothing here\n"));
    }
}
