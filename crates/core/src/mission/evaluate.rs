#![forbid(unsafe_code)]

use super::rule::{DEFAULT_FAILURE_MESSAGE, DEFAULT_SUCCESS_MESSAGE, MissionCheck, MissionRule};
use crate::diff::{split_lines_keep_ends, strip_line_end};
use regex::Regex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub success: bool,
    pub feedback: String,
}

impl MissionRule {
    /// Static inspection only: the submitted code is never executed.
    /// `template` is the game's original code, used by line-count rules.
    pub fn evaluate(&self, code: &str, template: &str) -> ValidationOutcome {
        let success = self.check.passes(code, template);
        let feedback = if success {
            self.success_message.as_deref().unwrap_or(DEFAULT_SUCCESS_MESSAGE)
        } else {
            self.failure_message.as_deref().unwrap_or(DEFAULT_FAILURE_MESSAGE)
        };
        ValidationOutcome {
            success,
            feedback: feedback.to_string(),
        }
    }
}

impl MissionCheck {
    pub fn passes(&self, code: &str, template: &str) -> bool {
        match self {
            Self::CodeContains { text } => code.contains(text.as_str()),
            Self::VariableChanged {
                old_value,
                assignment,
                new_value,
                ..
            } => match assigned_expression(assignment, code) {
                Some(expr) => expr != old_value.as_str() && new_value.is_match(expr),
                None => false,
            },
            Self::CodePattern { pattern } => pattern.is_match(code),
            Self::LineCountIncreased { min_increase } => {
                count_non_blank_lines(code)
                    >= count_non_blank_lines(template).saturating_add(*min_increase)
            }
        }
    }
}

pub fn count_non_blank_lines(code: &str) -> usize {
    split_lines_keep_ends(code)
        .into_iter()
        .filter(|line| !strip_line_end(line).trim().is_empty())
        .count()
}

/// Right-hand side of the first `VAR = EXPR` in `code`, without a trailing
/// `#` comment. `VAR == EXPR` comparisons are not assignments.
fn assigned_expression<'a>(assignment: &Regex, code: &'a str) -> Option<&'a str> {
    assignment.captures_iter(code).find_map(|caps| {
        let rhs = caps.get(1)?.as_str();
        if rhs.starts_with('=') {
            return None;
        }
        Some(strip_comment(rhs).trim())
    })
}

/// Cuts at the first `#` that is not inside a `'...'` or `"..."` literal.
fn strip_comment(expr: &str) -> &str {
    let mut quote = None;
    for (at, ch) in expr.char_indices() {
        match (quote, ch) {
            (None, '#') => return &expr[..at],
            (None, '"' | '\'') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            _ => {}
        }
    }
    expr
}
