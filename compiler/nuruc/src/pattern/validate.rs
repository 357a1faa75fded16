//! Stage 2 (§4.2): pattern-level semantic rules that the lexer/parser's grammar alone
//! can't express because they depend on relationships between segments.

use nuru_ir::{DiagnosticCode, codes};

use super::syntax::{SyntaxSegment, SyntaxTree};

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub code: DiagnosticCode,
    pub message: String,
    pub offset: usize,
    pub is_error: bool,
}

pub fn validate(tree: &SyntaxTree) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_catch_all_placement(tree, &mut issues);
    validate_optional_positional_runs(tree, &mut issues);
    validate_option_form_uniqueness(tree, &mut issues);
    validate_end_of_options(tree, &mut issues);

    issues
}

/// Rule 1: at most one catch-all, and it must be the last positional segment.
fn validate_catch_all_placement(tree: &SyntaxTree, issues: &mut Vec<ValidationIssue>) {
    let positionals: Vec<_> = tree
        .segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            SyntaxSegment::Parameter(p) => Some((i, p)),
            _ => None,
        })
        .collect();
    let catch_alls: Vec<_> = positionals.iter().filter(|(_, p)| p.is_catch_all).collect();
    if catch_alls.len() > 1 {
        for (_, p) in catch_alls.iter().skip(1) {
            issues.push(ValidationIssue {
                code: codes::NURU_S007_CATCH_ALL_NOT_LAST,
                message: format!("pattern declares more than one catch-all parameter (`{{*{}}}`)", p.name),
                offset: p.offset,
                is_error: true,
            });
        }
    }
    if let Some(&&(idx, p)) = catch_alls.first() {
        if idx != positionals.last().map(|(i, _)| *i).unwrap_or(idx) {
            issues.push(ValidationIssue {
                code: codes::NURU_S007_CATCH_ALL_NOT_LAST,
                message: format!("catch-all parameter `{{*{}}}` must be the last positional segment", p.name),
                offset: p.offset,
                is_error: true,
            });
        }
    }
}

/// Rules 2 and 3: consecutive optional positionals are ambiguous; a required
/// positional after an optional one is a warning, after a catch-all it's an error.
fn validate_optional_positional_runs(tree: &SyntaxTree, issues: &mut Vec<ValidationIssue>) {
    let mut seen_optional = false;
    let mut seen_catch_all = false;
    let mut prev_was_optional = false;
    for seg in &tree.segments {
        let SyntaxSegment::Parameter(p) = seg else {
            continue;
        };
        if seen_catch_all {
            issues.push(ValidationIssue {
                code: codes::NURU_S002_REQUIRED_AFTER_CATCH_ALL,
                message: format!("positional parameter `{{{}}}` follows a catch-all parameter", p.name),
                offset: p.offset,
                is_error: true,
            });
        } else if !p.is_optional && !p.is_catch_all && seen_optional {
            issues.push(ValidationIssue {
                code: codes::NURU_S003_REQUIRED_AFTER_OPTIONAL,
                message: format!(
                    "required positional parameter `{{{}}}` follows an optional positional parameter",
                    p.name
                ),
                offset: p.offset,
                is_error: false,
            });
        } else if p.is_optional && prev_was_optional {
            issues.push(ValidationIssue {
                code: codes::NURU_S001_CONSECUTIVE_OPTIONAL,
                message: format!(
                    "consecutive optional positional parameters create an ambiguous binding at `{{{}}}`",
                    p.name
                ),
                offset: p.offset,
                is_error: true,
            });
        }
        prev_was_optional = p.is_optional && !p.is_catch_all;
        seen_optional |= p.is_optional && !p.is_catch_all;
        seen_catch_all |= p.is_catch_all;
    }
}

/// Rule 4/5: option long/short forms must be unique within the route (short form's
/// single-character constraint is already enforced while parsing).
fn validate_option_form_uniqueness(tree: &SyntaxTree, issues: &mut Vec<ValidationIssue>) {
    let mut seen_long: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut seen_short: std::collections::HashSet<char> = std::collections::HashSet::new();
    for seg in &tree.segments {
        let SyntaxSegment::Option(o) = seg else {
            continue;
        };
        if !seen_long.insert(&o.long) {
            issues.push(ValidationIssue {
                code: codes::NURU_S004_DUPLICATE_OPTION_FORM,
                message: format!("duplicate long option form `--{}`", o.long),
                offset: o.offset,
                is_error: true,
            });
        }
        if let Some(short) = o.short {
            if !seen_short.insert(short) {
                issues.push(ValidationIssue {
                    code: codes::NURU_S004_DUPLICATE_OPTION_FORM,
                    message: format!("duplicate short option form `-{short}`"),
                    offset: o.offset,
                    is_error: true,
                });
            }
        }
    }
}

/// Rule 6: `--` may appear at most once, and only once any option segment has been
/// seen (it separates option parsing from positional-only parsing).
fn validate_end_of_options(tree: &SyntaxTree, issues: &mut Vec<ValidationIssue>) {
    let mut count = 0;
    for seg in &tree.segments {
        if let SyntaxSegment::EndOfOptions { offset } = seg {
            count += 1;
            if count > 1 {
                issues.push(ValidationIssue {
                    code: codes::NURU_S006_DUPLICATE_END_OF_OPTIONS,
                    message: "`--` end-of-options separator may appear at most once".to_string(),
                    offset: *offset,
                    is_error: true,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pattern::{lexer::tokenize, parser::parse};

    use super::*;

    fn issues_for(pattern: &str) -> Vec<ValidationIssue> {
        let words = tokenize(pattern).unwrap();
        let tree = parse(pattern, &words).unwrap();
        validate(&tree)
    }

    #[test]
    fn consecutive_optionals_are_rejected() {
        let issues = issues_for("x {a?} {b?}");
        assert!(issues.iter().any(|i| i.code == codes::NURU_S001_CONSECUTIVE_OPTIONAL));
    }

    #[test]
    fn catch_all_must_be_last() {
        let issues = issues_for("x {*rest} {y}");
        assert!(issues.iter().any(|i| i.code == codes::NURU_S007_CATCH_ALL_NOT_LAST));
    }

    #[test]
    fn duplicate_long_option_form_is_rejected() {
        let issues = issues_for("x --force --force");
        assert!(issues.iter().any(|i| i.code == codes::NURU_S004_DUPLICATE_OPTION_FORM));
    }

    #[test]
    fn clean_pattern_has_no_issues() {
        let issues = issues_for("deploy {env} --force,-f");
        assert!(issues.is_empty());
    }
}
