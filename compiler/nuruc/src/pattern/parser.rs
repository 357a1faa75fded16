//! Recursive-descent parsing of a route pattern's [`Word`]s into a [`SyntaxTree`].

use super::ParseError;
use super::lexer::Word;
use super::syntax::{OptionSyntax, ParameterSyntax, SyntaxSegment, SyntaxTree};

pub fn parse(_pattern: &str, words: &[Word]) -> Result<SyntaxTree, ParseError> {
    let mut segments = Vec::new();
    let mut end_of_options = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let word = &words[i];
        if word.text == "--" {
            end_of_options.push(word.offset);
            segments.push(SyntaxSegment::EndOfOptions { offset: word.offset });
            i += 1;
            continue;
        }
        if word.text.starts_with("--") || is_short_only_option(&word.text) {
            let mut option = parse_option_word(word)?;
            i += 1;
            if option.value.is_none() {
                if let Some(next) = words.get(i) {
                    if next.text.starts_with('{') {
                        option.value = Some(parse_parameter_word(next)?);
                        i += 1;
                    }
                }
            }
            segments.push(SyntaxSegment::Option(option));
            continue;
        }
        if word.text.starts_with('{') {
            segments.push(SyntaxSegment::Parameter(parse_parameter_word(word)?));
            i += 1;
            continue;
        }
        if word.text.starts_with('-') {
            return Err(ParseError::MalformedBrace {
                offset: word.offset,
                detail: format!("`{}` looks like an option but doesn't start with `--`", word.text),
            });
        }
        segments.push(SyntaxSegment::Literal {
            offset: word.offset,
            value: word.text.clone(),
        });
        i += 1;
    }
    Ok(SyntaxTree {
        segments,
        end_of_options,
    })
}

/// A single `-x` word with no `--long` form preceding it is not legal standalone
/// syntax per the grammar (short forms only ever follow a long form after a comma),
/// but we still recognize the shape here so the parser can hand the validator a
/// precise diagnostic instead of silently treating it as a literal.
fn is_short_only_option(text: &str) -> bool {
    text.starts_with('-') && !text.starts_with("--") && text.len() >= 2
}

fn parse_option_word(word: &Word) -> Result<OptionSyntax, ParseError> {
    let mut rest = word.text.as_str();
    let mut description = None;
    if let Some((head, desc)) = split_last_unescaped(rest, '|') {
        rest = head;
        description = Some(desc.to_string());
    }
    let is_optional = rest.ends_with('?');
    if is_optional {
        rest = &rest[..rest.len() - 1];
    }
    let (long_part, short_part) = match rest.split_once(',') {
        Some((l, s)) => (l, Some(s)),
        None => (rest, None),
    };
    let long = long_part
        .strip_prefix("--")
        .ok_or_else(|| ParseError::MalformedBrace {
            offset: word.offset,
            detail: format!("option `{rest}` is missing its `--long` form"),
        })?
        .to_string();
    if long.is_empty() {
        return Err(ParseError::MalformedBrace {
            offset: word.offset,
            detail: "long option form must have at least one character".to_string(),
        });
    }
    let short = match short_part {
        Some(s) => {
            let s = s.strip_prefix('-').unwrap_or(s);
            let mut chars = s.chars();
            let c = chars.next().ok_or_else(|| ParseError::MalformedBrace {
                offset: word.offset,
                detail: "short option form cannot be empty".to_string(),
            })?;
            if chars.next().is_some() {
                return Err(ParseError::UnknownModifier {
                    offset: word.offset,
                    modifier: s.to_string(),
                });
            }
            Some(c)
        }
        None => None,
    };
    Ok(OptionSyntax {
        offset: word.offset,
        long,
        short,
        is_optional,
        value: None,
        description,
    })
}

fn parse_parameter_word(word: &Word) -> Result<ParameterSyntax, ParseError> {
    let text = word.text.as_str();
    let inner = text
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| ParseError::MalformedBrace {
            offset: word.offset,
            detail: format!("`{text}` is not a well-formed `{{...}}` parameter"),
        })?;

    let mut rest = inner;
    let mut description = None;
    if let Some((head, desc)) = split_last_unescaped(rest, '|') {
        rest = head;
        description = Some(desc.to_string());
    }

    let is_optional = rest.ends_with('?');
    if is_optional {
        rest = &rest[..rest.len() - 1];
    }

    let (name_and_type, is_catch_all) = if let Some(stripped) = rest.strip_prefix('*') {
        (stripped, true)
    } else {
        (rest, false)
    };

    let (name, type_id) = match name_and_type.split_once(':') {
        Some((n, t)) => (n, Some(t)),
        None => (name_and_type, None),
    };

    if name.is_empty() {
        return Err(ParseError::MalformedBrace {
            offset: word.offset,
            detail: "parameter name cannot be empty".to_string(),
        });
    }

    let type_id = match type_id {
        Some(raw) => {
            if nuru_ir::canonical_type_name(raw).is_none() && !is_plausible_enum_name(raw) {
                return Err(ParseError::InvalidTypeId {
                    offset: word.offset,
                    raw: raw.to_string(),
                });
            }
            Some(raw.to_string())
        }
        None => None,
    };

    Ok(ParameterSyntax {
        offset: word.offset,
        is_catch_all,
        name: name.to_string(),
        type_id,
        is_optional,
        description,
    })
}

/// A bare identifier that isn't a known builtin is assumed to name a user-defined enum
/// resolved later (§4.1); we only reject type ids that can't plausibly be an
/// identifier at all (e.g. they contain whitespace or punctuation).
fn is_plausible_enum_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
        && raw.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Split on the last unescaped occurrence of `sep`, used for the trailing `|desc`
/// suffix shared by parameters and options.
fn split_last_unescaped(s: &str, sep: char) -> Option<(&str, &str)> {
    s.rfind(sep).map(|idx| (&s[..idx], &s[idx + sep.len_utf8()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::lexer::tokenize;

    fn tree(pattern: &str) -> SyntaxTree {
        let words = tokenize(pattern).unwrap();
        parse(pattern, &words).unwrap()
    }

    #[test]
    fn parses_literal_and_typed_optional_parameter() {
        let t = tree("sleep {seconds:int?}");
        assert_eq!(t.segments.len(), 2);
        match &t.segments[1] {
            SyntaxSegment::Parameter(p) => {
                assert_eq!(p.name, "seconds");
                assert_eq!(p.type_id.as_deref(), Some("int"));
                assert!(p.is_optional);
                assert!(!p.is_catch_all);
            }
            other => panic!("expected parameter, got {other:?}"),
        }
    }

    #[test]
    fn parses_option_with_separate_value_word() {
        let t = tree("git checkout --branch,-b {name}");
        match &t.segments[2] {
            SyntaxSegment::Option(o) => {
                assert_eq!(o.long, "branch");
                assert_eq!(o.short, Some('b'));
                assert_eq!(o.value.as_ref().unwrap().name, "name");
            }
            other => panic!("expected option, got {other:?}"),
        }
    }

    #[test]
    fn parses_catch_all() {
        let t = tree("run {*args}");
        match &t.segments[1] {
            SyntaxSegment::Parameter(p) => {
                assert!(p.is_catch_all);
                assert_eq!(p.name, "args");
            }
            other => panic!("expected parameter, got {other:?}"),
        }
    }

    #[test]
    fn parses_end_of_options_separator() {
        let t = tree("git checkout -- {file}");
        assert_eq!(t.end_of_options.len(), 1);
    }
}
