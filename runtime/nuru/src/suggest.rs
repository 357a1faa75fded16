//! "Did you mean X?" suggestions on a routing miss (§7: "the emitted dispatcher
//! reports a non-match to stderr with a suggestion ... based on minimum edit distance
//! on literal prefixes").

use levenshtein::levenshtein;

/// Beyond this edit distance the two strings are probably unrelated; a suggestion
/// would be noise rather than help.
const MAX_DISTANCE: usize = 3;

/// Find the closest literal prefix to `input` among `candidates`, if any is within
/// [`MAX_DISTANCE`]. Ties favor whichever candidate sorts first (stable, deterministic
/// per §8.1 property 7's idempotence requirement).
pub fn did_you_mean<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|candidate| (*candidate, levenshtein(input, candidate)))
        .filter(|(_, distance)| *distance <= MAX_DISTANCE)
        .min_by_key(|(candidate, distance)| (*distance, *candidate))
        .map(|(candidate, _)| candidate)
}

/// The full non-match message the generated dispatcher writes to stderr: a plain
/// "no command matched" line, with a suggestion appended when one is close enough to
/// the first token the user actually typed.
pub fn no_match_message(input: Option<&str>, candidates: &[&str]) -> String {
    match input.and_then(|i| did_you_mean(i, candidates)) {
        Some(suggestion) => format!("no command matched. Did you mean `{suggestion}`?"),
        None => "no command matched".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_typo() {
        assert_eq!(did_you_mean("delpoy", &["deploy", "build", "status"]), Some("deploy"));
    }

    #[test]
    fn no_suggestion_when_too_far() {
        assert_eq!(did_you_mean("xyz", &["deploy", "build", "status"]), None);
    }

    #[test]
    fn message_includes_suggestion() {
        assert_eq!(
            no_match_message(Some("delpoy"), &["deploy"]),
            "no command matched. Did you mean `deploy`?"
        );
        assert_eq!(no_match_message(Some("xyz"), &["deploy"]), "no command matched");
        assert_eq!(no_match_message(None, &["deploy"]), "no command matched");
    }
}
