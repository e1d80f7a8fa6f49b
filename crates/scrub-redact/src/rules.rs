//! Redaction rule table
//!
//! Patterns are compiled once per process and shared read-only.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const PHONE_TOKEN: &str = "<phoneRedac>";
pub const ZIP_TOKEN: &str = "<zipRedac>";
pub const EMAIL_TOKEN: &str = " <emailRedac> ";
/// Alias segment is always empty; see `test_name_token_alias_is_empty`.
pub const NAME_TOKEN: &str = "<nameRedac_>";
pub const TOKEN_NAME_REPLACEMENT: &str = "NAME_REMOVED";

// NANP number with optional +1, optional (area) code, `.`/`-`/space
// separators and an optional #/x/ext/extension suffix.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:(?:\+?1\s*(?:[.-]\s*)?)?",
        r"(?:\(\s*(?:[2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9])\s*\)",
        r"|(?:[2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9]))\s*(?:[.-]\s*)?)?",
        r"(?:[2-9]1[02-9]|[2-9][02-9]1|[2-9][02-9]{2})\s*(?:[.-]\s*)?",
        r"[0-9]{4}",
        r"(?:\s*(?:#|x\.?|ext\.?|extension)\s*[0-9]+)?",
    ))
    .unwrap()
});

static ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{5}(?:[-\s][0-9]{4})?").unwrap());

// Groups: 1 prefix, 2 local part, 3 domain, 4 separator, 5 tld, 6 suffix.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.*)\s+([a-zA-Z0-9(.\-]+)@([a-zA-Z0-9.]+)(.)(edu|com)\s*(.*)").unwrap()
});

// Tokens already written by an earlier pass or an earlier run.
static REDACTION_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:phoneRedac|zipRedac|emailRedac|nameRedac_[^<>]*)>|NAME_REMOVED").unwrap()
});

/// Replace every phone number. Matches are collected first, then each matched
/// text is substituted wherever it occurs verbatim.
pub fn redact_phones(body: &str) -> (String, usize) {
    literal_substitute(&PHONE_REGEX, body, PHONE_TOKEN)
}

/// Replace every 5 or 5+4 digit zip code, match by match.
pub fn redact_zips(body: &str) -> (String, usize) {
    let count = ZIP_REGEX.find_iter(body).count();
    (ZIP_REGEX.replace_all(body, ZIP_TOKEN).into_owned(), count)
}

fn literal_substitute(pattern: &Regex, body: &str, token: &str) -> (String, usize) {
    let hits: Vec<String> = pattern
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut result = body.to_string();
    for hit in &hits {
        result = result.replace(hit.as_str(), token);
    }
    (result, hits.len())
}

/// Rebuild the body around email addresses, but only when the body matches
/// the email grammar from its very first character.
///
/// The new body is a single space followed by `prefix + " <emailRedac> " +
/// suffix` for every match. Text outside the matches (line breaks, lines
/// without an address) is not carried over. The grammar is line-bound and
/// its prefix is greedy, so only the last address of a line is replaced.
pub fn redact_emails(body: &str) -> (String, usize) {
    let anchored = EMAIL_REGEX.find(body).is_some_and(|m| m.start() == 0);
    if !anchored {
        return (body.to_string(), 0);
    }

    let mut result = String::from(" ");
    let mut count = 0;
    for caps in EMAIL_REGEX.captures_iter(body) {
        result.push_str(&caps[1]);
        result.push_str(EMAIL_TOKEN);
        result.push_str(&caps[6]);
        count += 1;
    }
    (result, count)
}

/// Case-insensitive literal matcher for `needle` that leaves existing
/// redaction tokens alone.
pub fn literal_matcher(needle: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        "(?i)({})|{}",
        REDACTION_TOKEN_REGEX.as_str(),
        regex::escape(needle)
    ))
}

/// Replace every unprotected match of a [`literal_matcher`] with `token`.
pub fn substitute_outside_tokens(matcher: &Regex, body: &str, token: &str) -> (String, usize) {
    let mut count = 0;
    let result = matcher.replace_all(body, |caps: &Captures| {
        if let Some(existing) = caps.get(1) {
            existing.as_str().to_string()
        } else {
            count += 1;
            token.to_string()
        }
    });
    (result.into_owned(), count)
}

/// Word-boundary matcher for the supplementary token pass.
pub fn word_matcher(word: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_layouts() {
        let bodies = [
            "call 650-555-1234 now",
            "call (650) 555-1234 now",
            "call 650.555.1234 now",
            "call 650 555 1234 now",
            "call +1 650-555-1234 now",
            "call 1-650-555-1234 now",
            "call 555-1234 now",
            "call 650-555-1234 ext. 77 now",
            "call 650-555-1234 x12 now",
            "call 650-555-1234 #3 now",
        ];
        for body in bodies {
            let (redacted, count) = redact_phones(body);
            assert_eq!(count, 1, "{body}");
            assert_eq!(redacted, "call <phoneRedac> now", "{body}");
        }
    }

    #[test]
    fn test_multiple_phones() {
        let (redacted, count) = redact_phones("650-555-1234 or 415-555-9876");
        assert_eq!(count, 2);
        assert_eq!(redacted, "<phoneRedac> or <phoneRedac>");
    }

    #[test]
    fn test_phone_verbatim_repeat_is_replaced() {
        // Accepted imprecision: a matched text is replaced everywhere it occurs.
        let (redacted, _) = redact_phones("555-1234 and 555-1234");
        assert_eq!(redacted, "<phoneRedac> and <phoneRedac>");
    }

    #[test]
    fn test_zip() {
        assert_eq!(redact_zips("Palo Alto 94305").0, "Palo Alto <zipRedac>");
        assert_eq!(redact_zips("zip 94305-1234.").0, "zip <zipRedac>.");
        assert_eq!(redact_zips("zip 94305 1234").0, "zip <zipRedac>");
        let (unchanged, count) = redact_zips("only 1234 here");
        assert_eq!(unchanged, "only 1234 here");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_zip_mixed_layouts() {
        // A plain zip sharing its digits with a later ZIP+4 must not leave
        // the +4 part behind.
        let (redacted, count) = redact_zips("old 94305 new 94305-1234");
        assert_eq!(redacted, "old <zipRedac> new <zipRedac>");
        assert_eq!(count, 2);

        let (redacted, count) = redact_zips("94305-1234, 10001 and 94305");
        assert_eq!(redacted, "<zipRedac>, <zipRedac> and <zipRedac>");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_email_reconstruction() {
        let (redacted, count) = redact_emails("Hi there jane.doe@school.edu thanks");
        assert_eq!(count, 1);
        assert!(redacted.starts_with(' '));
        assert!(redacted.ends_with(" <emailRedac> thanks"));
        assert_eq!(redacted, " Hi there <emailRedac> thanks");
    }

    #[test]
    fn test_email_one_match_per_line() {
        let (redacted, count) = redact_emails("Hi a@b.edu x\nmail c@d.com y");
        assert_eq!(count, 2);
        assert_eq!(redacted, " Hi <emailRedac> xmail <emailRedac> y");
    }

    #[test]
    fn test_email_drops_unmatched_lines() {
        let (redacted, count) = redact_emails("Hi a@b.edu x\nbye now");
        assert_eq!(count, 1);
        assert_eq!(redacted, " Hi <emailRedac> x");
    }

    #[test]
    fn test_email_greedy_prefix_keeps_earlier_address() {
        let (redacted, count) = redact_emails("Hi a@b.edu and c@d.com bye");
        assert_eq!(count, 1);
        assert_eq!(redacted, " Hi a@b.edu and <emailRedac> bye");
    }

    #[test]
    fn test_email_at_body_start_is_kept() {
        // The grammar needs whitespace before the local part, so an address
        // opening the body never triggers the pass.
        let body = "jane.doe@school.edu is how to reach me";
        assert_eq!(redact_emails(body), (body.to_string(), 0));
    }

    #[test]
    fn test_email_other_tld_is_kept() {
        let body = "write to jane@school.org please";
        assert_eq!(redact_emails(body).0, body);
    }

    #[test]
    fn test_literal_matcher_skips_tokens() {
        let matcher = literal_matcher("red").unwrap();
        let (redacted, count) =
            substitute_outside_tokens(&matcher, "Red said <phoneRedac>", NAME_TOKEN);
        assert_eq!(redacted, "<nameRedac_> said <phoneRedac>");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_literal_matcher_escapes() {
        let matcher = literal_matcher("o'brien (jr.)").unwrap();
        let (redacted, _) = substitute_outside_tokens(&matcher, "by O'Brien (Jr.)", NAME_TOKEN);
        assert_eq!(redacted, "by <nameRedac_>");
    }

    #[test]
    fn test_tokens_do_not_match_grammars() {
        let tokens = format!("{PHONE_TOKEN} {ZIP_TOKEN}{EMAIL_TOKEN}{NAME_TOKEN}");
        assert_eq!(redact_phones(&tokens).1, 0);
        assert_eq!(redact_zips(&tokens).1, 0);
        assert_eq!(redact_emails(&tokens).1, 0);
    }
}
