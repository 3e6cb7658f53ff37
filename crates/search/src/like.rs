//! In-memory SQL `LIKE`: `%` matches any run, `_` one character, and a
//! backslash makes the next pattern character literal.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        let token = match ch {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        };
        // Consecutive `%` behave like one.
        if token == Token::AnyRun && tokens.last() == Some(&Token::AnyRun) {
            continue;
        }
        tokens.push(token);
    }
    tokens
}

/// Returns whether `text` matches the `LIKE` pattern. Case-insensitive
/// matching lowercases both sides first.
#[must_use]
pub fn like_matches(text: &str, pattern: &str, case_sensitive: bool) -> bool {
    let (text, pattern) = if case_sensitive {
        (text.to_string(), pattern.to_string())
    } else {
        (text.to_lowercase(), pattern.to_lowercase())
    };
    let text: Vec<char> = text.chars().collect();
    let tokens = tokenize(&pattern);

    // Greedy walk with backtracking to the most recent `%`.
    let (mut t, mut p) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match tokens.get(p) {
            Some(Token::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(Token::Literal(ch)) if *ch == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|token| *token == Token::AnyRun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_matches_any_run() {
        assert!(like_matches("john smith", "john%", false));
        assert!(like_matches("john", "john%", false));
        assert!(like_matches("big john", "%john%", false));
        assert!(!like_matches("jon", "%john%", false));
        assert!(like_matches("", "%", false));
        assert!(like_matches("anything", "%%", false));
    }

    #[test]
    fn underscore_matches_one_character() {
        assert!(like_matches("cat", "c_t", false));
        assert!(!like_matches("ct", "c_t", false));
        assert!(like_matches("cät", "c_t", false));
    }

    #[test]
    fn case_handling() {
        assert!(like_matches("FooBar", "f%b%", false));
        assert!(like_matches("FooBar", "F%B%", true));
        assert!(!like_matches("foobar", "F%B%", true));
    }

    #[test]
    fn backslash_escapes_wildcards() {
        assert!(like_matches("100%", "100\\%", false));
        assert!(!like_matches("1000", "100\\%", false));
        assert!(like_matches("a_b", "a\\_b", false));
        assert!(!like_matches("axb", "a\\_b", false));
        assert!(like_matches("a\\", "a\\", false));
    }

    #[test]
    fn backtracks_across_repeated_prefixes() {
        assert!(like_matches("aaab", "%aab", false));
        assert!(like_matches("mississippi", "%iss%ppi", false));
        assert!(!like_matches("mississippi", "%iss%ppx", false));
    }

    #[test]
    fn empty_pattern_matches_only_empty_text() {
        assert!(like_matches("", "", false));
        assert!(!like_matches("a", "", false));
    }
}
