#![forbid(unsafe_code)]

/// Characters split off as standalone tokens that open or break a phrase.
pub const LEADING_SEPARATORS: &[char] = &['(', ')', '-', '—', '\n'];

/// Punctuation split off as standalone tokens that attach to the previous
/// word when text is rebuilt.
pub const TRAILING_SEPARATORS: &[char] = &['.', ',', ':', '!', '?'];

/// Tokens after which the next letter starts a new sentence.
pub const SENTENCE_TERMINALS: &[char] = &['.', '!', '?'];

/// Newline survives tokenization as its own token.
pub const NEWLINE: &str = "\n";

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// True when `token` is a lone trailing separator (`.` `,` `:` `!` `?`).
pub fn is_trailing_separator(token: &str) -> bool {
    single_char(token).is_some_and(|c| TRAILING_SEPARATORS.contains(&c))
}

/// True when `token` ends a sentence (`.` `!` `?`).
pub fn is_sentence_terminal(token: &str) -> bool {
    single_char(token).is_some_and(|c| SENTENCE_TERMINALS.contains(&c))
}

fn flush(word: &mut String, tokens: &mut Vec<String>) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

/// Normalize and split raw text into tokens.
///
/// The text is lowercased, every leading and trailing separator becomes a
/// token of its own, and the rest is split on whitespace. Newlines are kept
/// as `"\n"` tokens. Empty input gives an empty vector.
///
/// ```
/// let toks = tokenize::tokenize("Hello there. General Kenobi.");
/// assert_eq!(toks, ["hello", "there", ".", "general", "kenobi", "."]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut word = String::new();
    for ch in lowered.chars() {
        if LEADING_SEPARATORS.contains(&ch) || TRAILING_SEPARATORS.contains(&ch) {
            flush(&mut word, &mut tokens);
            tokens.push(ch.to_string());
        } else if ch.is_whitespace() {
            flush(&mut word, &mut tokens);
        } else {
            word.push(ch);
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Rebuild readable text from a token stream.
///
/// Tokens are joined with single spaces, trailing separators attach to the
/// word before them, newlines swallow the spaces around them, and the first
/// letter after every sentence terminal is capitalized.
pub fn detokenize<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    let mut capitalize_next = false;
    let mut prev_newline = false;
    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let is_newline = token == NEWLINE;
        if i > 0 && !prev_newline && !is_newline && !is_trailing_separator(token) {
            out.push(' ');
        }
        if capitalize_next && token.chars().any(char::is_alphabetic) {
            push_capitalized(&mut out, token);
            capitalize_next = false;
        } else {
            out.push_str(token);
        }
        if is_sentence_terminal(token) {
            capitalize_next = true;
        }
        prev_newline = is_newline;
    }
    out
}

fn push_capitalized(out: &mut String, token: &str) {
    let mut done = false;
    for ch in token.chars() {
        if !done && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            done = true;
        } else {
            out.push(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_known_corpus() {
        let toks = tokenize("Hello there. General Kenobi.");
        assert_eq!(toks, vec!["hello", "there", ".", "general", "kenobi", "."]);
    }

    #[test]
    fn empty_input_gives_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn isolates_leading_separators() {
        let toks = tokenize("Salt (fine)-grained — ok\nNext");
        assert_eq!(
            toks,
            vec!["salt", "(", "fine", ")", "-", "grained", "—", "ok", "\n", "next"]
        );
    }

    #[test]
    fn isolates_trailing_separators() {
        let toks = tokenize("Wait,what:really?!");
        assert_eq!(toks, vec!["wait", ",", "what", ":", "really", "?", "!"]);
    }

    #[test]
    fn every_token_is_non_empty() {
        for t in tokenize("  A  b\n\n(c).  ") {
            assert!(!t.is_empty());
        }
    }

    #[test]
    fn separator_marks() {
        assert!(is_trailing_separator("."));
        assert!(is_trailing_separator(","));
        assert!(!is_trailing_separator(".."));
        assert!(!is_trailing_separator("("));
        assert!(is_sentence_terminal("?"));
        assert!(!is_sentence_terminal(","));
    }

    #[test]
    fn rebuilds_and_capitalizes() {
        let toks = ["hello", "there", ".", "general"];
        assert_eq!(detokenize(&toks), "hello there. General");
    }

    #[test]
    fn capitalization_skips_punctuation_only_tokens() {
        let toks = ["stop", "!", "\n", "(", "again", ")", ",", "ok"];
        assert_eq!(detokenize(&toks), "stop!\n( Again ), ok");
    }

    #[test]
    fn empty_stream_rebuilds_empty() {
        let toks: [&str; 0] = [];
        assert_eq!(detokenize(&toks), "");
    }
}
