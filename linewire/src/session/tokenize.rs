/// Splits a command line into words.
///
/// Words are separated by ASCII whitespace. Double quotes group words
/// and are removed; `""` yields an empty word. An unterminated quote
/// runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("ls  -l   /tmp"), ["ls", "-l", "/tmp"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(tokenize(r#"echo "hello world" x"#), ["echo", "hello world", "x"]);
        assert_eq!(tokenize(r#"cd "" "#), ["cd", ""]);
        assert_eq!(tokenize(r#"echo a"b c"d"#), ["echo", "ab cd"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(tokenize(r#"echo "a b"#), ["echo", "a b"]);
    }
}
