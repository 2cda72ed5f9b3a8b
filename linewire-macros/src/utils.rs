use proc_macro::{Delimiter, TokenStream, TokenTree};

/// Returns the index of the function body, the last brace-delimited group.
pub(crate) fn body_position(tokens: &[TokenTree]) -> Option<usize> {
    tokens.iter().rposition(
        |t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace),
    )
}

/// Returns the declared return type of the function, if any.
///
/// Looks for the top-level `->` in front of the body (`body` is the
/// index returned by [`body_position`]) and stops at a `where` clause.
pub(crate) fn return_type(tokens: &[TokenTree], body: usize) -> Option<String> {
    let arrow = (0..body.saturating_sub(1)).find(|&i| {
        matches!(
            (&tokens[i], &tokens[i + 1]),
            (TokenTree::Punct(p1), TokenTree::Punct(p2))
                if p1.as_char() == '-' && p2.as_char() == '>'
        )
    })?;

    let end = tokens[arrow + 2..body]
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "where"))
        .map_or(body, |offset| arrow + 2 + offset);

    let ty: TokenStream = tokens[arrow + 2..end].iter().cloned().collect();
    Some(ty.to_string())
}

/// Returns `true` if the item carries the `async` keyword.
pub(crate) fn is_async(tokens: &[TokenTree]) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
}

/// Parses the attribute argument as a strictly positive millisecond count.
pub(crate) fn parse_millis(attr: TokenStream) -> Result<u64, String> {
    let tokens: Vec<TokenTree> = attr.into_iter().collect();

    let literal = match tokens.as_slice() {
        [TokenTree::Literal(lit)] => lit.to_string(),
        [] => return Err("expected a timeout in milliseconds, e.g. #[timeout_test(500)]".into()),
        _ => return Err("expected a single integer literal".into()),
    };

    let digits: String = literal
        .trim_end_matches("u64")
        .trim_end_matches("u32")
        .chars()
        .filter(|c| *c != '_')
        .collect();

    match digits.parse::<u64>() {
        Ok(0) => Err("timeout must be greater than zero".into()),
        Ok(ms) => Ok(ms),
        Err(_) => Err(format!("invalid timeout `{literal}`")),
    }
}

/// Expands to a `compile_error!` carrying `msg`.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
