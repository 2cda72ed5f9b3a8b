mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Marks a blocking test that must finish within a bound.
///
/// The body runs on a helper thread; the test thread waits for it for at
/// most the given number of milliseconds. A panic in the body is re-raised
/// as is, an overrun fails the test instead of hanging the suite. Whatever
/// the body returns (for instance a `Result`) is handed back to the test
/// harness unchanged.
///
/// ```rust,ignore
/// #[linewire::timeout_test(2_000)]
/// fn echoes() {
///     // blocking socket work
/// }
/// ```
#[proc_macro_attribute]
pub fn timeout_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let millis = match utils::parse_millis(attr) {
        Ok(ms) => ms,
        Err(msg) => return utils::compile_error(&msg),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if utils::is_async(&tokens) {
        return utils::compile_error("timeout_test expects a synchronous test function");
    }

    let Some(pos) = utils::body_position(&tokens) else {
        return utils::compile_error("timeout_test expects a function body");
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let closure = match utils::return_type(&tokens, pos) {
        Some(ty) => format!("move || -> {ty} {{ {block} }}"),
        None => format!("move || {{ {block} }}"),
    };

    let new_block = format!(
        "{{
            let (__sender, __receiver) = ::std::sync::mpsc::channel();

            ::std::thread::spawn(move || {{
                let __outcome = ::std::panic::catch_unwind(
                    ::std::panic::AssertUnwindSafe({closure})
                );
                let _ = __sender.send(__outcome);
            }});

            match __receiver.recv_timeout(::std::time::Duration::from_millis({millis})) {{
                ::core::result::Result::Ok(::core::result::Result::Ok(__value)) => __value,
                ::core::result::Result::Ok(::core::result::Result::Err(payload)) => {{
                    ::std::panic::resume_unwind(payload)
                }}
                ::core::result::Result::Err(::std::sync::mpsc::RecvTimeoutError::Timeout) => {{
                    panic!(\"test did not finish within {millis} ms\")
                }}
                ::core::result::Result::Err(::std::sync::mpsc::RecvTimeoutError::Disconnected) => {{
                    panic!(\"test thread exited without reporting\")
                }}
            }}
        }}"
    );

    let body = match new_block.parse::<TokenStream>() {
        Ok(body) => body,
        Err(err) => return utils::compile_error(&format!("timeout_test expansion error: {err}")),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, body));

    let mut result: Vec<TokenTree> = match "#[test]".parse::<TokenStream>() {
        Ok(attr) => attr.into_iter().collect(),
        Err(_) => Vec::new(),
    };
    result.extend(tokens);

    result.into_iter().collect()
}
