//! Human- and tool-readable renderings of a token stream

use super::token_stream::TokenStream;
use std::fmt::Write;

/// One line per token: `file:line:column KIND [name]`
pub fn render_listing(stream: &TokenStream) -> String {
    let mut out = String::with_capacity(stream.len() * 32);
    for token in stream {
        let _ = write!(out, "{} {}", token.position, token.kind);
        if let Some(name) = &token.name {
            let _ = write!(out, " {}", name);
        }
        out.push('\n');
    }
    out
}

pub fn render_json(stream: &TokenStream, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(stream.tokens())
    } else {
        serde_json::to_string(stream.tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{ConstructKind, TokenKind, TokenStreamBuilder};
    use crate::utils::SourceMap;
    use std::sync::Arc;

    fn sample() -> TokenStream {
        let source = "int main() { run(); }";
        let map = SourceMap::new(source.to_string());
        let mut b = TokenStreamBuilder::new(Arc::from("m.cpp"), 16);
        b.open(ConstructKind::Function, &map.span_between(0, 21), Some("main"))
            .unwrap();
        b.unit(TokenKind::Apply, &map.span_between(13, 18), Some("run"))
            .unwrap();
        b.close(ConstructKind::Function, &map.span_between(20, 21))
            .unwrap();
        b.finish(&map.span_between(21, 21)).unwrap()
    }

    #[test]
    fn test_listing_format() {
        let listing = render_listing(&sample());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "m.cpp:1:1 FUNCTION_BEGIN main",
                "m.cpp:1:14 APPLY run",
                "m.cpp:1:21 FUNCTION_END",
                "m.cpp:1:22 FILE_END",
            ]
        );
    }

    #[test]
    fn test_json_uses_stable_kind_names() {
        let json = render_json(&sample(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let tokens = value.as_array().unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1]["kind"], "APPLY");
        assert_eq!(tokens[1]["name"], "run");
        assert_eq!(tokens[1]["position"]["line"], 1);
        assert!(tokens[3].get("name").is_none());
    }
}
