//! Property-based tests for content normalization
//! **Property 1: normalizing twice equals normalizing once**
//! **Property 2: doc comments never change containment results**

use proptest::prelude::*;
use tmplassert_engine::{CommentDelimiter, ContentNormalizer};

/// Lines of code-like text, free of comment markers
fn arb_line() -> impl Strategy<Value = String> {
    "[ \t]{0,4}[a-zA-Z0-9_;{}()=.: ]{0,20}[ \t]{0,2}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_line(), 0..8).prop_map(|lines| lines.join("\n"))
}

/// Arbitrary text including comment markers and line endings
fn arb_noisy_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            arb_line(),
            Just("/**".to_string()),
            Just("/**/".to_string()),
            Just("*/".to_string()),
            Just("/*".to_string()),
            Just("\r\n".to_string()),
            Just("\n\n".to_string()),
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_comment() -> impl Strategy<Value = String> {
    "[a-zA-Z .\n]{0,20}".prop_map(|body| format!("/**{}*/", body))
}

/// Insert a comment at the start of a random subset of lines
fn with_comments(text: &str, comments: &[Option<String>]) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| match comments.get(i).and_then(Option::as_ref) {
            Some(comment) => format!("{}{}", comment, line),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    /// Property: normalize is idempotent
    #[test]
    fn prop_normalize_is_idempotent(text in arb_noisy_text()) {
        let normalizer = ContentNormalizer::default();
        let once = normalizer.normalize(&text);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    /// Property: idempotence holds for custom delimiters too
    #[test]
    fn prop_normalize_is_idempotent_custom(text in arb_noisy_text()) {
        let normalizer = ContentNormalizer::new(&[
            CommentDelimiter::doc_block(),
            CommentDelimiter::new("/*", "*/"),
        ])
        .unwrap();
        let once = normalizer.normalize(&text);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    /// Property: adding doc comments to the actual text keeps containment unchanged
    #[test]
    fn prop_comments_do_not_change_containment(
        text in arb_text(),
        fragment in arb_text(),
        comments in prop::collection::vec(prop::option::of(arb_comment()), 0..8),
    ) {
        let normalizer = ContentNormalizer::default();
        let commented = with_comments(&text, &comments);

        prop_assert_eq!(
            normalizer.contains(&text, &fragment),
            normalizer.contains(&commented, &fragment)
        );
    }

    /// Property: every text contains its own lines, whatever their indentation
    #[test]
    fn prop_text_contains_itself_dedented(text in arb_text()) {
        let normalizer = ContentNormalizer::default();
        let dedented = text
            .lines()
            .map(str::trim_start)
            .collect::<Vec<_>>()
            .join("\n");
        prop_assert!(normalizer.contains(&text, &dedented));
    }
}
