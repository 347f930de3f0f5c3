use crate::token::{GlslName, GlslToken, SwizzleFamily};
use crate::tokenize;

fn formats(source: &str) -> Vec<String> {
    tokenize(source).iter().map(|t| t.format()).collect()
}

#[test]
fn float_tokenization_boundaries() {
    let tokens = tokenize(".5");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], GlslToken::Float(_)));
    assert_eq!(tokens[0].format(), ".5");

    assert_eq!(formats("5."), vec!["5."]);
    assert_eq!(formats("5.0"), vec!["5."]);
    assert_eq!(formats("1.25"), vec!["1.25"]);
    assert_eq!(formats("0.05"), vec![".05"]);

    let tokens = tokenize("5");
    assert!(matches!(&tokens[0], GlslToken::Int(n) if !n.is_unsigned()));
    assert_eq!(tokens[0].format(), "5");

    let tokens = tokenize("5u");
    assert!(matches!(&tokens[0], GlslToken::Int(n) if n.is_unsigned()));
    assert_eq!(tokens[0].format(), "5u");
}

#[test]
fn operator_absorption() {
    for op in [
        "==", "<=", ">=", "!=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
    ] {
        let tokens = tokenize(&format!("a{}b", op));
        assert_eq!(tokens.len(), 3, "'{}' should parse as one token", op);
        assert_eq!(tokens[1].format(), op);
    }
    // Absorption succeeds at most once.
    assert_eq!(formats("a===b"), vec!["a", "==", "=", "b"]);
}

#[test]
fn swizzle_family_classification() {
    let tokens = tokenize("v.xyz");
    assert_eq!(tokens.len(), 2);
    let access = tokens[1].as_access().unwrap();
    assert_eq!(access.swizzle(), Some(SwizzleFamily::Xyzw));

    let tokens = tokenize("v.rgb");
    assert_eq!(
        tokens[1].as_access().unwrap().swizzle(),
        Some(SwizzleFamily::Rgba)
    );

    let tokens = tokenize("v.st");
    assert_eq!(
        tokens[1].as_access().unwrap().swizzle(),
        Some(SwizzleFamily::Stpq)
    );

    // Mixed families and long selectors are member accesses.
    let tokens = tokenize("v.pos");
    assert_eq!(tokens[1].as_access().unwrap().swizzle(), None);
    let tokens = tokenize("v.xxxxx");
    assert_eq!(tokens[1].as_access().unwrap().swizzle(), None);
}

#[test]
fn swizzle_rewrite() {
    let tokens = tokenize("v.rgb");
    let access = tokens[1].as_access().unwrap();
    access.select_swizzle(SwizzleFamily::Xyzw);
    assert_eq!(access.format(), ".xyz");
}

#[test]
fn access_links_to_preceding_name() {
    let tokens = tokenize("v.xyz");
    let name = tokens[0].as_name().unwrap();
    assert!(name.access().is_some());
    assert_eq!(name.access().unwrap().name().name(), "xyz");
}

#[test]
fn two_lexeme_types() {
    let tokens = tokenize("lowp vec3 position");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].format(), "lowp vec3");
    assert_eq!(tokens[1].format(), "position");
}

#[test]
fn two_lexeme_control() {
    let tokens = tokenize("else if");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].format(), "else if");
}

#[test]
fn legacy_inout_aliases() {
    assert_eq!(formats("attribute"), vec!["in"]);
    assert_eq!(formats("varying"), vec!["inout"]);
}

#[test]
fn reserved_names_are_pre_locked() {
    let tokens = tokenize("normalize");
    let name = tokens[0].as_name().unwrap();
    assert!(name.is_locked());
    assert_eq!(name.format(), "normalize");

    let plain = GlslName::new("accumulator");
    assert!(!plain.is_locked());
}

#[test]
fn lock_is_first_wins() {
    let name = GlslName::new("gl_FragColor");
    name.lock("a");
    assert_eq!(name.format(), "gl_FragColor");

    let name = GlslName::new("velocity");
    name.lock("a");
    name.lock("b");
    assert_eq!(name.format(), "a");
}

#[test]
fn inline_eligible_names() {
    assert!(GlslName::new("i_t").is_inlineable());
    assert!(GlslName::new("I_TIME").is_inlineable());
    assert!(!GlslName::new("it").is_inlineable());
    assert!(!GlslName::new("time_i_").is_inlineable());
}

#[test]
fn raw_fallback_carries_unknown_lexemes() {
    let tokens = tokenize("a @@ b");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[1], GlslToken::Raw(raw) if raw == "@@"));
    assert_eq!(tokens[1].format(), "@@");
}

#[test]
fn comments_are_stripped() {
    let with_comments = "float a; // trailing\n/* block\ncomment */float b;";
    let formatted = formats(with_comments);
    assert_eq!(formatted, vec!["float", "a", ";", "float", "b", ";"]);
}

#[test]
fn comparison_operators_split_without_whitespace() {
    assert_eq!(formats("i<4"), vec!["i", "<", "4"]);
    assert_eq!(formats("a&&b"), vec!["a", "&&", "b"]);
}
