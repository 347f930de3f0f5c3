//! The token pattern matcher driving the block parsers.
//!
//! A pattern is a sequence of literal items (matched verbatim against the
//! token's formatted spelling) and selector items which capture a typed token
//! or a whole parenthesized scope. Matching is all-or-nothing: a miss returns
//! `None` and leaves the input untouched so the caller can try the next
//! pattern.

use crate::token::{GlslParen, GlslToken, ParenShape};

/// One pattern item.
pub(crate) enum Pat {
    /// Verbatim match against the formatted token.
    Lit(&'static str),
    /// Any canonical type.
    Type,
    /// Any name identifier.
    Name,
    /// Unsigned integer literal.
    UInt,
    /// Any integer literal.
    Int,
    /// Float literal.
    Float,
    /// Member access.
    Access,
    /// Control keyword.
    Control,
    /// Inout direction.
    InoutDir,
    /// Operator with the exact spelling.
    Op(&'static str),
    /// Open round paren; also consumes the matching scope.
    ScopeParen,
    /// Open square paren; also consumes the matching scope.
    ScopeBracket,
    /// Open curly paren; also consumes the matching scope.
    ScopeBrace,
    /// Alternation over literals.
    Alt(&'static [&'static str]),
}

/// A slot captured by a selector.
pub(crate) enum Extracted<'t> {
    Token(&'t GlslToken),
    Scope(&'t [GlslToken]),
}

impl<'t> Extracted<'t> {
    pub(crate) fn token(&self) -> Option<&'t GlslToken> {
        match self {
            Extracted::Token(token) => Some(token),
            Extracted::Scope(_) => None,
        }
    }

    pub(crate) fn scope(&self) -> Option<&'t [GlslToken]> {
        match self {
            Extracted::Scope(scope) => Some(scope),
            Extracted::Token(_) => None,
        }
    }
}

/// Check a token against a literal, without comparing types. Locked names
/// match their locked spelling, unlocked names their original spelling;
/// operators, parens and raw lexemes match their formatted form.
pub(crate) fn check_token(token: &GlslToken, required: &str) -> bool {
    match token {
        GlslToken::Raw(source) => source == required,
        GlslToken::Name(name) => {
            if name.is_locked() {
                name.format() == required
            } else {
                name.name() == required
            }
        }
        GlslToken::Operator(operator) => operator.format() == required,
        GlslToken::Paren(paren) => paren.format() == required,
        _ => false,
    }
}

fn validate_token<'t>(token: &'t GlslToken, pattern: &Pat) -> Option<Extracted<'t>> {
    let ok = match pattern {
        Pat::Type => matches!(token, GlslToken::Type(_)),
        Pat::Name => matches!(token, GlslToken::Name(_)),
        Pat::UInt => matches!(token, GlslToken::Int(number) if number.is_unsigned()),
        Pat::Int => matches!(token, GlslToken::Int(_)),
        Pat::Float => matches!(token, GlslToken::Float(_)),
        Pat::Access => matches!(token, GlslToken::Access(_)),
        Pat::Control => matches!(token, GlslToken::Control(_)),
        Pat::InoutDir => matches!(token, GlslToken::Inout(_)),
        Pat::Op(spelling) => token.is_operator(spelling),
        Pat::Alt(options) => options.iter().any(|option| check_token(token, option)),
        _ => false,
    };
    if ok {
        Some(Extracted::Token(token))
    } else {
        None
    }
}

fn scope_shape(pattern: &Pat) -> Option<ParenShape> {
    match pattern {
        Pat::ScopeParen => Some(ParenShape::Round),
        Pat::ScopeBracket => Some(ParenShape::Square),
        Pat::ScopeBrace => Some(ParenShape::Curly),
        _ => None,
    }
}

/// Extract the token sublist enclosed by the closer matching an already
/// consumed opener, plus the remainder after the closer. Returns `None` when
/// the closer is absent.
pub(crate) fn extract_scope<'t>(
    tokens: &'t [GlslToken],
    opener: &GlslParen,
) -> Option<(&'t [GlslToken], &'t [GlslToken])> {
    let mut count = 1;
    for (ii, token) in tokens.iter().enumerate() {
        if let GlslToken::Paren(paren) = token {
            count = opener.update(paren, count);
            if count == 0 {
                return Some((&tokens[..ii], &tokens[ii + 1..]));
            }
        }
    }
    None
}

/// Require a pattern from the head of the token list; return the captured
/// selector slots and the tail, or `None` on any mismatch.
pub(crate) fn extract_tokens<'t>(
    tokens: &'t [GlslToken],
    pattern: &[Pat],
) -> Option<(Vec<Extracted<'t>>, &'t [GlslToken])> {
    // Straight-out incompatible requests leave immediately.
    if pattern.len() > tokens.len() {
        return None;
    }
    let mut remaining = tokens;
    let mut ret = Vec::new();
    for item in pattern {
        let current = remaining.first()?;
        if let Some(shape) = scope_shape(item) {
            let opener = match current {
                GlslToken::Paren(paren) if paren.is_open() && paren.shape() == shape => *paren,
                _ => return None,
            };
            let (scope, rest) = extract_scope(&remaining[1..], &opener)?;
            ret.push(Extracted::Scope(scope));
            remaining = rest;
            continue;
        }
        if let Pat::Lit(required) = item {
            if !check_token(current, required) {
                return None;
            }
            remaining = &remaining[1..];
            continue;
        }
        ret.push(validate_token(current, item)?);
        remaining = &remaining[1..];
    }
    Some((ret, remaining))
}
