//! Splits raw GLSL source into preliminary lexemes and folds them into typed
//! tokens, resolving the two-lexeme ambiguities: a period followed by digits
//! is a float tail, a period followed by an identifier is an access or
//! swizzle, a precision keyword merges with its base type, and adjacent
//! operator characters combine into compound operators.

use crate::token::{
    interpret_access, interpret_control, interpret_control_pair, interpret_inout, interpret_int,
    interpret_name, interpret_operator, interpret_paren, interpret_type, interpret_type_pair,
    GlslFloat, GlslToken,
};

/// Characters split into their own lexeme during the second splitting stage.
const DELIMITERS: &str = "()[]{}+-*/.,;:=<>!&|^%?";

/// Remove `//` and `/* */` comments, leaving a space so adjacent lexemes do
/// not merge across a removed comment.
pub(crate) fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut ret = String::with_capacity(source.len());
    let mut ii = 0;
    while ii < chars.len() {
        if chars[ii] == '/' && ii + 1 < chars.len() && chars[ii + 1] == '/' {
            while ii < chars.len() && chars[ii] != '\n' {
                ii += 1;
            }
        } else if chars[ii] == '/' && ii + 1 < chars.len() && chars[ii + 1] == '*' {
            ii += 2;
            while ii + 1 < chars.len() && !(chars[ii] == '*' && chars[ii + 1] == '/') {
                ii += 1;
            }
            ii += 2;
            ret.push(' ');
        } else {
            ret.push(chars[ii]);
            ii += 1;
        }
    }
    ret
}

/// Split source into atomic lexemes: first on whitespace, then on the
/// delimiter set with each delimiter becoming its own lexeme.
pub(crate) fn tokenize_split(source: &str) -> Vec<String> {
    let mut ret = Vec::new();
    for fragment in source.split_whitespace() {
        let mut buffer = String::new();
        for ch in fragment.chars() {
            if DELIMITERS.contains(ch) {
                if !buffer.is_empty() {
                    ret.push(std::mem::take(&mut buffer));
                }
                ret.push(ch.to_string());
            } else {
                buffer.push(ch);
            }
        }
        if !buffer.is_empty() {
            ret.push(buffer);
        }
    }
    ret
}

/// Link a freshly interpreted access token back to the name it follows so
/// that member-access collection can reach it later.
fn link_access(tokens: &[GlslToken], access: &crate::token::GlslAccess) {
    match tokens.last() {
        Some(GlslToken::Name(name)) => name.set_access(access.clone()),
        Some(GlslToken::Access(previous)) => previous.name().set_access(access.clone()),
        _ => {}
    }
}

/// Assemble a GLSL token stream from raw source.
///
/// Classifiers run in a fixed priority order; the leading-period rules run
/// before plain integer detection so `.5` becomes a float, while the
/// look-ahead inside integer detection handles `5.` and `5.0`. A lexeme no
/// classifier accepts is carried through as a raw token.
pub fn tokenize(source: &str) -> Vec<GlslToken> {
    let lexemes = tokenize_split(&strip_comments(source));
    let mut ret: Vec<GlslToken> = Vec::new();
    let mut ii = 0;
    while ii < lexemes.len() {
        let element = lexemes[ii].as_str();
        if let Some(paren) = interpret_paren(element) {
            ret.push(GlslToken::Paren(paren));
            ii += 1;
            continue;
        }
        if ii + 1 < lexemes.len() {
            if let Some(control) = interpret_control_pair(element, &lexemes[ii + 1]) {
                ret.push(GlslToken::Control(control));
                ii += 2;
                continue;
            }
        }
        if let Some(control) = interpret_control(element) {
            ret.push(GlslToken::Control(control));
            ii += 1;
            continue;
        }
        if let Some(direction) = interpret_inout(element) {
            ret.push(GlslToken::Inout(direction));
            ii += 1;
            continue;
        }
        if ii + 1 < lexemes.len() {
            if let Some(typeid) = interpret_type_pair(element, &lexemes[ii + 1]) {
                ret.push(GlslToken::Type(typeid));
                ii += 2;
                continue;
            }
        }
        if let Some(typeid) = interpret_type(element) {
            ret.push(GlslToken::Type(typeid));
            ii += 1;
            continue;
        }
        // Period may signify a truncated floating point or a member access.
        if element == "." && ii + 1 < lexemes.len() {
            if let Some(decimal) = interpret_int(&lexemes[ii + 1]) {
                ret.push(GlslToken::Float(GlslFloat::new("0", decimal.digits())));
                ii += 2;
                continue;
            }
            if let Some(access) = interpret_access(&lexemes[ii + 1]) {
                link_access(&ret, &access);
                ret.push(GlslToken::Access(access));
                ii += 2;
                continue;
            }
        }
        // Number may be just an integer or the head of a floating point.
        if let Some(number) = interpret_int(element) {
            if ii + 1 < lexemes.len() && lexemes[ii + 1] == "." {
                if ii + 2 < lexemes.len() {
                    if let Some(decimal) = interpret_int(&lexemes[ii + 2]) {
                        ret.push(GlslToken::Float(GlslFloat::new(
                            number.digits(),
                            decimal.digits(),
                        )));
                        ii += 3;
                        continue;
                    }
                }
                ret.push(GlslToken::Float(GlslFloat::new(number.digits(), "0")));
                ii += 2;
                continue;
            }
            ret.push(GlslToken::Int(number));
            ii += 1;
            continue;
        }
        if let Some(mut operator) = interpret_operator(element) {
            if ii + 1 < lexemes.len() {
                if let Some(extension) = interpret_operator(&lexemes[ii + 1]) {
                    if operator.incorporate(&extension) {
                        ret.push(GlslToken::Operator(operator));
                        ii += 2;
                        continue;
                    }
                }
            }
            ret.push(GlslToken::Operator(operator));
            ii += 1;
            continue;
        }
        if let Some(name) = interpret_name(element) {
            ret.push(GlslToken::Name(name));
            ii += 1;
            continue;
        }
        // Fallback is to carry the lexeme as-is.
        ret.push(GlslToken::Raw(element.to_string()));
        ii += 1;
    }
    ret
}
