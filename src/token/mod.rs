//! A module consists of the lexical atoms of the GLSL token stream.
//!
//! Each atom family has an `interpret_*` classifier which accepts a raw lexeme
//! (and, for two-lexeme constructs, a trailing lexeme) and returns either a
//! constructed token or a miss. A miss is not a failure: the tokenizer keeps
//! trying lower-priority classifiers and falls back to carrying the raw lexeme
//! through, so unrecognized code survives untouched.
//!
//! Identifier and access atoms are shared-identity handles: the crunch passes
//! rely on object identity to track every occurrence of a binding, and a
//! rename locked through one handle is visible from all of its clones.

mod access;
mod control;
mod inout;
mod name;
mod number;
mod operator;
mod paren;
mod typeid;

#[cfg(test)]
mod __tests__;

use std::cell::RefCell;
use std::rc::Rc;

pub use name::interpret_name;
pub use number::interpret_int;
pub use operator::interpret_operator;
pub use paren::interpret_paren;
pub use access::interpret_access;
pub use control::{interpret_control, interpret_control_pair};
pub use inout::interpret_inout;
pub use typeid::{interpret_type, interpret_type_pair};

#[derive(Debug, Clone)]
/// A typed GLSL token assembled from one or two raw lexemes.
pub enum GlslToken {
    Name(GlslName),
    Int(GlslInt),
    Float(GlslFloat),
    Operator(GlslOperator),
    Paren(GlslParen),
    Access(GlslAccess),
    Type(GlslType),
    Inout(Direction),
    Control(GlslControl),
    /// Fallback for lexemes no classifier recognizes; carried through verbatim.
    Raw(String),
}

/// A GLSL name identifier.
///
/// A name carries its original spelling, an optional locked rename, an
/// optional back-pointer to the type that declared it and an optional
/// back-pointer to the member access following it (`v.pos`: the name `v`
/// points at the access `.pos`). Reserved words are created pre-locked to
/// their own spelling and can never be renamed.
///
/// The handle is reference counted; clones share identity, which is the
/// contract the merge and rename passes build on.
#[derive(Clone)]
pub struct GlslName {
    data: Rc<RefCell<NameData>>,
}

struct NameData {
    name: String,
    rename: Option<String>,
    typeid: Option<GlslType>,
    access: Option<GlslAccess>,
}

#[derive(Debug, Clone)]
/// An integer literal, optionally `u`-suffixed.
pub struct GlslInt {
    digits: String,
    unsigned: bool,
}

#[derive(Debug, Clone)]
/// A float literal kept as its integer and fractional digit halves so that
/// forms like `.5`, `5.` and `1.05` format minimally without losing digits.
pub struct GlslFloat {
    integer: String,
    fraction: String,
}

#[derive(Debug, Clone)]
/// A single- or two-character operator.
pub struct GlslOperator {
    op: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenShape {
    Round,
    Square,
    Curly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One of the six bracket characters, the basis of scope extraction.
pub struct GlslParen {
    shape: ParenShape,
    open: bool,
}

/// A `.`-introduced member access.
///
/// The access is a swizzle candidate iff every character of the member comes
/// from a single swizzle family; member-access collection demotes candidates
/// claimed by a struct member list. Like [GlslName], the handle shares
/// identity across clones.
#[derive(Clone)]
pub struct GlslAccess {
    data: Rc<RefCell<AccessData>>,
}

struct AccessData {
    name: GlslName,
    swizzle: Option<SwizzleFamily>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The three interchangeable GLSL vector component families.
pub enum SwizzleFamily {
    Xyzw,
    Rgba,
    Stpq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Lowp,
    Mediump,
    Highp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Bool,
    Int,
    Uint,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Bvec2,
    Bvec3,
    Bvec4,
    Ivec2,
    Ivec3,
    Ivec4,
    Uvec2,
    Uvec3,
    Uvec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A canonical GLSL type, optionally qualified by a precision keyword.
pub struct GlslType {
    precision: Option<Precision>,
    kind: TypeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Inout direction; `attribute` and `varying` normalize into this.
pub enum Direction {
    In,
    Out,
    Inout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlWord {
    If,
    Else,
    While,
    For,
    Return,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A control keyword, optionally extended by a second keyword (`else if`).
pub struct GlslControl {
    word: ControlWord,
    extension: Option<ControlWord>,
}

impl GlslToken {
    /// Canonical textual form of the token.
    pub fn format(&self) -> String {
        match self {
            GlslToken::Name(name) => name.format(),
            GlslToken::Int(number) => number.format(),
            GlslToken::Float(number) => number.format(),
            GlslToken::Operator(operator) => operator.format(),
            GlslToken::Paren(paren) => paren.format(),
            GlslToken::Access(access) => access.format(),
            GlslToken::Type(typeid) => typeid.format(),
            GlslToken::Inout(direction) => direction.format().to_string(),
            GlslToken::Control(control) => control.format(),
            GlslToken::Raw(source) => source.clone(),
        }
    }

    pub fn as_name(&self) -> Option<&GlslName> {
        match self {
            GlslToken::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_access(&self) -> Option<&GlslAccess> {
        match self {
            GlslToken::Access(access) => Some(access),
            _ => None,
        }
    }

    pub fn as_paren(&self) -> Option<&GlslParen> {
        match self {
            GlslToken::Paren(paren) => Some(paren),
            _ => None,
        }
    }

    /// Tell if the token is an operator with the exact given spelling.
    pub fn is_operator(&self, spelling: &str) -> bool {
        match self {
            GlslToken::Operator(operator) => operator.format() == spelling,
            _ => false,
        }
    }
}
