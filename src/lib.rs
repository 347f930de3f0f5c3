//! glsl_crunch is a GLSL source minifier: it parses shader sources into a
//! block-structured tree and applies semantics-preserving rewrites that
//! shrink the resulting text, for embedding shaders in size-constrained
//! binaries.
//!
//! # Overview
//! The crunch pipeline runs four rewrite passes over one or more shader
//! stages: *inlining* of one-shot `i_`-prefixed bindings, local
//! *simplification*, *swizzle selection* between the `xyzw`/`rgba`/`stpq`
//! component families, and *renaming* of identifiers, struct members and
//! interface block type names to a frequency-sorted minimal alphabet.
//! Varyings shared between shader stages are merged so both sides always
//! rename to the same spelling, and reserved words (builtins, entry points)
//! are never touched.
//!
//! # Design
//! A [tokenizer](tokenize) assembles a GLSL-aware token stream from raw
//! source, resolving the context-sensitive cases: a period is a swizzle, a
//! member access or a float tail; a precision keyword merges with its base
//! type; adjacent operator characters combine into compound operators. A
//! block parser consumes the stream through declarative patterns and builds
//! a tree of [blocks](block::GlslBlock) below a per-file source block.
//! Statements the parsers do not recognize pass through verbatim, so the
//! worst case of a parse miss is a larger-than-optimal output, never a lost
//! statement.
//!
//! Identifier and access tokens are shared-identity handles: every occurrence
//! of a binding is tracked as an object, merge groups de-duplicate by
//! physical identity, and locking a rename through one occurrence is visible
//! from all of them.
//!
//! # Example
//!
//! ```
//! use glsl_crunch::{CrunchOptions, Glsl, StageType};
//!
//! let mut glsl = Glsl::new();
//! glsl.add_source(
//!     "quad.vert",
//!     Some(StageType::Vertex),
//!     "out vec2 v_uv;void main(){v_uv=gl_Position.xy;}",
//! );
//! glsl.add_source(
//!     "quad.frag",
//!     Some(StageType::Fragment),
//!     "in vec2 v_uv;void main(){gl_FragColor=vec4(v_uv,0.,1.);}",
//! );
//! glsl.parse();
//! glsl.crunch(&CrunchOptions::default());
//! for shader in glsl.format() {
//!     println!("{}", shader);
//! }
//! ```

mod analysis;
pub mod block;
mod crunch;
pub mod token;
mod tokenizer;
pub mod util;

use crate::block::BlockRef;
use crate::util::Log;
use once_cell::unsync::OnceCell;

pub use tokenizer::tokenize;

/// A GLSL source database: the shader sources of one program, crunched
/// together so cross-stage interfaces stay consistent.
///
/// The database exclusively owns its source trees; merge groups built during
/// a crunch pass hold only transient non-owning references.
pub struct Glsl {
    sources: Vec<BlockRef>,
    log: OnceCell<Log<&'static str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Crunch mode: `None` bypasses every pass, `Full` runs the whole pipeline.
pub enum Mode {
    None,
    Full,
}

#[derive(Debug, Clone)]
/// Pass configuration: mode plus hard iteration caps for the inline, rename
/// and simplify passes. Negative caps mean unbounded.
pub struct CrunchOptions {
    pub mode: Mode,
    pub max_inlines: i64,
    pub max_renames: i64,
    pub max_simplifys: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A source's shader stage. Sources without a stage are generic and
/// participate in name collection for all typed peers.
pub enum StageType {
    Vertex,
    Fragment,
    Geometry,
}
