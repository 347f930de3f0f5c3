//! A module consists of the GLSL block tree and its parsers.
//!
//! A block represents one declarative construct: a uniform, an inout
//! declaration, a struct, a function, a declaration, an assignment, a control
//! construct, a brace scope, a preprocessor directive or a raw statement the
//! parsers did not recognize. Blocks form a tree below a per-file `Source`
//! block; children are owned downward and the parent link is a non-owning
//! weak handle.
//!
//! Each block knows the names it declares and, derived on demand from its
//! statement payload, the names it uses. The crunch passes only ever query
//! these derived sets, so splicing tokens during inlining can never leave a
//! stale cached set behind.

mod assignment;
mod control;
mod declaration;
mod extract;
mod function;
mod inout;
mod scope;
mod source;
mod structure;
mod uniform;

#[cfg(test)]
mod __tests__;

use crate::token::{Direction, GlslControl, GlslInt, GlslName, GlslOperator, GlslToken, GlslType};
use crate::StageType;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

pub(crate) use assignment::parse_assignment;
pub(crate) use control::parse_control;
pub(crate) use declaration::parse_declaration;
pub(crate) use extract::{extract_scope, extract_tokens, Extracted, Pat};
pub(crate) use function::parse_function;
pub(crate) use inout::{is_mergable_with, parse_inout};
pub(crate) use scope::parse_scope;
pub(crate) use source::{
    collapse_recursive, collect_identifiers, expand_recursive, parse_source,
    select_swizzle_recursive,
};
pub(crate) use structure::parse_struct;
pub(crate) use uniform::parse_uniform;

/// Shared handle to a block tree node.
pub type BlockRef = Rc<RefCell<GlslBlock>>;

/// One node of the parsed GLSL tree.
pub struct GlslBlock {
    parent: Option<Weak<RefCell<GlslBlock>>>,
    children: Vec<BlockRef>,
    kind: BlockKind,
}

/// A struct or interface block member.
pub struct StructMember {
    pub(crate) typeid: GlslType,
    pub(crate) name: GlslName,
}

/// One function parameter.
pub struct FunctionParam {
    pub(crate) direction: Option<Direction>,
    pub(crate) typeid: GlslType,
    pub(crate) name: Option<GlslName>,
}

/// One declarator of a declaration statement.
pub struct DeclarationEntry {
    pub(crate) name: GlslName,
    pub(crate) initializer: Option<Vec<GlslToken>>,
}

/// Tagged payload of a block.
pub enum BlockKind {
    /// Top-level per-file container; `stage` is `None` for generic sources.
    Source {
        stage: Option<StageType>,
        label: String,
        text: String,
    },
    /// An opaque `#` directive line, re-emitted verbatim on its own line.
    Preprocessor { directive: String },
    Uniform {
        layout: Option<Vec<GlslToken>>,
        typeid: GlslType,
        size: Option<GlslInt>,
        name: GlslName,
    },
    Inout {
        layout: Option<Vec<GlslToken>>,
        direction: Direction,
        typeid: Option<GlslType>,
        size: Option<GlslInt>,
        name: Option<GlslName>,
    },
    /// The cross-stage varying anchor; carries the member-access lists the
    /// rename passes lock.
    InoutStruct {
        direction: Direction,
        type_name: GlslName,
        members: Vec<StructMember>,
        instance: Option<GlslName>,
        member_accesses: Vec<Vec<GlslName>>,
    },
    Struct {
        type_name: GlslName,
        members: Vec<StructMember>,
        instance: Option<GlslName>,
    },
    /// Function signature; the body scope is the single child block.
    Function {
        typeid: GlslType,
        name: GlslName,
        params: Vec<FunctionParam>,
    },
    Declaration {
        typeid: GlslType,
        entries: Vec<DeclarationEntry>,
    },
    Assignment {
        name: GlslName,
        modifiers: Vec<GlslToken>,
        operator: GlslOperator,
        statement: Vec<GlslToken>,
    },
    /// Control keyword with an optional parenthesized statement; the target
    /// is either an inlined statement or a child scope block.
    Control {
        control: GlslControl,
        condition: Option<Vec<GlslToken>>,
        statement: Option<Vec<GlslToken>>,
        declared: Vec<GlslName>,
    },
    Scope,
    /// Raw statement fallback: unrecognized code preserved verbatim, with the
    /// terminating semicolon included in the token list.
    Statement { tokens: Vec<GlslToken> },
}

impl GlslBlock {
    pub fn new(kind: BlockKind) -> BlockRef {
        Rc::new(RefCell::new(GlslBlock {
            parent: None,
            children: Vec::new(),
            kind,
        }))
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn children(&self) -> &[BlockRef] {
        &self.children
    }

    pub fn stage(&self) -> Option<StageType> {
        match &self.kind {
            BlockKind::Source { stage, .. } => *stage,
            _ => None,
        }
    }

    /// Names this block binds.
    pub fn names_declared(&self) -> Vec<GlslName> {
        match &self.kind {
            BlockKind::Uniform { name, .. } => vec![name.clone()],
            BlockKind::Inout { name, .. } => name.iter().cloned().collect(),
            BlockKind::InoutStruct {
                type_name,
                instance,
                ..
            } => match instance {
                Some(instance) => vec![instance.clone()],
                None => vec![type_name.clone()],
            },
            BlockKind::Struct {
                type_name,
                instance,
                ..
            } => {
                let mut ret = vec![type_name.clone()];
                ret.extend(instance.iter().cloned());
                ret
            }
            BlockKind::Function { name, params, .. } => {
                let mut ret = vec![name.clone()];
                ret.extend(params.iter().filter_map(|p| p.name.clone()));
                ret
            }
            BlockKind::Declaration { entries, .. } => {
                entries.iter().map(|e| e.name.clone()).collect()
            }
            BlockKind::Control { declared, .. } => declared.clone(),
            _ => Vec::new(),
        }
    }

    /// Identifier occurrences in this block's statement payload, excluding
    /// its own declared names.
    pub fn names_used(&self) -> Vec<GlslName> {
        let mut ret: Vec<GlslName> = Vec::new();
        match &self.kind {
            BlockKind::Function { name, .. } => ret.push(name.clone()),
            BlockKind::Assignment { name, .. } => ret.push(name.clone()),
            _ => {}
        }
        let declared = self.names_declared();
        for tokens in self.payload_vecs() {
            for token in tokens {
                if let GlslToken::Name(name) = token {
                    if !declared.iter().any(|d| d.ptr_eq(name)) {
                        ret.push(name.clone());
                    }
                }
            }
        }
        ret
    }

    pub fn has_locked_declared_name(&self, name: &str) -> bool {
        self.names_declared()
            .iter()
            .any(|n| n.is_locked() && n.format() == name)
    }

    pub fn has_locked_used_name(&self, name: &str) -> bool {
        self.names_used()
            .iter()
            .any(|n| n.is_locked() && n.format() == name)
    }

    /// Tell if the exact name object occurs in this block.
    pub fn has_used_name_exact(&self, name: &GlslName) -> bool {
        self.names_used().iter().any(|n| n.ptr_eq(name))
    }

    /// Replace the exact name object with a clone of the given token run.
    /// Returns the number of replacements.
    pub fn replace_used_name_exact(&mut self, name: &GlslName, tokens: &[GlslToken]) -> usize {
        let mut ret = 0;
        for vec in self.payload_vecs_mut() {
            let mut position = 0;
            while position < vec.len() {
                let hit = matches!(&vec[position], GlslToken::Name(n) if n.ptr_eq(name));
                if hit {
                    vec.splice(position..position + 1, tokens.iter().cloned());
                    position += tokens.len();
                    ret += 1;
                } else {
                    position += 1;
                }
            }
        }
        ret
    }

    /// The right-hand side of a declaration; what inlining substitutes.
    pub fn statement_tokens(&self) -> Vec<GlslToken> {
        match &self.kind {
            BlockKind::Declaration { entries, .. } => entries
                .first()
                .and_then(|e| e.initializer.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    pub fn members(&self) -> &[StructMember] {
        match &self.kind {
            BlockKind::InoutStruct { members, .. } | BlockKind::Struct { members, .. } => members,
            _ => &[],
        }
    }

    pub fn member_accesses(&self) -> Vec<Vec<GlslName>> {
        match &self.kind {
            BlockKind::InoutStruct {
                member_accesses, ..
            } => member_accesses.clone(),
            _ => Vec::new(),
        }
    }

    pub fn set_member_accesses(&mut self, accesses: Vec<Vec<GlslName>>) {
        if let BlockKind::InoutStruct {
            member_accesses, ..
        } = &mut self.kind
        {
            *member_accesses = accesses;
        }
    }

    /// The block type name of an interface block or struct.
    pub fn type_name(&self) -> GlslName {
        match &self.kind {
            BlockKind::InoutStruct { type_name, .. } | BlockKind::Struct { type_name, .. } => {
                type_name.clone()
            }
            _ => panic!("block '{}' has no type name", self),
        }
    }

    fn payload_vecs(&self) -> Vec<&Vec<GlslToken>> {
        match &self.kind {
            BlockKind::Declaration { entries, .. } => {
                entries.iter().filter_map(|e| e.initializer.as_ref()).collect()
            }
            BlockKind::Assignment {
                modifiers,
                statement,
                ..
            } => vec![modifiers, statement],
            BlockKind::Control {
                condition,
                statement,
                ..
            } => condition.iter().chain(statement.iter()).collect(),
            BlockKind::Statement { tokens } => vec![tokens],
            _ => Vec::new(),
        }
    }

    fn payload_vecs_mut(&mut self) -> Vec<&mut Vec<GlslToken>> {
        match &mut self.kind {
            BlockKind::Declaration { entries, .. } => entries
                .iter_mut()
                .filter_map(|e| e.initializer.as_mut())
                .collect(),
            BlockKind::Assignment {
                modifiers,
                statement,
                ..
            } => vec![modifiers, statement],
            BlockKind::Control {
                condition,
                statement,
                ..
            } => condition.iter_mut().chain(statement.iter_mut()).collect(),
            BlockKind::Statement { tokens } => vec![tokens],
            _ => Vec::new(),
        }
    }

    /// Local rewrites that shrink the statement payload; returns how many
    /// were performed, bounded by the budget (negative = unbounded).
    pub fn simplify(&mut self, budget: i64) -> usize {
        let mut ret = 0;
        for tokens in self.payload_vecs_mut() {
            loop {
                if budget >= 0 && ret as i64 >= budget {
                    return ret;
                }
                if !simplify_tokens(tokens) {
                    break;
                }
                ret += 1;
            }
        }
        ret
    }

    /// Formatted output of this block and everything below it.
    pub fn format(&self) -> String {
        match &self.kind {
            BlockKind::Source { .. } => source::format(self),
            BlockKind::Preprocessor { directive } => format!("{}\n", directive),
            BlockKind::Uniform { .. } => uniform::format(self),
            BlockKind::Inout { .. } | BlockKind::InoutStruct { .. } => inout::format(self),
            BlockKind::Struct { .. } => structure::format(self),
            BlockKind::Function { .. } => function::format(self),
            BlockKind::Declaration { .. } => declaration::format(self),
            BlockKind::Assignment { .. } => assignment::format(self),
            BlockKind::Control { .. } => control::format(self),
            BlockKind::Scope => scope::format(self),
            BlockKind::Statement { tokens } => format_tokens(tokens),
        }
    }
}

impl Display for GlslBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            BlockKind::Source { label, .. } => write!(f, "Source('{}')", label),
            BlockKind::Preprocessor { directive } => write!(f, "Preprocessor('{}')", directive),
            BlockKind::Uniform { name, .. } => write!(f, "Uniform('{}')", name.name()),
            BlockKind::Inout { name, direction, .. } => match name {
                Some(name) => write!(f, "Inout('{}')", name.name()),
                None => write!(f, "Inout('{}')", direction.format()),
            },
            BlockKind::InoutStruct { type_name, .. } => {
                write!(f, "InoutStruct('{}')", type_name.name())
            }
            BlockKind::Struct { type_name, .. } => write!(f, "Struct('{}')", type_name.name()),
            BlockKind::Function { name, .. } => write!(f, "Function('{}')", name.name()),
            BlockKind::Declaration { entries, .. } => {
                let names: Vec<String> = entries.iter().map(|e| e.name.name()).collect();
                write!(f, "Declaration('{}')", names.join(","))
            }
            BlockKind::Assignment { name, .. } => write!(f, "Assignment('{}')", name.name()),
            BlockKind::Control { control, .. } => write!(f, "Control('{}')", control.format()),
            BlockKind::Scope => write!(f, "Scope"),
            BlockKind::Statement { .. } => write!(f, "Statement"),
        }
    }
}

/// Attach a child, wiring the non-owning parent link.
pub fn add_child(parent: &BlockRef, child: &BlockRef) {
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    parent.borrow_mut().children.push(child.clone());
}

pub fn parent_of(block: &BlockRef) -> Option<BlockRef> {
    block.borrow().parent.as_ref().and_then(|weak| weak.upgrade())
}

/// Unlink a block from its parent; it no longer appears in formatted output.
pub fn remove_from_parent(block: &BlockRef) {
    if let Some(parent) = parent_of(block) {
        parent
            .borrow_mut()
            .children
            .retain(|child| !Rc::ptr_eq(child, block));
        block.borrow_mut().parent = None;
    }
}

/// All descendants of a block in document (preorder) order.
pub fn flatten(block: &BlockRef) -> Vec<BlockRef> {
    let mut ret = Vec::new();
    for child in block.borrow().children.iter() {
        ret.push(child.clone());
        ret.extend(flatten(child));
    }
    ret
}

fn is_word_boundary(last: Option<char>, next: Option<char>) -> bool {
    let tail = matches!(last, Some(c) if c.is_ascii_alphanumeric() || c == '_');
    let head = matches!(next, Some(c) if c.is_ascii_alphanumeric() || c == '_');
    tail && head
}

/// Append a formatted piece, inserting a space only where two identifier-like
/// runs would otherwise merge.
pub(crate) fn push_format(out: &mut String, piece: &str) {
    if is_word_boundary(out.chars().last(), piece.chars().next()) {
        out.push(' ');
    }
    out.push_str(piece);
}

/// Format a token run with minimal spacing.
pub(crate) fn format_tokens(tokens: &[GlslToken]) -> String {
    let mut ret = String::new();
    for token in tokens {
        push_format(&mut ret, &token.format());
    }
    ret
}

fn is_atomic(token: &GlslToken) -> bool {
    matches!(
        token,
        GlslToken::Name(_) | GlslToken::Int(_) | GlslToken::Float(_)
    )
}

/// Tell if a paren at this position cannot be a call, index or constructor.
fn is_grouping_context(previous: Option<&GlslToken>) -> bool {
    match previous {
        None => true,
        Some(GlslToken::Operator(_)) => true,
        Some(GlslToken::Paren(paren)) => paren.is_open(),
        _ => false,
    }
}

/// Remove one redundant paren pair: either a pair wrapping a single atomic
/// token, or a pair immediately wrapping another pair, both only in grouping
/// context. Returns whether a rewrite happened.
fn simplify_tokens(tokens: &mut Vec<GlslToken>) -> bool {
    for ii in 0..tokens.len() {
        let opener = match &tokens[ii] {
            GlslToken::Paren(paren)
                if paren.is_open() && paren.shape() == crate::token::ParenShape::Round =>
            {
                *paren
            }
            _ => continue,
        };
        let previous = if ii == 0 { None } else { Some(&tokens[ii - 1]) };
        if !is_grouping_context(previous) {
            continue;
        }
        // Locate the matching closer.
        let mut count = 1;
        let mut closer = None;
        for jj in ii + 1..tokens.len() {
            if let GlslToken::Paren(paren) = &tokens[jj] {
                count = opener.update(paren, count);
                if count == 0 {
                    closer = Some(jj);
                    break;
                }
            }
        }
        let jj = match closer {
            Some(jj) => jj,
            None => continue,
        };
        let single_atom = jj == ii + 2 && is_atomic(&tokens[ii + 1]);
        let doubled = jj > ii + 2
            && matches!(&tokens[ii + 1], GlslToken::Paren(inner) if inner.is_open() && inner.shape() == crate::token::ParenShape::Round)
            && {
                let mut inner_count = 1;
                let mut inner_close = None;
                for kk in ii + 2..tokens.len() {
                    if let GlslToken::Paren(paren) = &tokens[kk] {
                        inner_count = opener.update(paren, inner_count);
                        if inner_count == 0 {
                            inner_close = Some(kk);
                            break;
                        }
                    }
                }
                inner_close == Some(jj - 1)
            };
        if single_atom || doubled {
            tokens.remove(jj);
            tokens.remove(ii);
            return true;
        }
    }
    false
}

#[derive(Clone)]
/// ptree adapter for dumping a parsed block tree during development.
pub struct BlockTree(pub BlockRef);

impl ptree::TreeItem for BlockTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.0.borrow())
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        let children: Vec<BlockTree> = self
            .0
            .borrow()
            .children
            .iter()
            .cloned()
            .map(BlockTree)
            .collect();
        std::borrow::Cow::from(children)
    }
}

impl BlockTree {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
