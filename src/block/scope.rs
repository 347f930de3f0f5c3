use super::source::parse_blocks;
use super::{extract_scope, BlockKind, BlockRef, GlslBlock};
use crate::token::{GlslToken, ParenShape};

/// Parse a `{ … }` scope, recursing into its statements.
pub(crate) fn parse_scope<'t>(tokens: &'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])> {
    let opener = match tokens.first()? {
        GlslToken::Paren(paren) if paren.is_open() && paren.shape() == ParenShape::Curly => *paren,
        _ => return None,
    };
    let (inner, rest) = extract_scope(&tokens[1..], &opener)?;
    let scope = GlslBlock::new(BlockKind::Scope);
    parse_blocks(&scope, inner);
    Some((scope, rest))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let mut ret = String::from("{");
    for child in block.children() {
        ret.push_str(&child.borrow().format());
    }
    ret.push('}');
    ret
}
