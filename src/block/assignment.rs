use super::{
    extract_tokens, format_tokens, push_format, BlockKind, BlockRef, GlslBlock, Pat,
};
use crate::token::{GlslParen, GlslToken, ParenShape};

const ASSIGN_OPS: [&str; 6] = ["=", "+=", "-=", "*=", "/=", "%="];

/// Scan forward to the top-level terminating `;`; the returned statement
/// excludes it.
pub(crate) fn split_statement(tokens: &[GlslToken]) -> Option<(Vec<GlslToken>, &[GlslToken])> {
    let mut depth = 0usize;
    for (ii, token) in tokens.iter().enumerate() {
        match token {
            GlslToken::Paren(paren) => {
                if paren.is_open() {
                    depth += 1;
                } else {
                    depth = depth.checked_sub(1)?;
                }
            }
            _ if depth == 0 && token.is_operator(";") => {
                return Some((tokens[..ii].to_vec(), &tokens[ii + 1..]))
            }
            _ => {}
        }
    }
    None
}

/// Parse an assignment statement: a name, optional access and index
/// modifiers, an assignment operator and the right-hand side.
pub(crate) fn parse_assignment<'t>(
    tokens: &'t [GlslToken],
) -> Option<(BlockRef, &'t [GlslToken])> {
    let name = match tokens.first()? {
        GlslToken::Name(name) => name.clone(),
        _ => return None,
    };
    let mut rest = &tokens[1..];
    let mut modifiers: Vec<GlslToken> = Vec::new();
    loop {
        match rest.first()? {
            GlslToken::Access(_) => {
                modifiers.push(rest[0].clone());
                rest = &rest[1..];
            }
            GlslToken::Paren(paren) if paren.is_open() && paren.shape() == ParenShape::Square => {
                let (extracted, tail) = extract_tokens(rest, &[Pat::ScopeBracket])?;
                modifiers.push(rest[0].clone());
                modifiers.extend(extracted[0].scope()?.iter().cloned());
                modifiers.push(GlslToken::Paren(GlslParen::new(ParenShape::Square, false)));
                rest = tail;
            }
            _ => break,
        }
    }
    let (extracted, rest) = extract_tokens(rest, &[Pat::Alt(&ASSIGN_OPS)])?;
    let operator = match extracted[0].token()? {
        GlslToken::Operator(operator) => operator.clone(),
        _ => return None,
    };
    let (statement, rest) = split_statement(rest)?;
    Some((
        GlslBlock::new(BlockKind::Assignment {
            name,
            modifiers,
            operator,
            statement,
        }),
        rest,
    ))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (name, modifiers, operator, statement) = match block.kind() {
        BlockKind::Assignment {
            name,
            modifiers,
            operator,
            statement,
        } => (name, modifiers, operator, statement),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    push_format(&mut ret, &name.format());
    push_format(&mut ret, &format_tokens(modifiers));
    push_format(&mut ret, &operator.format());
    push_format(&mut ret, &format_tokens(statement));
    ret.push(';');
    ret
}
