use super::{push_format, BlockKind, BlockRef, DeclarationEntry, GlslBlock};
use crate::token::{GlslName, GlslToken};

/// Scan forward to the next top-level `,` or `;`, tracking paren nesting.
fn initializer_end(tokens: &[GlslToken]) -> Option<usize> {
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
            _ if depth == 0 && (token.is_operator(",") || token.is_operator(";")) => {
                return Some(ii)
            }
            _ => {}
        }
    }
    None
}

/// Parse a declaration statement: a type followed by one or more declarators
/// with optional initializers.
pub(crate) fn parse_declaration<'t>(
    tokens: &'t [GlslToken],
) -> Option<(BlockRef, &'t [GlslToken])> {
    let typeid = match tokens.first()? {
        GlslToken::Type(typeid) => *typeid,
        _ => return None,
    };
    let mut rest = &tokens[1..];
    let mut entries: Vec<(GlslName, Option<Vec<GlslToken>>)> = Vec::new();
    loop {
        let name = match rest.first()? {
            GlslToken::Name(name) => name.clone(),
            _ => return None,
        };
        rest = &rest[1..];
        let mut initializer = None;
        if matches!(rest.first(), Some(token) if token.is_operator("=")) {
            rest = &rest[1..];
            let end = initializer_end(rest)?;
            if end == 0 {
                return None;
            }
            initializer = Some(rest[..end].to_vec());
            rest = &rest[end..];
        }
        entries.push((name, initializer));
        match rest.first()? {
            token if token.is_operator(",") => {
                rest = &rest[1..];
            }
            token if token.is_operator(";") => {
                rest = &rest[1..];
                break;
            }
            _ => return None,
        }
    }
    // Commit types only once the whole statement matched.
    let entries: Vec<DeclarationEntry> = entries
        .into_iter()
        .map(|(name, initializer)| {
            name.set_type(typeid);
            DeclarationEntry { name, initializer }
        })
        .collect();
    Some((
        GlslBlock::new(BlockKind::Declaration { typeid, entries }),
        rest,
    ))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (typeid, entries) = match block.kind() {
        BlockKind::Declaration { typeid, entries } => (typeid, entries),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    push_format(&mut ret, &typeid.format());
    for (ii, entry) in entries.iter().enumerate() {
        if ii > 0 {
            ret.push(',');
        }
        push_format(&mut ret, &entry.name.format());
        if let Some(initializer) = &entry.initializer {
            ret.push('=');
            push_format(&mut ret, &super::format_tokens(initializer));
        }
    }
    ret.push(';');
    ret
}
