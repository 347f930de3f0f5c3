use super::inout::parse_member_list;
use super::{extract_tokens, push_format, BlockKind, BlockRef, GlslBlock, Pat};
use crate::token::GlslToken;

/// Parse a struct definition, optionally followed by an instance name.
pub(crate) fn parse_struct<'t>(tokens: &'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])> {
    let (extracted, rest) =
        extract_tokens(tokens, &[Pat::Lit("struct"), Pat::Name, Pat::ScopeBrace])?;
    let type_name = match extracted[0].token()? {
        GlslToken::Name(name) => name.clone(),
        _ => return None,
    };
    let members = parse_member_list(extracted[1].scope()?)?;
    if let Some((tail, rest)) = extract_tokens(rest, &[Pat::Name, Pat::Lit(";")]) {
        let instance = match tail[0].token()? {
            GlslToken::Name(name) => name.clone(),
            _ => return None,
        };
        return Some((
            GlslBlock::new(BlockKind::Struct {
                type_name,
                members,
                instance: Some(instance),
            }),
            rest,
        ));
    }
    let (_, rest) = extract_tokens(rest, &[Pat::Lit(";")])?;
    Some((
        GlslBlock::new(BlockKind::Struct {
            type_name,
            members,
            instance: None,
        }),
        rest,
    ))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (type_name, members, instance) = match block.kind() {
        BlockKind::Struct {
            type_name,
            members,
            instance,
        } => (type_name, members, instance),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    push_format(&mut ret, "struct");
    push_format(&mut ret, &type_name.format());
    ret.push('{');
    for member in members {
        push_format(&mut ret, &member.typeid.format());
        push_format(&mut ret, &member.name.format());
        ret.push(';');
    }
    ret.push('}');
    if let Some(instance) = instance {
        push_format(&mut ret, &instance.format());
    }
    ret.push(';');
    ret
}
