use super::{
    extract_tokens, format_tokens, push_format, BlockKind, BlockRef, Extracted, GlslBlock, Pat,
    StructMember,
};
use crate::token::{Direction, GlslInt, GlslName, GlslToken, GlslType};

/// Parse an optional `layout(…)` prefix; on a miss the input is untouched.
pub(crate) fn parse_layout<'t>(
    tokens: &'t [GlslToken],
) -> (Option<Vec<GlslToken>>, &'t [GlslToken]) {
    match extract_tokens(tokens, &[Pat::Lit("layout"), Pat::ScopeParen]) {
        Some((extracted, rest)) => match extracted[0].scope() {
            Some(scope) => (Some(scope.to_vec()), rest),
            None => (None, tokens),
        },
        None => (None, tokens),
    }
}

pub(crate) fn format_layout(layout: &[GlslToken]) -> String {
    format!("layout({})", format_tokens(layout))
}

/// Parse members of an interface block or struct: `type name;` repeated.
pub(crate) fn parse_member_list(mut tokens: &[GlslToken]) -> Option<Vec<StructMember>> {
    let mut ret = Vec::new();
    while !tokens.is_empty() {
        let (extracted, rest) = extract_tokens(tokens, &[Pat::Type, Pat::Name, Pat::Lit(";")])?;
        let typeid = match extracted[0].token()? {
            GlslToken::Type(typeid) => *typeid,
            _ => return None,
        };
        let name = match extracted[1].token()? {
            GlslToken::Name(name) => name.clone(),
            _ => return None,
        };
        name.set_type(typeid);
        ret.push(StructMember { typeid, name });
        tokens = rest;
    }
    Some(ret)
}

/// Parse an inout declaration: an interface block with members, a plain
/// direction + type + name declaration (optionally an array), or a
/// layout-only line such as `layout(triangles)in;`.
pub(crate) fn parse_inout<'t>(tokens: &'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])> {
    let (layout, content) = parse_layout(tokens);
    // Interface block form.
    if let Some((extracted, rest)) =
        extract_tokens(content, &[Pat::InoutDir, Pat::Name, Pat::ScopeBrace])
    {
        let direction = as_direction(&extracted[0])?;
        let type_name = as_name(&extracted[1])?;
        if let Some(members) = parse_member_list(extracted[2].scope()?) {
            if let Some((tail, rest)) = extract_tokens(rest, &[Pat::Name, Pat::Lit(";")]) {
                let instance = as_name(&tail[0])?;
                return Some((
                    make_struct(direction, type_name, members, Some(instance)),
                    rest,
                ));
            }
            if let Some((_, rest)) = extract_tokens(rest, &[Pat::Lit(";")]) {
                return Some((make_struct(direction, type_name, members, None), rest));
            }
        }
    }
    // Plain declaration, with or without an array size.
    if let Some((extracted, rest)) = extract_tokens(
        content,
        &[Pat::InoutDir, Pat::Type, Pat::Name, Pat::Lit(";")],
    ) {
        let direction = as_direction(&extracted[0])?;
        let typeid = as_type(&extracted[1])?;
        let name = as_name(&extracted[2])?;
        return Some((make(layout, direction, Some(typeid), None, Some(name)), rest));
    }
    if let Some((extracted, rest)) = extract_tokens(
        content,
        &[
            Pat::InoutDir,
            Pat::Type,
            Pat::Name,
            Pat::Lit("["),
            Pat::Int,
            Pat::Lit("]"),
            Pat::Lit(";"),
        ],
    ) {
        let direction = as_direction(&extracted[0])?;
        let typeid = as_type(&extracted[1])?;
        let name = as_name(&extracted[2])?;
        let size = as_int(&extracted[3])?;
        return Some((
            make(layout, direction, Some(typeid), Some(size), Some(name)),
            rest,
        ));
    }
    // Layout-only primitive declarations carry no type or name.
    if layout.is_some() {
        if let Some((extracted, rest)) = extract_tokens(content, &[Pat::InoutDir, Pat::Lit(";")])
        {
            let direction = as_direction(&extracted[0])?;
            return Some((make(layout, direction, None, None, None), rest));
        }
    }
    None
}

fn as_direction(extracted: &Extracted) -> Option<Direction> {
    match extracted.token()? {
        GlslToken::Inout(direction) => Some(*direction),
        _ => None,
    }
}

fn as_name(extracted: &Extracted) -> Option<GlslName> {
    match extracted.token()? {
        GlslToken::Name(name) => Some(name.clone()),
        _ => None,
    }
}

fn as_type(extracted: &Extracted) -> Option<GlslType> {
    match extracted.token()? {
        GlslToken::Type(typeid) => Some(*typeid),
        _ => None,
    }
}

fn as_int(extracted: &Extracted) -> Option<GlslInt> {
    match extracted.token()? {
        GlslToken::Int(number) => Some(number.clone()),
        _ => None,
    }
}

fn make(
    layout: Option<Vec<GlslToken>>,
    direction: Direction,
    typeid: Option<GlslType>,
    size: Option<GlslInt>,
    name: Option<GlslName>,
) -> BlockRef {
    if let (Some(typeid), Some(name)) = (typeid, &name) {
        name.set_type(typeid);
    }
    GlslBlock::new(BlockKind::Inout {
        layout,
        direction,
        typeid,
        size,
        name,
    })
}

fn make_struct(
    direction: Direction,
    type_name: GlslName,
    members: Vec<StructMember>,
    instance: Option<GlslName>,
) -> BlockRef {
    GlslBlock::new(BlockKind::InoutStruct {
        direction,
        type_name,
        members,
        instance,
        member_accesses: Vec::new(),
    })
}

/// Tell if two inout blocks describe the same cross-stage binding.
pub(crate) fn is_mergable_with(left: &GlslBlock, right: &GlslBlock) -> bool {
    match (left.kind(), right.kind()) {
        (
            BlockKind::Inout {
                direction: d1,
                typeid: t1,
                name: Some(n1),
                ..
            },
            BlockKind::Inout {
                direction: d2,
                typeid: t2,
                name: Some(n2),
                ..
            },
        ) => d1.is_compatible_with(d2) && t1 == t2 && n1.name() == n2.name(),
        (
            BlockKind::InoutStruct {
                direction: d1,
                type_name: tn1,
                members: m1,
                ..
            },
            BlockKind::InoutStruct {
                direction: d2,
                type_name: tn2,
                members: m2,
                ..
            },
        ) => {
            d1.is_compatible_with(d2)
                && tn1.name() == tn2.name()
                && m1.len() == m2.len()
                && m1.iter().zip(m2.iter()).all(|(a, b)| {
                    a.typeid == b.typeid && a.name.name() == b.name.name()
                })
        }
        _ => false,
    }
}

pub(crate) fn format(block: &GlslBlock) -> String {
    match block.kind() {
        BlockKind::Inout {
            layout,
            direction,
            typeid,
            size,
            name,
        } => {
            let mut ret = String::new();
            if let Some(layout) = layout {
                ret.push_str(&format_layout(layout));
            }
            push_format(&mut ret, direction.format());
            if let Some(typeid) = typeid {
                push_format(&mut ret, &typeid.format());
            }
            if let Some(name) = name {
                push_format(&mut ret, &name.format());
            }
            if let Some(size) = size {
                ret.push('[');
                ret.push_str(&size.format());
                ret.push(']');
            }
            ret.push(';');
            ret
        }
        BlockKind::InoutStruct {
            direction,
            type_name,
            members,
            instance,
            ..
        } => {
            let mut ret = String::new();
            push_format(&mut ret, direction.format());
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
        _ => unreachable!(),
    }
}
