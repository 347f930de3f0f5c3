use super::inout::{format_layout, parse_layout};
use super::{extract_tokens, push_format, BlockKind, BlockRef, GlslBlock, Pat};
use crate::token::{GlslInt, GlslName, GlslToken, GlslType};

/// Parse a uniform declaration, with an optional layout prefix and the array
/// size accepted on either side of the name.
pub(crate) fn parse_uniform<'t>(
    tokens: &'t [GlslToken],
) -> Option<(BlockRef, &'t [GlslToken])> {
    let (layout, content) = parse_layout(tokens);
    let (extracted, content) = extract_tokens(content, &[Pat::Lit("uniform"), Pat::Type])?;
    let typeid = match extracted[0].token()? {
        GlslToken::Type(typeid) => *typeid,
        _ => return None,
    };
    // Array forms first.
    if let Some((extracted, rest)) = extract_tokens(
        content,
        &[Pat::Name, Pat::Lit("["), Pat::UInt, Pat::Lit("]"), Pat::Lit(";")],
    ) {
        let name = as_name(&extracted[0])?;
        let size = as_int(&extracted[1])?;
        return Some((make(layout, typeid, Some(size), name), rest));
    }
    if let Some((extracted, rest)) = extract_tokens(
        content,
        &[Pat::Lit("["), Pat::UInt, Pat::Lit("]"), Pat::Name, Pat::Lit(";")],
    ) {
        let size = as_int(&extracted[0])?;
        let name = as_name(&extracted[1])?;
        return Some((make(layout, typeid, Some(size), name), rest));
    }
    // No array size, default to just the name.
    let (extracted, rest) = extract_tokens(content, &[Pat::Name, Pat::Lit(";")])?;
    let name = as_name(&extracted[0])?;
    Some((make(layout, typeid, None, name), rest))
}

fn as_name(extracted: &super::Extracted) -> Option<GlslName> {
    match extracted.token()? {
        GlslToken::Name(name) => Some(name.clone()),
        _ => None,
    }
}

fn as_int(extracted: &super::Extracted) -> Option<GlslInt> {
    match extracted.token()? {
        GlslToken::Int(number) => Some(number.clone()),
        _ => None,
    }
}

fn make(
    layout: Option<Vec<GlslToken>>,
    typeid: GlslType,
    size: Option<GlslInt>,
    name: GlslName,
) -> BlockRef {
    name.set_type(typeid);
    GlslBlock::new(BlockKind::Uniform {
        layout,
        typeid,
        size,
        name,
    })
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (layout, typeid, size, name) = match block.kind() {
        BlockKind::Uniform {
            layout,
            typeid,
            size,
            name,
        } => (layout, typeid, size, name),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    if let Some(layout) = layout {
        ret.push_str(&format_layout(layout));
    }
    push_format(&mut ret, "uniform");
    push_format(&mut ret, &typeid.format());
    if let Some(size) = size {
        ret.push('[');
        ret.push_str(&size.format());
        ret.push(']');
    }
    push_format(&mut ret, &name.format());
    ret.push(';');
    ret
}
