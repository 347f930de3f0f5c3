use super::scope::parse_scope;
use super::{
    add_child, extract_tokens, push_format, BlockKind, BlockRef, FunctionParam, GlslBlock, Pat,
};
use crate::token::{GlslToken, TypeKind};

/// Parse a comma-separated parameter list: each parameter is an optional
/// inout qualifier, a type and an optional name.
fn parse_parameter_list(tokens: &[GlslToken]) -> Option<Vec<FunctionParam>> {
    if tokens.is_empty() {
        return Some(Vec::new());
    }
    let mut parts: Vec<Vec<GlslToken>> = Vec::new();
    let mut current: Vec<GlslToken> = Vec::new();
    for token in tokens {
        if token.is_operator(",") {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(token.clone());
        }
    }
    parts.push(current);
    let mut ret = Vec::new();
    for part in parts {
        let mut rest = part.as_slice();
        let direction = match rest.first() {
            Some(GlslToken::Inout(direction)) => {
                rest = &rest[1..];
                Some(*direction)
            }
            _ => None,
        };
        let typeid = match rest.first() {
            Some(GlslToken::Type(typeid)) => *typeid,
            _ => return None,
        };
        rest = &rest[1..];
        let name = match rest.first() {
            Some(GlslToken::Name(name)) => {
                name.set_type(typeid);
                rest = &rest[1..];
                Some(name.clone())
            }
            None => None,
            _ => return None,
        };
        if !rest.is_empty() {
            return None;
        }
        ret.push(FunctionParam {
            direction,
            typeid,
            name,
        });
    }
    Some(ret)
}

/// Parse a function definition; prototypes without a body miss and fall back
/// to raw pass-through.
pub(crate) fn parse_function<'t>(tokens: &'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])> {
    let (extracted, rest) = extract_tokens(tokens, &[Pat::Type, Pat::Name, Pat::ScopeParen])?;
    let typeid = match extracted[0].token()? {
        GlslToken::Type(typeid) => *typeid,
        _ => return None,
    };
    let name = match extracted[1].token()? {
        GlslToken::Name(name) => name.clone(),
        _ => return None,
    };
    let params = parse_parameter_list(extracted[2].scope()?)?;
    let (scope, rest) = parse_scope(rest)?;
    name.set_type(typeid);
    let function = GlslBlock::new(BlockKind::Function {
        typeid,
        name,
        params,
    });
    add_child(&function, &scope);
    Some((function, rest))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (typeid, name, params) = match block.kind() {
        BlockKind::Function {
            typeid,
            name,
            params,
        } => (typeid, name, params),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    push_format(&mut ret, &typeid.format());
    push_format(&mut ret, &name.format());
    ret.push('(');
    for (ii, param) in params.iter().enumerate() {
        if ii > 0 {
            ret.push(',');
        }
        if let Some(direction) = &param.direction {
            push_format(&mut ret, direction.format());
        }
        if !(param.typeid.kind() == TypeKind::Void && param.name.is_none() && params.len() == 1) {
            push_format(&mut ret, &param.typeid.format());
        }
        if let Some(name) = &param.name {
            push_format(&mut ret, &name.format());
        }
    }
    ret.push(')');
    for child in block.children() {
        ret.push_str(&child.borrow().format());
    }
    ret
}
