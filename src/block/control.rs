use super::assignment::split_statement;
use super::scope::parse_scope;
use super::{
    add_child, extract_tokens, format_tokens, push_format, BlockKind, BlockRef, GlslBlock, Pat,
};
use crate::token::{ControlWord, GlslName, GlslToken};

/// Names declared inside a control statement (`for(int i=0;…)`): every
/// `type name` pair found in the parenthesized tokens.
fn scan_declared(condition: &[GlslToken]) -> Vec<GlslName> {
    let mut ret = Vec::new();
    for window in condition.windows(2) {
        if let (GlslToken::Type(typeid), GlslToken::Name(name)) = (&window[0], &window[1]) {
            name.set_type(*typeid);
            ret.push(name.clone());
        }
    }
    ret
}

/// Parse a control construct. The target is either a child scope or an
/// inlined `;`-terminated statement.
pub(crate) fn parse_control<'t>(tokens: &'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])> {
    let (extracted, mut rest) = extract_tokens(tokens, &[Pat::Control])?;
    let control = match extracted[0].token()? {
        GlslToken::Control(control) => *control,
        _ => return None,
    };
    match control.word() {
        ControlWord::Return => {
            let (statement, rest) = split_statement(rest)?;
            return Some((
                GlslBlock::new(BlockKind::Control {
                    control,
                    condition: None,
                    statement: Some(statement),
                    declared: Vec::new(),
                }),
                rest,
            ));
        }
        ControlWord::Discard => {
            let (statement, rest) = split_statement(rest)?;
            if !statement.is_empty() {
                return None;
            }
            return Some((
                GlslBlock::new(BlockKind::Control {
                    control,
                    condition: None,
                    statement: Some(statement),
                    declared: Vec::new(),
                }),
                rest,
            ));
        }
        _ => {}
    }
    let mut condition = None;
    let mut declared = Vec::new();
    if control.has_condition() {
        let (extracted, tail) = extract_tokens(rest, &[Pat::ScopeParen])?;
        let scope = extracted[0].scope()?;
        declared = scan_declared(scope);
        condition = Some(scope.to_vec());
        rest = tail;
    }
    let block = GlslBlock::new(BlockKind::Control {
        control,
        condition,
        statement: None,
        declared,
    });
    if let Some((scope, tail)) = parse_scope(rest) {
        add_child(&block, &scope);
        return Some((block, tail));
    }
    let (statement, tail) = split_statement(rest)?;
    if let BlockKind::Control { statement: slot, .. } = &mut block.borrow_mut().kind {
        *slot = Some(statement);
    }
    Some((block, tail))
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let (control, condition, statement) = match block.kind() {
        BlockKind::Control {
            control,
            condition,
            statement,
            ..
        } => (control, condition, statement),
        _ => unreachable!(),
    };
    let mut ret = String::new();
    push_format(&mut ret, &control.format());
    if let Some(condition) = condition {
        ret.push('(');
        ret.push_str(&format_tokens(condition));
        ret.push(')');
    }
    match statement {
        Some(statement) => {
            push_format(&mut ret, &format_tokens(statement));
            ret.push(';');
        }
        None => {
            for child in block.children() {
                ret.push_str(&child.borrow().format());
            }
        }
    }
    ret
}
