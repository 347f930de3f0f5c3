use super::{
    add_child, parse_assignment, parse_control, parse_declaration, parse_function, parse_inout,
    parse_scope, parse_struct, parse_uniform, BlockKind, BlockRef, DeclarationEntry, GlslBlock,
};
use crate::analysis::MergeGroup;
use crate::token::{GlslName, GlslToken, SwizzleFamily};
use crate::tokenizer::{strip_comments, tokenize};
use std::collections::HashMap;
use std::rc::Rc;

/// Consume one raw `;`-terminated statement, keeping the semicolon. With no
/// terminator in sight the whole remainder is taken, guaranteeing progress.
fn split_raw_statement(tokens: &[GlslToken]) -> (Vec<GlslToken>, &[GlslToken]) {
    let mut depth = 0usize;
    for (ii, token) in tokens.iter().enumerate() {
        match token {
            GlslToken::Paren(paren) => {
                if paren.is_open() {
                    depth += 1;
                } else {
                    depth = depth.saturating_sub(1);
                }
            }
            _ if depth == 0 && token.is_operator(";") => {
                return (tokens[..=ii].to_vec(), &tokens[ii + 1..]);
            }
            _ => {}
        }
    }
    (tokens.to_vec(), &[])
}

/// Drive the block parsers over a token list, appending children to the
/// given parent. Statements no parser recognizes pass through verbatim.
pub(crate) fn parse_blocks(parent: &BlockRef, tokens: &[GlslToken]) {
    type Parser = for<'t> fn(&'t [GlslToken]) -> Option<(BlockRef, &'t [GlslToken])>;
    const PARSERS: [Parser; 8] = [
        parse_uniform,
        parse_inout,
        parse_struct,
        parse_function,
        parse_declaration,
        parse_assignment,
        parse_control,
        parse_scope,
    ];
    let mut remaining = tokens;
    'outer: while !remaining.is_empty() {
        for parser in PARSERS {
            if let Some((block, rest)) = parser(remaining) {
                add_child(parent, &block);
                remaining = rest;
                continue 'outer;
            }
        }
        let (statement, rest) = split_raw_statement(remaining);
        let block = GlslBlock::new(BlockKind::Statement { tokens: statement });
        add_child(parent, &block);
        remaining = rest;
    }
}

/// Parse the stored source text of a `Source` block into child blocks.
/// Preprocessor directive lines become opaque children in source order.
pub(crate) fn parse_source(source: &BlockRef) {
    let text = match source.borrow().kind() {
        BlockKind::Source { text, .. } => text.clone(),
        _ => return,
    };
    let stripped = strip_comments(&text);
    let mut pending = String::new();
    for line in stripped.lines() {
        if line.trim_start().starts_with('#') {
            parse_code(source, &pending);
            pending.clear();
            let directive = GlslBlock::new(BlockKind::Preprocessor {
                directive: line.trim().to_string(),
            });
            add_child(source, &directive);
        } else {
            pending.push_str(line);
            pending.push('\n');
        }
    }
    parse_code(source, &pending);
}

fn parse_code(source: &BlockRef, code: &str) {
    if code.trim().is_empty() {
        return;
    }
    parse_blocks(source, &tokenize(code));
}

pub(crate) fn format(block: &GlslBlock) -> String {
    let mut ret = String::new();
    for child in block.children() {
        let is_directive = matches!(child.borrow().kind(), BlockKind::Preprocessor { .. });
        if is_directive && !ret.is_empty() && !ret.ends_with('\n') {
            ret.push('\n');
        }
        ret.push_str(&child.borrow().format());
    }
    ret
}

/// Split declarations with several declarators into one block per name,
/// preparing the tree for inline analysis.
pub(crate) fn expand_recursive(block: &BlockRef) {
    let children: Vec<BlockRef> = block.borrow().children.clone();
    let mut new_children: Vec<BlockRef> = Vec::new();
    for child in children {
        let split = {
            let borrowed = child.borrow();
            match borrowed.kind() {
                BlockKind::Declaration { typeid, entries } if entries.len() > 1 => Some((
                    *typeid,
                    entries
                        .iter()
                        .map(|e| DeclarationEntry {
                            name: e.name.clone(),
                            initializer: e.initializer.clone(),
                        })
                        .collect::<Vec<_>>(),
                )),
                _ => None,
            }
        };
        match split {
            Some((typeid, entries)) => {
                for entry in entries {
                    let declaration = GlslBlock::new(BlockKind::Declaration {
                        typeid,
                        entries: vec![entry],
                    });
                    declaration.borrow_mut().parent = Some(Rc::downgrade(block));
                    new_children.push(declaration);
                }
            }
            None => {
                expand_recursive(&child);
                new_children.push(child);
            }
        }
    }
    block.borrow_mut().children = new_children;
}

/// Re-merge adjacent declarations that share a type; the reverse of
/// [expand_recursive]. Returns the number of merges.
pub(crate) fn collapse_recursive(block: &BlockRef) -> usize {
    let mut ret = 0;
    let children: Vec<BlockRef> = block.borrow().children.clone();
    let mut new_children: Vec<BlockRef> = Vec::new();
    for child in children {
        ret += collapse_recursive(&child);
        let mergable = match new_children.last() {
            Some(last) => {
                let previous = last.borrow();
                let current = child.borrow();
                matches!(
                    (previous.kind(), current.kind()),
                    (
                        BlockKind::Declaration { typeid: t1, .. },
                        BlockKind::Declaration { typeid: t2, .. },
                    ) if t1 == t2
                )
            }
            None => false,
        };
        if mergable {
            let moved: Vec<DeclarationEntry> = match &mut child.borrow_mut().kind {
                BlockKind::Declaration { entries, .. } => entries.drain(..).collect(),
                _ => unreachable!(),
            };
            let last = new_children.last().unwrap();
            if let BlockKind::Declaration { entries, .. } = &mut last.borrow_mut().kind {
                entries.extend(moved);
            }
            ret += 1;
        } else {
            new_children.push(child);
        }
    }
    block.borrow_mut().children = new_children;
    ret
}

/// Rewrite every live swizzle below the block into the selected family.
pub(crate) fn select_swizzle_recursive(block: &BlockRef, family: SwizzleFamily) {
    {
        let borrowed = block.borrow();
        for tokens in borrowed.payload_vecs() {
            for token in tokens {
                if let GlslToken::Access(access) = token {
                    access.select_swizzle(family);
                }
            }
        }
    }
    let children: Vec<BlockRef> = block.borrow().children.clone();
    for child in &children {
        select_swizzle_recursive(child, family);
    }
}

fn register(
    block: &BlockRef,
    name: &GlslName,
    frame: &mut HashMap<String, usize>,
    groups: &mut Vec<MergeGroup>,
) {
    groups.push(MergeGroup {
        blocks: vec![block.clone()],
        names: vec![name.clone()],
    });
    frame.insert(name.name(), groups.len() - 1);
}

fn collect_walk(
    block: &BlockRef,
    scopes: &mut Vec<HashMap<String, usize>>,
    groups: &mut Vec<MergeGroup>,
    unresolved: &mut Vec<(String, Vec<GlslName>)>,
) {
    let mut pushed = 0usize;
    {
        let borrowed = block.borrow();
        match borrowed.kind() {
            BlockKind::Function { name, params, .. } => {
                // The function name is visible to its siblings; parameters
                // only below the function itself.
                register(block, name, scopes.last_mut().unwrap(), groups);
                scopes.push(HashMap::new());
                pushed += 1;
                for param in params {
                    if let Some(name) = &param.name {
                        register(block, name, scopes.last_mut().unwrap(), groups);
                    }
                }
            }
            BlockKind::Control { declared, .. } => {
                scopes.push(HashMap::new());
                pushed += 1;
                for name in declared {
                    register(block, name, scopes.last_mut().unwrap(), groups);
                }
            }
            BlockKind::Scope => {
                scopes.push(HashMap::new());
                pushed += 1;
            }
            _ => {
                for name in borrowed.names_declared() {
                    register(block, &name, scopes.last_mut().unwrap(), groups);
                }
            }
        }
        for name in borrowed.names_used() {
            let spelling = name.name();
            let found = scopes
                .iter()
                .rev()
                .find_map(|frame| frame.get(&spelling).copied());
            match found {
                Some(index) => {
                    let group = &mut groups[index];
                    if !group.names.iter().any(|n| n.ptr_eq(&name)) {
                        group.names.push(name);
                    }
                }
                None => match unresolved.iter().position(|(k, _)| *k == spelling) {
                    Some(index) => unresolved[index].1.push(name),
                    None => unresolved.push((spelling, vec![name])),
                },
            }
        }
    }
    let children: Vec<BlockRef> = block.borrow().children.clone();
    for child in &children {
        collect_walk(child, scopes, groups, unresolved);
    }
    for _ in 0..pushed {
        scopes.pop();
    }
}

/// Collect every identifier group of a source in document order, resolving
/// uses to their nearest enclosing declaration. Uses that resolve to nothing
/// (builtins, cross-source bindings) come back keyed by spelling.
pub(crate) fn collect_identifiers(
    source: &BlockRef,
) -> (Vec<MergeGroup>, Vec<(String, Vec<GlslName>)>) {
    let mut groups = Vec::new();
    let mut unresolved = Vec::new();
    let mut scopes: Vec<HashMap<String, usize>> = vec![HashMap::new()];
    let children: Vec<BlockRef> = source.borrow().children.clone();
    for child in &children {
        collect_walk(child, &mut scopes, &mut groups, &mut unresolved);
    }
    (groups, unresolved)
}
