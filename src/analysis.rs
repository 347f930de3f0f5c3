//! Name and scope analysis over one or more block trees: the parent-scope
//! rule, rename- and inline-conflict queries, merge-group construction and
//! member-access collection.
//!
//! Conflict queries are conservative: an uncertain answer declines the
//! rewrite, which can only cost output bytes, never correctness.

use crate::block::{
    flatten, is_mergable_with, parent_of, BlockKind, BlockRef, GlslBlock,
};
use crate::token::{GlslName, GlslType};
use crate::util::Log;
use std::rc::Rc;

/// A set of blocks and name occurrences that must rename together because
/// they refer to the same binding, possibly across several shader sources.
/// Held only for the duration of a single pass; no cycles escape.
pub(crate) struct MergeGroup {
    pub(crate) blocks: Vec<BlockRef>,
    pub(crate) names: Vec<GlslName>,
}

/// Find the scope-owning block for conflict analysis: ascend until hitting a
/// source, a scope owned by a function or control (return the owner), or a
/// function or control directly.
pub(crate) fn find_parent_scope(block: &BlockRef) -> BlockRef {
    let mut block = block.clone();
    loop {
        let parent = match parent_of(&block) {
            Some(parent) => parent,
            None => return block,
        };
        if matches!(parent.borrow().kind(), BlockKind::Scope) {
            if let Some(grand) = parent_of(&parent) {
                if matches!(
                    grand.borrow().kind(),
                    BlockKind::Control { .. } | BlockKind::Function { .. }
                ) {
                    return grand;
                }
            }
            return parent;
        }
        if matches!(
            parent.borrow().kind(),
            BlockKind::Control { .. } | BlockKind::Function { .. }
        ) {
            return parent;
        }
        block = parent;
    }
}

/// Tell if renaming the given block to `name` conflicts inside the parent
/// scope: a locked declaration anywhere forbids the rename, a locked use only
/// from the rename point onward.
pub(crate) fn has_name_conflict(parent: &BlockRef, block: &BlockRef, name: &str) -> bool {
    let mut found = false;
    for current in std::iter::once(parent.clone()).chain(flatten(parent)) {
        // Declared names take the name out of the scope permanently.
        if current.borrow().has_locked_declared_name(name) {
            return true;
        }
        // Other blocks reserve names from their inception onward.
        if Rc::ptr_eq(&current, block) {
            found = true;
        }
        if found && current.borrow().has_locked_used_name(name) {
            return true;
        }
    }
    false
}

fn inline_conflict_for(
    parent: &BlockRef,
    block: &BlockRef,
    names: &[GlslName],
    comparison: &GlslName,
) -> bool {
    let mut found = false;
    let mut uses = names.len();
    for current in flatten(parent) {
        if Rc::ptr_eq(&current, block) {
            found = true;
        }
        // Every consumed downstream use shrinks the hazard window.
        for name in names {
            if current.borrow().has_used_name_exact(name) {
                uses = uses.saturating_sub(1);
            }
        }
        if uses == 0 {
            return false;
        }
        // Assignment into a name the statement reads makes inlining impossible.
        if found {
            if let BlockKind::Assignment { name, .. } = current.borrow().kind() {
                if name.name() == comparison.name() {
                    return true;
                }
            }
        }
    }
    false
}

/// Tell if inlining the block's statement over the given uses would cross an
/// assignment to any name the statement reads.
pub(crate) fn has_inline_conflict(parent: &BlockRef, block: &BlockRef, names: &[GlslName]) -> bool {
    let statement = block.borrow().statement_tokens();
    for token in &statement {
        if let Some(comparison) = token.as_name() {
            if inline_conflict_for(parent, block, names, comparison) {
                return true;
            }
        }
    }
    false
}

/// Replace every downstream use of the names in the parent scope with the
/// block's statement tokens. Returns the number of replacements.
pub(crate) fn inline_instances(parent: &BlockRef, block: &BlockRef, names: &[GlslName]) -> usize {
    let tokens = block.borrow().statement_tokens();
    let mut ret = 0;
    for current in flatten(parent) {
        if Rc::ptr_eq(&current, block) {
            continue;
        }
        if parent_of(&current).map_or(false, |p| Rc::ptr_eq(&p, block)) {
            continue;
        }
        for name in names {
            if current.borrow().has_used_name_exact(name) {
                ret += current.borrow_mut().replace_used_name_exact(name, &tokens);
            }
        }
    }
    ret
}

/// Merge a single-block collected list into an existing group, de-duplicating
/// names by physical identity: distinct objects with the same spelling stay
/// separate.
pub(crate) fn merge_collected_name_lists(mut into: MergeGroup, from: MergeGroup) -> MergeGroup {
    if from.blocks.len() != 1 {
        panic!(
            "expected non-listing as first element of collected name list, got: {} blocks",
            from.blocks.len()
        );
    }
    into.blocks.extend(from.blocks);
    for name in from.names {
        if !into.names.iter().any(|n| n.ptr_eq(&name)) {
            into.names.push(name);
        }
    }
    into
}

fn inout_name(block: &GlslBlock) -> Option<GlslName> {
    match block.kind() {
        BlockKind::Inout { name, .. } => name.clone(),
        BlockKind::InoutStruct {
            instance,
            type_name,
            ..
        } => Some(instance.clone().unwrap_or_else(|| type_name.clone())),
        _ => None,
    }
}

fn is_inout_kind(block: &GlslBlock) -> bool {
    matches!(
        block.kind(),
        BlockKind::Inout { .. } | BlockKind::InoutStruct { .. }
    )
}

fn merge_collected_names_inout(groups: Vec<MergeGroup>) -> Vec<MergeGroup> {
    let mut ret: Vec<MergeGroup> = Vec::new();
    for group in groups {
        let anchor = group.blocks[0].clone();
        if is_inout_kind(&anchor.borrow()) {
            let mut target = None;
            for (index, candidate) in ret.iter().enumerate() {
                let head = candidate.blocks[0].clone();
                if is_inout_kind(&head.borrow())
                    && is_mergable_with(&head.borrow(), &anchor.borrow())
                {
                    let anchor_name = inout_name(&anchor.borrow());
                    let head_name = inout_name(&head.borrow());
                    if !matches!(&anchor_name, Some(n) if group.names[0].ptr_eq(n)) {
                        panic!(
                            "inout block inconsistency: '{}' vs. '{}'",
                            group.names[0].name(),
                            anchor.borrow()
                        );
                    }
                    if !matches!(&head_name, Some(n) if candidate.names[0].ptr_eq(n)) {
                        panic!(
                            "inout block inconsistency: '{}' vs. '{}'",
                            candidate.names[0].name(),
                            head.borrow()
                        );
                    }
                    target = Some(index);
                    break;
                }
            }
            if let Some(index) = target {
                let existing = ret.remove(index);
                ret.insert(index, merge_collected_name_lists(existing, group));
                continue;
            }
        }
        ret.push(group);
    }
    ret
}

/// Tell if a group is anchored by a function's own name, as opposed to a
/// parameter group sharing the same function block.
fn function_group_name(group: &MergeGroup) -> Option<String> {
    let anchor = group.blocks[0].borrow();
    match anchor.kind() {
        BlockKind::Function { name, .. } if group.names[0].ptr_eq(name) => Some(name.name()),
        _ => None,
    }
}

fn merge_collected_names_function(groups: Vec<MergeGroup>) -> Vec<MergeGroup> {
    let mut ret: Vec<MergeGroup> = Vec::new();
    for group in groups {
        if let Some(function_name) = function_group_name(&group) {
            let target = ret.iter().position(|candidate| {
                function_group_name(candidate).map_or(false, |head| head == function_name)
            });
            if let Some(index) = target {
                let existing = ret.remove(index);
                ret.insert(index, merge_collected_name_lists(existing, group));
                continue;
            }
        }
        ret.push(group);
    }
    ret
}

/// Merge matching inout blocks and function overloads from the collected
/// identifier groups, then propagate a consistent type over every group.
pub(crate) fn merge_collected_names(groups: Vec<MergeGroup>) -> Vec<MergeGroup> {
    let merged = merge_collected_names_function(merge_collected_names_inout(groups));
    for group in &merged {
        let mut typeid: Option<GlslType> = None;
        for name in &group.names {
            if let Some(found) = name.typeid() {
                if let Some(previous) = typeid {
                    if previous != found {
                        panic!(
                            "conflicting types for '{}': {} vs. {}",
                            group.names[0].name(),
                            previous.format(),
                            found.format()
                        );
                    }
                }
                typeid = Some(found);
            }
        }
        if let Some(typeid) = typeid {
            for name in &group.names {
                name.set_type(typeid);
            }
        }
    }
    merged
}

/// Collect all member-access lists of an interface block group: declared
/// members of every anchor plus every access reached from the group's name
/// occurrences. Lists come back sorted by use count, busiest first.
pub(crate) fn collect_member_accesses(
    blocks: &[BlockRef],
    names: &[GlslName],
    log: &Log<&'static str>,
) -> Vec<Vec<GlslName>> {
    let mut uses: Vec<(String, Vec<GlslName>)> = Vec::new();
    for block in blocks {
        let borrowed = block.borrow();
        for member in borrowed.members() {
            let spelling = member.name.name();
            match uses.iter().position(|(k, _)| *k == spelling) {
                Some(index) => uses[index].1.push(member.name.clone()),
                None => uses.push((spelling, vec![member.name.clone()])),
            }
        }
    }
    for name in names {
        let access = match name.access() {
            Some(access) => access,
            None => continue,
        };
        access.disable_swizzle();
        let member = access.name();
        let spelling = member.name();
        match uses.iter().position(|(k, _)| *k == spelling) {
            Some(index) => uses[index].1.push(member),
            None => panic!("access '{}' not present outside members", access.format()),
        }
    }
    let mut ret = Vec::new();
    for (_, name_list) in uses {
        if name_list.len() <= 1 {
            log.warn(&format!(
                "member '{}' of '{}' not accessed",
                name_list[0].name(),
                blocks[0].borrow()
            ));
        }
        let typeid = match name_list[0].typeid() {
            Some(typeid) => typeid,
            None => panic!("name '{}' has no type", name_list[0].name()),
        };
        for name in &name_list[1..] {
            name.set_type(typeid);
        }
        ret.push(name_list);
    }
    ret.sort_by(|a, b| b.len().cmp(&a.len()));
    ret
}

/// An alphabet of single characters, lower case before upper case.
pub(crate) fn single_character_alphabet() -> Vec<char> {
    ('a'..='z').chain('A'..='Z').collect()
}

/// Run a simplify pass over a root block, bounded by the budget
/// (negative = unbounded).
pub(crate) fn simplify_pass(block: &BlockRef, budget: i64) -> usize {
    let mut ret = 0;
    for current in flatten(block) {
        if budget >= 0 && ret as i64 >= budget {
            break;
        }
        let remaining = if budget < 0 { -1 } else { budget - ret as i64 };
        ret += current.borrow_mut().simplify(remaining);
    }
    ret
}
