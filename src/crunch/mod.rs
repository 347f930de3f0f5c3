//! A module consists of the rewrite engine driving the crunch passes over a
//! [Glsl](crate::Glsl) database: expand, iterated inlining with cross-stage
//! identifier merging, simplification, swizzle selection, renaming and the
//! final declaration collapse.

#[cfg(test)]
mod __tests__;

use crate::analysis::{
    collect_member_accesses, find_parent_scope, has_inline_conflict, has_name_conflict,
    inline_instances, merge_collected_names, simplify_pass, single_character_alphabet, MergeGroup,
};
use crate::block::{
    collapse_recursive, collect_identifiers, expand_recursive, parse_source, remove_from_parent,
    select_swizzle_recursive, BlockKind, BlockRef, GlslBlock,
};
use crate::token::{GlslName, SwizzleFamily};
use crate::util::Log;
use crate::{CrunchOptions, Glsl, Mode, StageType};
use once_cell::unsync::OnceCell;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

impl FromStr for Mode {
    type Err = String;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "none" => Ok(Mode::None),
            "full" => Ok(Mode::Full),
            _ => Err(format!("'{}' is not a crunch mode.", source)),
        }
    }
}

impl Default for CrunchOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Full,
            max_inlines: -1,
            max_renames: -1,
            max_simplifys: -1,
        }
    }
}

impl Default for Glsl {
    fn default() -> Self {
        Self::new()
    }
}

impl Glsl {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            log: OnceCell::new(),
        }
    }

    /// Register a shader source. `stage` is `None` for generic sources which
    /// participate in name collection for every typed peer.
    pub fn add_source(&mut self, label: &str, stage: Option<StageType>, text: &str) {
        self.sources.push(GlslBlock::new(BlockKind::Source {
            stage,
            label: label.to_string(),
            text: text.to_string(),
        }));
    }

    /// Set a log label to debug the crunch passes.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.log
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    fn log(&self) -> Log<&'static str> {
        self.log.get().copied().unwrap_or(Log::None)
    }

    /// Parse all registered sources into block trees. Statements the block
    /// parsers miss pass through verbatim, so parsing itself never fails.
    pub fn parse(&mut self) {
        for source in &self.sources {
            parse_source(source);
        }
    }

    /// Formatted output, one string per source, deterministic for a given
    /// input and cap configuration.
    pub fn format(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|source| source.borrow().format())
            .collect()
    }

    /// Count instances of alphabetic letters within the formatted code.
    fn count(&self) -> HashMap<char, usize> {
        let mut ret = HashMap::new();
        for source in &self.sources {
            for ch in source.borrow().format().chars() {
                if ch.is_alphabetic() {
                    *ret.entry(ch).or_insert(0) += 1;
                }
            }
        }
        ret
    }

    /// Letters sorted by instance count, then spelling length, then
    /// lexicographic order; the head of the list is the rename alphabet.
    fn count_sorted(&self) -> Vec<char> {
        let mut list: Vec<(usize, char)> =
            self.count().into_iter().map(|(ch, n)| (n, ch)).collect();
        list.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        list.into_iter().map(|entry| entry.1).collect()
    }

    /// Compatible peers share name visibility: one side of the pair must be
    /// a generic source.
    fn peers_of(&self, parent: &BlockRef) -> Vec<BlockRef> {
        let parent_stage = parent.borrow().stage();
        self.sources
            .iter()
            .filter(|source| {
                !Rc::ptr_eq(source, parent)
                    && (parent_stage.is_none() || source.borrow().stage().is_none())
            })
            .cloned()
            .collect()
    }

    /// Tell if renaming the given blocks into the name would conflict,
    /// fanning out across compatible sources for file-level blocks.
    fn has_name_conflict(&self, blocks: &[BlockRef], name: &str) -> bool {
        for block in blocks {
            let parent = find_parent_scope(block);
            if matches!(parent.borrow().kind(), BlockKind::Source { .. }) {
                for peer in self.peers_of(&parent) {
                    if has_name_conflict(&peer, block, name) {
                        return true;
                    }
                }
            }
            if has_name_conflict(&parent, block, name) {
                return true;
            }
        }
        false
    }

    /// Tell if inlining the given blocks would change evaluation order.
    fn has_inline_conflict(&self, blocks: &[BlockRef], names: &[GlslName]) -> bool {
        for block in blocks {
            let parent = find_parent_scope(block);
            if matches!(parent.borrow().kind(), BlockKind::Source { .. }) {
                for peer in self.peers_of(&parent) {
                    if has_inline_conflict(&peer, block, names) {
                        return true;
                    }
                }
            }
            if has_inline_conflict(&parent, block, names) {
                return true;
            }
        }
        false
    }

    /// Inline a declaration into every use and unlink it from its parent.
    fn inline(&self, block: &BlockRef, names: &[GlslName]) -> usize {
        let mut ret = 0;
        let parent = find_parent_scope(block);
        if matches!(parent.borrow().kind(), BlockKind::Source { .. }) {
            for peer in self.peers_of(&parent) {
                ret += inline_instances(&peer, block, names);
            }
        }
        ret += inline_instances(&parent, block, names);
        remove_from_parent(block);
        ret
    }

    /// Run one inline pass. Returns the merged identifier groups when no
    /// inlining could be done, `None` to signal another round.
    fn inline_pass(&self, allow_inline: bool) -> Option<Vec<MergeGroup>> {
        // Collect identifiers. First pass collects from generic sources and
        // absorbs matching unresolved uses from every typed peer.
        let mut collected: Vec<MergeGroup> = Vec::new();
        let mut typed_groups: Vec<MergeGroup> = Vec::new();
        let mut typed_unresolved: Vec<(String, Vec<GlslName>)> = Vec::new();
        for source in &self.sources {
            let stage = source.borrow().stage();
            let (groups, unresolved) = collect_identifiers(source);
            if stage.is_none() {
                collected.extend(groups);
            } else {
                typed_groups.extend(groups);
                typed_unresolved.extend(unresolved);
            }
        }
        for group in &mut collected {
            let spelling = group.names[0].name();
            for (_, names) in typed_unresolved.iter().filter(|(k, _)| *k == spelling) {
                for name in names {
                    if !group.names.iter().any(|n| n.ptr_eq(name)) {
                        group.names.push(name.clone());
                    }
                }
            }
        }
        // Second pass collects from the typed sources themselves.
        collected.extend(typed_groups);
        // Merge matching inout blocks and function overloads.
        let mut merged = merge_collected_names(collected);
        merged.sort_by(|a, b| b.names.len().cmp(&a.names.len()));
        // Attach member accesses to interface and struct blocks.
        for group in &merged {
            let anchor = group.blocks[0].clone();
            let wants_members = matches!(
                anchor.borrow().kind(),
                BlockKind::InoutStruct { .. } | BlockKind::Struct { .. }
            );
            if !wants_members {
                continue;
            }
            let accesses = collect_member_accesses(&group.blocks, &group.names, &self.log());
            anchor.borrow_mut().set_member_accesses(accesses);
        }
        if !allow_inline {
            return Some(merged);
        }
        // Perform at most one inline; a hit means another pass can be done.
        for group in &merged {
            if group.blocks.len() > 1 {
                continue;
            }
            let anchor = group.blocks[0].clone();
            if !matches!(anchor.borrow().kind(), BlockKind::Declaration { .. }) {
                continue;
            }
            if !group.names[0].is_inlineable() {
                continue;
            }
            if !self.has_inline_conflict(&group.blocks, &group.names) {
                self.inline(&anchor, &group.names);
                return None;
            }
        }
        Some(merged)
    }

    /// Invent a new name when existing names have run out: single letters
    /// first, then a letter followed by a number, busiest letters first.
    fn invent_name(&self, blocks: &[BlockRef], counted: &[char]) -> String {
        for letter in single_character_alphabet() {
            let candidate = letter.to_string();
            if !self.has_name_conflict(blocks, &candidate) {
                return candidate;
            }
        }
        let mut suffix = 0usize;
        loop {
            for letter in counted {
                let candidate = format!("{}{}", letter, suffix);
                if !self.has_name_conflict(blocks, &candidate) {
                    return candidate;
                }
            }
            suffix += 1;
        }
    }

    /// Lock a whole merge group to the busiest conflict-free letter, or to an
    /// invented name when every letter is taken.
    fn rename_pass(&self, blocks: &[BlockRef], names: &[GlslName]) {
        let counted = self.count_sorted();
        for letter in &counted {
            let candidate = letter.to_string();
            if !self.has_name_conflict(blocks, &candidate) {
                for name in names {
                    name.lock(&candidate);
                }
                return;
            }
        }
        let target = self.invent_name(blocks, &counted);
        for name in names {
            name.lock(&target);
        }
    }

    /// Lock every member-access list of an interface block to the hottest
    /// letters, busiest member first. Returns the renames performed.
    fn rename_members(&self, block: &BlockRef, max_renames: i64) -> i64 {
        let accesses = block.borrow().member_accesses();
        let counted = self.count_sorted();
        if counted.len() < accesses.len() {
            panic!("having more members than used letters should be impossible");
        }
        let mut renames = accesses.len() as i64;
        if max_renames >= 0 {
            renames = renames.min(max_renames);
        }
        for (name_list, letter) in accesses.iter().take(renames as usize).zip(counted.iter()) {
            for name in name_list {
                name.lock(&letter.to_string());
            }
        }
        renames
    }

    /// Lock the block type name of every element of an inout merge group.
    /// The target is re-picked per element; block type names never enter the
    /// conflict sets, so the picks coincide.
    fn rename_block(&self, blocks: &[BlockRef]) {
        for block in blocks {
            let counted = self.count_sorted();
            let mut target = None;
            for letter in &counted {
                let candidate = letter.to_string();
                if !self.has_name_conflict(std::slice::from_ref(block), &candidate) {
                    target = Some(candidate);
                    break;
                }
            }
            let target = target
                .unwrap_or_else(|| self.invent_name(std::slice::from_ref(block), &counted));
            block.borrow().type_name().lock(&target);
        }
    }

    /// Choose the swizzle family whose letters are currently most common,
    /// with ties preferring `xyzw` over `stpq` over `rgba`.
    fn select_swizzle(&self) -> SwizzleFamily {
        let counted = self.count();
        let score = |letters: &str| -> usize {
            letters
                .chars()
                .map(|ch| counted.get(&ch).copied().unwrap_or(0))
                .sum()
        };
        let xyzw = score("xyzw");
        let rgba = score("rgba");
        let stpq = score("stpq");
        let (family, selected, against) = if xyzw >= rgba && xyzw >= stpq {
            (SwizzleFamily::Xyzw, xyzw, format!("rgba: {}, stpq: {}", rgba, stpq))
        } else if stpq >= xyzw && stpq >= rgba {
            (SwizzleFamily::Stpq, stpq, format!("rgba: {}, xyzw: {}", rgba, xyzw))
        } else {
            (SwizzleFamily::Rgba, rgba, format!("stpq: {}, xyzw: {}", stpq, xyzw))
        };
        self.log().note(
            Log::Verbose(()),
            &format!(
                "Selected GLSL swizzle: {} ({} vs. {})",
                family.letters(),
                selected,
                against
            ),
        );
        family
    }

    /// Crunch the source code to smaller state.
    pub fn crunch(&mut self, options: &CrunchOptions) {
        let mut inlines = 0i64;
        let mut simplifys = 0i64;
        let mut renames = 0i64;
        let mut combines = 0i64;
        if options.mode != Mode::None {
            for source in &self.sources {
                expand_recursive(source);
            }
            // Perform inlining passes.
            let merged = loop {
                let allow = options.max_inlines < 0 || inlines < options.max_inlines;
                match self.inline_pass(allow) {
                    // The last pass returns the merged identifier groups.
                    Some(merged) => break merged,
                    // Inlining was done, another round.
                    None => inlines += 1,
                }
            };
            // Perform simplification passes.
            for source in &self.sources {
                if options.max_simplifys >= 0 && simplifys >= options.max_simplifys {
                    break;
                }
                let budget = if options.max_simplifys < 0 {
                    -1
                } else {
                    options.max_simplifys - simplifys
                };
                simplifys += simplify_pass(source, budget) as i64;
            }
            // After all names have been collected, the best swizzle is known.
            let swizzle = self.select_swizzle();
            for source in &self.sources {
                select_swizzle_recursive(source, swizzle);
            }
            let connections: Vec<String> = merged
                .iter()
                .filter(|group| group.blocks.len() > 1)
                .map(|group| format!("{}", group.blocks[0].borrow()))
                .collect();
            if !connections.is_empty() {
                self.log().note(
                    Log::Default(()),
                    &format!("GLSL inout connections found: {}", connections.join(", ")),
                );
            }
            // Run rename passes until done.
            for group in &merged {
                if options.max_renames >= 0 && renames >= options.max_renames {
                    break;
                }
                self.rename_pass(&group.blocks, &group.names);
                renames += 1;
            }
            // Run member rename passes until done.
            for group in &merged {
                let anchor = group.blocks[0].clone();
                if !matches!(anchor.borrow().kind(), BlockKind::InoutStruct { .. }) {
                    continue;
                }
                let budget = if options.max_renames < 0 {
                    -1
                } else {
                    options.max_renames - renames
                };
                renames += self.rename_members(&anchor, budget);
                // Also rename the block type.
                if options.max_renames < 0 || renames < options.max_renames {
                    self.rename_block(&group.blocks);
                    renames += 1;
                }
            }
            // Perform recombine passes.
            for source in &self.sources {
                combines += collapse_recursive(source) as i64;
            }
        }
        let mut operations = Vec::new();
        if inlines > 0 {
            operations.push(format!("{} inlines", inlines));
        }
        if simplifys > 0 {
            operations.push(format!("{} simplifys", simplifys));
        }
        if renames > 0 {
            operations.push(format!("{} renames", renames));
        }
        if combines > 0 {
            operations.push(format!("{} combines", combines));
        }
        if !operations.is_empty() {
            self.log().note(
                Log::Default(()),
                &format!("GLSL processing done: {}", operations.join(", ")),
            );
        }
    }
}

impl Display for Glsl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self
            .sources
            .iter()
            .map(|source| format!("{}", source.borrow()))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
