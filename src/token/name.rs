use super::{GlslAccess, GlslName, GlslType, NameData};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Words that must be preserved verbatim in the output.
const LOCKED: [&str; 18] = [
    "cross",
    "discard",
    "dot",
    "EmitVertex",
    "EndPrimitive",
    "gl_FragCoord",
    "gl_FragColor",
    "gl_PerVertex",
    "gl_Position",
    "layout",
    "length",
    "location",
    "main",
    "max_vertices",
    "mix",
    "normalize",
    "return",
    "uniform",
];

/// Geometry primitive words, locked like the reserved words above.
const PRIMITIVES: [&str; 5] = [
    "lines",
    "lines_adjacency",
    "points",
    "triangles",
    "triangle_strip",
];

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());
static INLINE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^i_").unwrap());

fn is_locked_word(source: &str) -> bool {
    LOCKED.contains(&source) || PRIMITIVES.contains(&source)
}

impl GlslName {
    pub fn new(source: &str) -> Self {
        // Reserved words are considered locked in all cases.
        let rename = if is_locked_word(source) {
            Some(source.to_string())
        } else {
            None
        };
        Self {
            data: Rc::new(RefCell::new(NameData {
                name: source.to_string(),
                rename,
                typeid: None,
                access: None,
            })),
        }
    }

    /// The original, non-renamed spelling.
    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    /// Formatted output: the locked rename when set, the original otherwise.
    pub fn format(&self) -> String {
        let data = self.data.borrow();
        match &data.rename {
            Some(rename) => rename.clone(),
            None => data.name.clone(),
        }
    }

    /// Lock the name to the given spelling. The first lock wins, which keeps
    /// reserved words immortal when they ride along in a merge group.
    pub fn lock(&self, target: &str) {
        let mut data = self.data.borrow_mut();
        if data.rename.is_none() {
            data.rename = Some(target.to_string());
        }
    }

    /// Tell if this is using a locked spelling.
    pub fn is_locked(&self) -> bool {
        self.data.borrow().rename.is_some()
    }

    /// Tell if the spelling marks the binding as eligible for inlining.
    pub fn is_inlineable(&self) -> bool {
        INLINE_PATTERN.is_match(&self.data.borrow().name)
    }

    /// Physical identity; the contract for use tracking and merge dedup.
    pub fn ptr_eq(&self, other: &GlslName) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn typeid(&self) -> Option<GlslType> {
        self.data.borrow().typeid
    }

    pub fn set_type(&self, typeid: GlslType) {
        self.data.borrow_mut().typeid = Some(typeid);
    }

    pub fn access(&self) -> Option<GlslAccess> {
        self.data.borrow().access.clone()
    }

    pub fn set_access(&self, access: GlslAccess) {
        self.data.borrow_mut().access = Some(access);
    }
}

impl Debug for GlslName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GlslName('{}')", self.data.borrow().name)
    }
}

/// Try to interpret a name identifier. Names are interpreted last; all
/// reserved lexemes other than names should have been interpreted before.
pub fn interpret_name(source: &str) -> Option<GlslName> {
    if NAME_PATTERN.is_match(source) {
        Some(GlslName::new(source))
    } else {
        None
    }
}
