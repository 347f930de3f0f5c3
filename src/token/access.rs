use super::{interpret_name, AccessData, GlslAccess, GlslName, SwizzleFamily};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

impl SwizzleFamily {
    pub fn letters(&self) -> &'static str {
        match self {
            SwizzleFamily::Xyzw => "xyzw",
            SwizzleFamily::Rgba => "rgba",
            SwizzleFamily::Stpq => "stpq",
        }
    }

    /// Classify a member spelling: a swizzle iff every character comes from
    /// the same family and the selector fits in four components.
    fn classify(member: &str) -> Option<SwizzleFamily> {
        if member.is_empty() || member.len() > 4 {
            return None;
        }
        for family in [SwizzleFamily::Xyzw, SwizzleFamily::Rgba, SwizzleFamily::Stpq] {
            if member.chars().all(|c| family.letters().contains(c)) {
                return Some(family);
            }
        }
        None
    }
}

impl GlslAccess {
    pub fn new(name: GlslName) -> Self {
        let swizzle = SwizzleFamily::classify(&name.name());
        Self {
            data: Rc::new(RefCell::new(AccessData { name, swizzle })),
        }
    }

    /// The member name after the period.
    pub fn name(&self) -> GlslName {
        self.data.borrow().name.clone()
    }

    pub fn swizzle(&self) -> Option<SwizzleFamily> {
        self.data.borrow().swizzle
    }

    /// Demote a swizzle candidate to a plain member access; done when a
    /// struct member list claims the spelling.
    pub fn disable_swizzle(&self) {
        self.data.borrow_mut().swizzle = None;
    }

    /// Rewrite a live swizzle into the selected family, locking the member
    /// spelling so later rename passes leave it alone.
    pub fn select_swizzle(&self, family: SwizzleFamily) {
        let current = match self.data.borrow().swizzle {
            Some(current) => current,
            None => return,
        };
        let name = self.name();
        let remapped: String = name
            .name()
            .chars()
            .map(|c| {
                let index = current.letters().find(c).unwrap();
                family.letters().as_bytes()[index] as char
            })
            .collect();
        name.lock(&remapped);
        self.data.borrow_mut().swizzle = Some(family);
    }

    pub fn format(&self) -> String {
        format!(".{}", self.name().format())
    }
}

impl Debug for GlslAccess {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GlslAccess('.{}')", self.name().name())
    }
}

/// Try to interpret the identifier following a period as a member access.
pub fn interpret_access(source: &str) -> Option<GlslAccess> {
    interpret_name(source).map(GlslAccess::new)
}
