use super::GlslOperator;

const SINGLES: &str = "+-*/=<>!&|^%?,;:";

/// Two-character operators a leading operator may absorb its follower into.
const COMBINED: [&str; 15] = [
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "<<", ">>",
];

impl GlslOperator {
    pub fn format(&self) -> String {
        self.op.clone()
    }

    /// Absorb a following operator when the pair forms a compound operator.
    /// Absorption succeeds at most once: a combined operator never grows.
    pub fn incorporate(&mut self, other: &GlslOperator) -> bool {
        if self.op.len() != 1 {
            return false;
        }
        let combined = format!("{}{}", self.op, other.op);
        if COMBINED.contains(&combined.as_str()) {
            self.op = combined;
            true
        } else {
            false
        }
    }
}

/// Try to interpret a single operator character.
pub fn interpret_operator(source: &str) -> Option<GlslOperator> {
    let mut chars = source.chars();
    let first = chars.next()?;
    if chars.next().is_none() && SINGLES.contains(first) {
        Some(GlslOperator {
            op: source.to_string(),
        })
    } else {
        None
    }
}
