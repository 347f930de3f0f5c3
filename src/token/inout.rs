use super::Direction;

impl Direction {
    pub fn format(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Inout => "inout",
        }
    }

    /// Tell if two directions may describe the same cross-stage binding:
    /// equal directions, a vertex-out/fragment-in pair, or either side being
    /// bidirectional (which the legacy `varying` normalizes to).
    pub fn is_compatible_with(&self, other: &Direction) -> bool {
        self == other || *self == Direction::Inout || *other == Direction::Inout || {
            matches!(
                (self, other),
                (Direction::In, Direction::Out) | (Direction::Out, Direction::In)
            )
        }
    }
}

/// Try to interpret an inout qualifier. The legacy aliases normalize:
/// `attribute` is a vertex input, `varying` links either side.
pub fn interpret_inout(source: &str) -> Option<Direction> {
    match source {
        "in" => Some(Direction::In),
        "out" => Some(Direction::Out),
        "inout" => Some(Direction::Inout),
        "attribute" => Some(Direction::In),
        "varying" => Some(Direction::Inout),
        _ => None,
    }
}
