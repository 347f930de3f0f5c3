use super::{GlslParen, ParenShape};

impl GlslParen {
    pub fn new(shape: ParenShape, open: bool) -> Self {
        Self { shape, open }
    }

    pub fn shape(&self) -> ParenShape {
        self.shape
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn glyph(&self) -> char {
        match (self.shape, self.open) {
            (ParenShape::Round, true) => '(',
            (ParenShape::Round, false) => ')',
            (ParenShape::Square, true) => '[',
            (ParenShape::Square, false) => ']',
            (ParenShape::Curly, true) => '{',
            (ParenShape::Curly, false) => '}',
        }
    }

    pub fn format(&self) -> String {
        self.glyph().to_string()
    }

    /// Update the nesting count when `other` is a paren of the same shape;
    /// the basis of scope extraction.
    pub fn update(&self, other: &GlslParen, count: usize) -> usize {
        if other.shape == self.shape {
            if other.open {
                count + 1
            } else {
                count - 1
            }
        } else {
            count
        }
    }
}

/// Try to interpret one of the six bracket characters.
pub fn interpret_paren(source: &str) -> Option<GlslParen> {
    match source {
        "(" => Some(GlslParen::new(ParenShape::Round, true)),
        ")" => Some(GlslParen::new(ParenShape::Round, false)),
        "[" => Some(GlslParen::new(ParenShape::Square, true)),
        "]" => Some(GlslParen::new(ParenShape::Square, false)),
        "{" => Some(GlslParen::new(ParenShape::Curly, true)),
        "}" => Some(GlslParen::new(ParenShape::Curly, false)),
        _ => None,
    }
}
