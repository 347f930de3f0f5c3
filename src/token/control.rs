use super::{ControlWord, GlslControl};

impl ControlWord {
    fn interpret(source: &str) -> Option<ControlWord> {
        match source {
            "if" => Some(ControlWord::If),
            "else" => Some(ControlWord::Else),
            "while" => Some(ControlWord::While),
            "for" => Some(ControlWord::For),
            "return" => Some(ControlWord::Return),
            "discard" => Some(ControlWord::Discard),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ControlWord::If => "if",
            ControlWord::Else => "else",
            ControlWord::While => "while",
            ControlWord::For => "for",
            ControlWord::Return => "return",
            ControlWord::Discard => "discard",
        }
    }
}

impl GlslControl {
    pub fn word(&self) -> ControlWord {
        self.word
    }

    pub fn extension(&self) -> Option<ControlWord> {
        self.extension
    }

    /// Tell if the construct owns a parenthesized statement.
    pub fn has_condition(&self) -> bool {
        matches!(
            self.word,
            ControlWord::If | ControlWord::While | ControlWord::For
        ) || self.extension == Some(ControlWord::If)
    }

    pub fn format(&self) -> String {
        match self.extension {
            Some(extension) => format!("{} {}", self.word.as_str(), extension.as_str()),
            None => self.word.as_str().to_string(),
        }
    }
}

/// Try to interpret a single control keyword.
pub fn interpret_control(source: &str) -> Option<GlslControl> {
    ControlWord::interpret(source).map(|word| GlslControl {
        word,
        extension: None,
    })
}

/// Try to interpret a two-keyword control form (`else if`).
pub fn interpret_control_pair(first: &str, second: &str) -> Option<GlslControl> {
    if first == "else" && second == "if" {
        Some(GlslControl {
            word: ControlWord::Else,
            extension: Some(ControlWord::If),
        })
    } else {
        None
    }
}
