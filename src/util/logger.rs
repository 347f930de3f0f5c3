use std::fmt::{Display, Formatter};

use super::Log;

impl<T: Display> Display for Log<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Log::None => Ok(()),
            Log::Default(s) | Log::Success(s) | Log::Result(s) | Log::Verbose(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl<T> Log<T> {
    /// Function which return order of the log.
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Default(_) => 1,
            Log::Success(_) => 2,
            Log::Result(_) => 3,
            Log::Verbose(_) => 4,
        }
    }
}

impl<T: Display> Log<T> {
    /// Print a progress note when the assigned log level reaches the threshold.
    pub fn note(&self, _threshold: Log<()>, _message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= _threshold.order() {
            println!("[{}] {}", self, _message);
        }
    }

    /// Print a warning whenever any log label has been assigned.
    pub fn warn(&self, _message: &str) {
        #[cfg(debug_assertions)]
        if self.order() >= Log::Default(()).order() {
            println!("[{}] WARNING: {}", self, _message);
        }
    }
}
