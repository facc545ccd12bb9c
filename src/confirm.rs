//! Typed-assertion confirmation used before destructive actions.

/// The operator must type `assertion` exactly before the primary action is enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub assertion: String,
    pub typed: String,
}

impl Confirmation {
    pub fn new(assertion: impl Into<String>) -> Self {
        Self {
            assertion: assertion.into(),
            typed: String::new(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.typed.push(c);
    }

    pub fn backspace(&mut self) {
        self.typed.pop();
    }

    pub fn is_confirmable(&self) -> bool {
        self.typed == self.assertion
    }
}
