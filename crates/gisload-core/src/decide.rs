use dialoguer::Confirm;

/// A yes/no answer provider.
///
/// Workflows that need an operator's consent (keeping a primary key,
/// truncating a populated table) ask through this trait, so the same
/// code runs against a console prompt, a scripted answer, or a closure.
pub trait Decide {
    fn decide(&mut self) -> bool;
}

impl<F> Decide for F
where
    F: FnMut() -> bool,
{
    fn decide(&mut self) -> bool {
        self()
    }
}

/// Scripted answer, given every time it is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Always(pub bool);

impl Decide for Always {
    fn decide(&mut self) -> bool {
        self.0
    }
}

/// Interactive console confirmation.
#[derive(Debug, Clone)]
pub struct Prompt {
    question: String,
}

impl Prompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
    /// Question asked before keeping a primary-key column.
    pub fn primary_key() -> Self {
        Self::new("Would you like to continue with using a primary key?")
    }
    /// Question asked before emptying a populated table.
    pub fn truncate() -> Self {
        Self::new("Would you like to truncate the table?")
    }
}

impl Decide for Prompt {
    fn decide(&mut self) -> bool {
        Confirm::new()
            .with_prompt(self.question.as_str())
            .report(false)
            .interact()
            .unwrap_or_else(|e| {
                log::error!("no answer read: {}", e);
                false
            })
    }
}
