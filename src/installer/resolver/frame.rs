//! Per-call expansion stack used for cycle detection.

use crate::installer::error::{Error, Result};

/// References currently being expanded, outermost first.
///
/// Lives for one top-level resolve call and is dropped on return.
#[derive(Debug, Default)]
pub(crate) struct ResolutionFrame {
    stack: Vec<String>,
}

impl ResolutionFrame {
    /// Pushes `reference`, failing if it is already being expanded.
    pub(crate) fn enter(&mut self, reference: &str) -> Result<()> {
        if let Some(first) = self.stack.iter().position(|r| r == reference) {
            let mut chain = self.stack[first..].to_vec();
            chain.push(reference.to_string());
            return Err(Error::CyclicReference {
                reference: reference.to_string(),
                chain,
            });
        }
        self.stack.push(reference.to_string());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}
