use crate::utils::error::{CheckError, Result};

/// Width established by the first record. Never changes once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpectedWidth(Option<usize>);

impl ExpectedWidth {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<usize> {
        self.0
    }

    /// Records the width of record `line`, establishing it on the first call.
    pub fn observe(&mut self, line: u64, got: usize) -> Result<()> {
        match self.0 {
            None => {
                self.0 = Some(got);
                Ok(())
            }
            Some(expected) if expected == got => Ok(()),
            Some(expected) => Err(CheckError::WidthMismatch {
                line,
                expected,
                got,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub records: u64,
    /// `None` when the input held no records.
    pub width: Option<usize>,
}
