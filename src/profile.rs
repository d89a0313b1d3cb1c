use bom_scanner_common::KeyboardProfile;
use clap::ValueEnum;

/// Keyboard profile as given on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProfileArg {
    /// Shifted number row (full scanner)
    ShiftRow,
    /// Windows scanner station table
    Legacy,
}

impl ProfileArg {
    pub fn profile(&self) -> KeyboardProfile {
        match self {
            ProfileArg::ShiftRow => KeyboardProfile::ShiftRow,
            ProfileArg::Legacy => KeyboardProfile::Legacy,
        }
    }
}
