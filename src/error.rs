use std::io;
use thiserror::Error;

/// Failures the tree animation can report.
///
/// Everything except I/O and settings parsing is a precondition violation:
/// the tick entry point seeds the tree before growth runs, so these only
/// surface when a caller hands in a malformed state or palette.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("palette must contain at least one colour")]
    EmptyPalette,
    #[error("invalid colour `{0}`: expected 6 or 8 hex digits without '#'")]
    InvalidColour(String),
    #[error("cannot sprout new branches from a tree with no committed branches")]
    NoBranches,
    #[error("cannot place a decoration without a growing generation")]
    NoGrowingBranches,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;
