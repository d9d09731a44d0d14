//! Error taxonomy
//!
//! Nothing here is fatal to the host: every failure leaves the engine in its
//! previous valid state. State errors are expected (double clicks) and are
//! dropped silently by the engine after a debug log.

use thiserror::Error;

use crate::assets::AssetKind;

/// Bad user input (entries, colors, entry files)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no valid entries found")]
    NoValidEntries,
    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),
    #[error("entry file is too large ({size} bytes, maximum is {limit} bytes)")]
    EntryFileTooLarge { size: u64, limit: u64 },
}

/// Image upload or load failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("{kind} image is too large ({size} bytes, maximum is {limit} bytes)")]
    TooLarge { kind: AssetKind, size: u64, limit: u64 },
    #[error("{kind} upload must be an image, got {mime:?}")]
    UnsupportedType { kind: AssetKind, mime: String },
    #[error("failed to load image {src}: {reason}")]
    LoadFailed { src: String, reason: String },
}

/// Operation requested in a state that does not allow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("the wheel is already spinning")]
    AlreadySpinning,
    #[error("the wheel is resetting")]
    Resetting,
    #[error("there are no entries left to spin")]
    NoActiveEntries,
    #[error("all winners have already been drawn")]
    SequenceComplete,
}

/// The wheel view was entered without a usable entries + customization pair
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationMissingError {
    #[error("missing wheel configuration")]
    Absent,
    #[error("malformed wheel configuration: {0}")]
    Malformed(String),
    #[error("wheel configuration has no entries")]
    NoEntries,
}

/// Any engine error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    ConfigurationMissing(#[from] ConfigurationMissingError),
}
