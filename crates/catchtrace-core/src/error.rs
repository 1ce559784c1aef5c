use thiserror::Error;

use crate::role::Role;

/// Configuration errors surfaced before any generation begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The path must start at a vessel.
    #[error("path must start at a vessel, got '{0}'")]
    NotVessel(Role),
    /// The path string is empty.
    #[error("path is empty")]
    EmptyPath,
    /// A digit in the path string is not a known role code.
    #[error("invalid role code '{code}' at position {position}")]
    InvalidRoleCode { code: char, position: usize },
    /// A control string digit is not numeric.
    #[error("invalid {control} digit '{code}' at position {position}")]
    InvalidControlDigit {
        control: &'static str,
        code: char,
        position: usize,
    },
    /// A control string does not match the path length.
    #[error("{control} has length {got}, path has length {expected}")]
    LengthMismatch {
        control: &'static str,
        got: usize,
        expected: usize,
    },
    /// The configured fan-out at a logistics position does not match the
    /// number of lots its predecessor actually produces.
    #[error(
        "fan-out mismatch at position {position}: configured for {configured} lots, \
         predecessor produces {produced}"
    )]
    FanOutMismatch {
        position: usize,
        configured: usize,
        produced: usize,
    },
    /// Auctions sell a landed lot; one must directly follow a vessel.
    #[error("auction at position {position} does not follow a vessel")]
    AuctionNotAfterVessel { position: usize },
    /// A role needs a downstream participant that the path does not provide.
    #[error("role '{role}' at position {position} has no downstream participant")]
    MissingDownstream { role: Role, position: usize },
    /// Retailers are terminal; nothing may follow one.
    #[error("retailer at position {position} is not the final position")]
    RetailerNotTerminal { position: usize },
    /// Vessels originate paths; one cannot appear mid-path.
    #[error("vessel at position {position} is not the origin")]
    VesselNotOrigin { position: usize },
}

/// Convenience alias for results returned by catchtrace crates.
pub type Result<T> = std::result::Result<T, ConfigError>;
