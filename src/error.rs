use thiserror::Error;

/// Errors surfaced by the persistent engines in this crate.
///
/// Every query-shaped failure (missing key, version predating a node,
/// absent predecessor/successor) is modelled as `None`, not an `Error` —
/// per the error-handling contract in DESIGN.md, only broken internal
/// invariants reach this type, and they do so by panicking with it (see
/// [`invariant`]) rather than by propagating a `Result` a caller could
/// mistake for a recoverable condition.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Abort on a broken internal invariant (§7: "unrecoverable, never silent
/// corruption"). Used in place of a bare `.expect(...)` wherever the
/// panic message doubles as the contract being violated, e.g. a
/// two-child node whose in-order successor search came up empty.
pub fn invariant(msg: impl Into<String>) -> ! {
    panic!("{}", Error::Invariant(msg.into()));
}
