//! TEAL sources shipped with the binary.

/// Counter application; also answers `add(uint64,uint64)uint64`.
pub const APPROVAL_SOURCE: &str = include_str!("../../programs/approval.teal");

pub const CLEAR_SOURCE: &str = include_str!("../../programs/clear.teal");

/// Payment escrow limited to small, non-closing payouts.
pub const ESCROW_SOURCE: &str = include_str!("../../programs/escrow.teal");

/// Method answered by [`APPROVAL_SOURCE`].
pub const ADD_METHOD: &str = "add(uint64,uint64)uint64";
