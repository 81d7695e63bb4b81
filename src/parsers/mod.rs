//! Domain parsers: pure functions from source document content to typed
//! records.
//!
//! Row-level problems (short rows, blank cells, unparseable values) are
//! skipped. Only a container that cannot be opened is an error, and the
//! multi-file parsers drop such files and keep going.

pub mod agenda;
pub mod anchors;
pub mod budget;
pub mod coaches_fund;
pub mod historical;
pub mod meetings;
pub mod roster;
pub mod transactions;
pub mod uniforms;
pub mod volunteers;
