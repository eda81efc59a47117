//! Operation records for TAOTE control operators.
//!
//! The engine remembers the last control operator it ran, with its exact
//! configuration, so a driver can replay it with `retry`. Dispatch is a plain
//! match over [`Operation`].

mod operations;

pub use operations::{Operation, OperationId, OperationKind, OperationRecord};
