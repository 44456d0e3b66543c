//! Per-repository reconciliation
//!
//! Brings one working copy into the desired state: present, on the target
//! branch, with the requested remote change and optional commit applied.

mod options;
mod outcome;
mod reconciler;
mod request;

pub use options::RunOptions;
pub use outcome::{
    CheckoutOutcome, CommitOutcome, ReconciliationOutcome, RemoteOpOutcome, SyncOutcome,
};
pub use reconciler::RepositoryReconciler;
pub use request::{RemoteIntent, RemoteOperation, RemoteOperationKind, RemoteOperationRequest};
