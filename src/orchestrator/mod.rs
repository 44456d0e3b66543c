//! Workspace orchestration
//!
//! Runs the access check once, fans every catalog entry out to a
//! [`RepositoryReconciler`](crate::reconcile::RepositoryReconciler) behind a
//! bounded [`AdmissionGate`], and gathers the outcomes into a
//! [`RunSummary`].

mod gate;
mod summary;
mod workspace;

pub use gate::{AdmissionGate, AdmissionPermit};
pub use summary::RunSummary;
pub use workspace::WorkspaceOrchestrator;
