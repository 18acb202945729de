// Batch pipelines that read from and write back to the submission store.

pub mod moderate;

pub use moderate::{ItemOutcome, ItemResult, ModerationSettings, Moderator, RunSummary};
