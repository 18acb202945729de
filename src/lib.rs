// Askguard: moderation for submitted Q&A questions.
//
// This is the library root. Each module corresponds to a stage of the
// moderation pipeline or one of its collaborators.

pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod toxicity;

pub use filter::local_filter;
