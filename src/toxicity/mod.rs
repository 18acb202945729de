// Toxicity scoring — trait-based abstraction over the external classifier.
//
// The ToxicityScorer trait defines the interface. PerspectiveScorer
// implements it against Google's Perspective API, and ToxicityGate turns a
// scorer into a fail-open accept/reject decision.

pub mod gate;
pub mod perspective;
pub mod traits;
