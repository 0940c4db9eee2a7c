pub mod fraud;
pub mod models;

pub use fraud::{detect_fraud, CandidateVote, FraudReason, LOCATION_WINDOW_SECONDS};
pub use models::*;

#[cfg(test)]
mod tests;
