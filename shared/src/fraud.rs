use serde::Serialize;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::models::{parse_timestamp, Vote, VoteRequest};

/// Two votes from the same location closer together than this are treated
/// as fraudulent. The boundary is exclusive: exactly 300 seconds apart is
/// accepted.
pub const LOCATION_WINDOW_SECONDS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum FraudReason {
    #[error("Fraud detected: Duplicate voter ID!")]
    DuplicateVoterId,
    #[error("Fraud detected: Same biometric data used for multiple voters!")]
    DuplicateBiometric,
    #[error("Fraud detected: Too many votes from the same location in a short time!")]
    LocationBurst,
}

/// A submission whose timestamp has been parsed, ready for the fraud check
/// and the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateVote {
    pub voter_id: String,
    pub candidate: String,
    pub location: String,
    pub timestamp: OffsetDateTime,
    pub biometric_hash: String,
}

impl CandidateVote {
    pub fn from_request(request: &VoteRequest) -> Result<Self, time::error::Parse> {
        Ok(Self {
            voter_id: request.voter_id.clone(),
            candidate: request.candidate.clone(),
            location: request.location.clone(),
            timestamp: parse_timestamp(&request.timestamp)?,
            biometric_hash: request.biometric_hash.clone(),
        })
    }
}

/// Linear scan of every stored vote. For each stored vote the rules are
/// evaluated in precedence order and the first match wins, so when several
/// stored votes would each trigger a different rule, scan order decides
/// which reason is reported.
pub fn detect_fraud(candidate: &CandidateVote, existing: &[Vote]) -> Result<(), FraudReason> {
    let window = Duration::seconds(LOCATION_WINDOW_SECONDS);

    for vote in existing {
        if vote.voter_id == candidate.voter_id {
            return Err(FraudReason::DuplicateVoterId);
        }

        if vote.biometric_hash == candidate.biometric_hash {
            return Err(FraudReason::DuplicateBiometric);
        }

        if vote.location == candidate.location
            && (candidate.timestamp - vote.timestamp).abs() < window
        {
            return Err(FraudReason::LocationBurst);
        }
    }

    Ok(())
}
