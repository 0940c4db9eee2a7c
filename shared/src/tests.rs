#[cfg(test)]
mod tests {
    use crate::fraud::{detect_fraud, CandidateVote, FraudReason};
    use crate::models::{format_timestamp, parse_timestamp, Vote, VoteRequest};

    fn candidate(voter_id: &str, location: &str, timestamp: &str, hash: &str) -> CandidateVote {
        CandidateVote {
            voter_id: voter_id.into(),
            candidate: "John Doe".into(),
            location: location.into(),
            timestamp: parse_timestamp(timestamp).unwrap(),
            biometric_hash: hash.into(),
        }
    }

    fn stored(id: i64, voter_id: &str, location: &str, timestamp: &str, hash: &str) -> Vote {
        Vote {
            id,
            voter_id: voter_id.into(),
            candidate: "John Doe".into(),
            location: location.into(),
            timestamp: parse_timestamp(timestamp).unwrap(),
            biometric_hash: hash.into(),
        }
    }

    #[test]
    fn test_timestamp_round_trip() {
        let parsed = parse_timestamp("2025-02-25T12:00:00Z").unwrap();
        assert_eq!(format_timestamp(parsed).unwrap(), "2025-02-25T12:00:00Z");
    }

    #[test]
    fn test_timestamp_rejects_variants() {
        assert!(parse_timestamp("2025-02-25 12:00:00").is_err());
        assert!(parse_timestamp("2025-02-25T12:00:00+00:00").is_err());
        assert!(parse_timestamp("2025-02-25T12:00:00.123Z").is_err());
        assert!(parse_timestamp("not-a-timestamp").is_err());
    }

    #[test]
    fn test_empty_store_accepts() {
        let vote = candidate("12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz");
        assert!(detect_fraud(&vote, &[]).is_ok());
    }

    #[test]
    fn test_distinct_votes_accepted() {
        let existing = vec![
            stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz"),
            stored(2, "23456", "Chicago", "2025-02-25T12:01:00Z", "def456uvw"),
        ];
        let vote = candidate("34567", "Boston", "2025-02-25T12:02:00Z", "ghi789rst");
        assert!(detect_fraud(&vote, &existing).is_ok());
    }

    #[test]
    fn test_duplicate_voter_id() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz")];
        let vote = candidate("12345", "Boston", "2025-02-26T12:00:00Z", "other");
        assert_eq!(
            detect_fraud(&vote, &existing),
            Err(FraudReason::DuplicateVoterId)
        );
    }

    #[test]
    fn test_duplicate_biometric_hash() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz")];
        let vote = candidate("99999", "Boston", "2025-02-26T12:00:00Z", "abc123xyz");
        assert_eq!(
            detect_fraud(&vote, &existing),
            Err(FraudReason::DuplicateBiometric)
        );
    }

    #[test]
    fn test_voter_id_wins_over_biometric() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz")];
        let vote = candidate("12345", "New York", "2025-02-25T12:00:30Z", "abc123xyz");
        assert_eq!(
            detect_fraud(&vote, &existing),
            Err(FraudReason::DuplicateVoterId)
        );
    }

    #[test]
    fn test_location_window_exclusive_boundary() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz")];

        let within = candidate("22222", "New York", "2025-02-25T12:04:59Z", "hash2");
        assert_eq!(
            detect_fraud(&within, &existing),
            Err(FraudReason::LocationBurst)
        );

        let at_boundary = candidate("22222", "New York", "2025-02-25T12:05:00Z", "hash2");
        assert!(detect_fraud(&at_boundary, &existing).is_ok());
    }

    #[test]
    fn test_location_window_is_symmetric() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:05:00Z", "abc123xyz")];
        let earlier = candidate("22222", "New York", "2025-02-25T12:01:00Z", "hash2");
        assert_eq!(
            detect_fraud(&earlier, &existing),
            Err(FraudReason::LocationBurst)
        );
    }

    #[test]
    fn test_same_window_different_location_accepted() {
        let existing = vec![stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz")];
        let vote = candidate("22222", "Boston", "2025-02-25T12:00:01Z", "hash2");
        assert!(detect_fraud(&vote, &existing).is_ok());
    }

    #[test]
    fn test_scan_order_decides_reason() {
        let existing = vec![
            stored(1, "11111", "New York", "2025-02-25T12:00:00Z", "hash1"),
            stored(2, "22222", "Boston", "2025-02-25T12:00:00Z", "hash2"),
        ];
        // Triggers the location rule against vote 1 and the voter-id rule
        // against vote 2; the first stored vote is scanned first.
        let vote = candidate("22222", "New York", "2025-02-25T12:00:10Z", "hash3");
        assert_eq!(
            detect_fraud(&vote, &existing),
            Err(FraudReason::LocationBurst)
        );
    }

    #[test]
    fn test_candidate_from_request() {
        let request = VoteRequest {
            voter_id: "12345".into(),
            candidate: "John Doe".into(),
            location: "New York".into(),
            timestamp: "2025-02-25T12:00:00Z".into(),
            biometric_hash: "abc123xyz".into(),
        };
        let parsed = CandidateVote::from_request(&request).unwrap();
        assert_eq!(parsed.timestamp, parse_timestamp("2025-02-25T12:00:00Z").unwrap());

        let bad = VoteRequest { timestamp: "yesterday".into(), ..request };
        assert!(CandidateVote::from_request(&bad).is_err());
    }

    #[test]
    fn test_vote_serializes_wire_format() {
        let vote = stored(1, "12345", "New York", "2025-02-25T12:00:00Z", "abc123xyz");
        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json["timestamp"], "2025-02-25T12:00:00Z");
        assert_eq!(json["voter_id"], "12345");
        assert_eq!(json["biometric_hash"], "abc123xyz");
    }
}
