use serde::{Deserialize, Serialize};

use crate::address::AccountAddress;
use crate::view::json_u64;

/// Election summary as shown to the user.
///
/// Missing start/end timestamps are flattened to `0`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionInfo {
    pub election_name: String,
    pub is_active: bool,
    pub start_time: u64,
    pub end_time: u64,
    pub total_votes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDetails {
    #[serde(with = "json_u64")]
    pub candidate_id: u64,
    pub name: String,
    pub candidate_address: AccountAddress,
    pub dao: String,
    pub image: String,
    #[serde(with = "json_u64")]
    pub votes: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionWinner {
    /// `0` when no winner has been decided.
    pub winner_id: u64,
}
