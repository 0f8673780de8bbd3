//! Typed decoding of view-call results.
//!
//! The node returns each view result as a JSON array with one entry per
//! returned value. Every contract view function has a dedicated output type
//! implementing [`ViewOutput`]; a result whose shape does not match is
//! rejected with [`Error::InvalidShape`].

use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::address::AccountAddress;
use crate::error::{Error, Result};
use crate::models::{CandidateDetails, ElectionInfo, ElectionWinner};
use crate::option::MoveOption;
use crate::u256::U256;

type ShapeResult<T> = std::result::Result<T, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewFunction {
    GetElectionInfo,
    GetWinner,
    GetAllCandidates,
    GetCandidateVotes,
    HasVoterVoted,
}

impl ViewFunction {
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetElectionInfo => "get_election_info",
            Self::GetWinner => "get_winner",
            Self::GetAllCandidates => "get_all_candidates",
            Self::GetCandidateVotes => "get_candidate_votes",
            Self::HasVoterVoted => "has_voter_voted",
        }
    }
}

impl std::fmt::Display for ViewFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "get_election_info" => Self::GetElectionInfo,
            "get_winner" => Self::GetWinner,
            "get_all_candidates" => Self::GetAllCandidates,
            "get_candidate_votes" => Self::GetCandidateVotes,
            "has_voter_voted" => Self::HasVoterVoted,
            _ => {
                return Err(Error::InvalidValue {
                    ty: "view function",
                    reason: format!("unknown function `{s}`"),
                });
            }
        })
    }
}

/// Decoded output of a single view function.
pub trait ViewOutput: Sized {
    const FUNCTION: ViewFunction;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self>;
}

/// Decodes the raw node result of `T::FUNCTION`.
pub fn decode_view<T: ViewOutput>(result: &Value) -> Result<T> {
    let invalid_shape = |reason: String| Error::InvalidShape {
        function: T::FUNCTION.name(),
        reason,
    };

    let Value::Array(values) = result else {
        return Err(invalid_shape(format!(
            "expected an array of return values, got {}",
            value_kind(result)
        )));
    };
    T::from_view_values(values).map_err(invalid_shape)
}

/// Any decoded view result, tagged by the function which produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "function", content = "result")]
pub enum ViewResult {
    #[serde(rename = "get_election_info")]
    ElectionInfo(ElectionInfoView),
    #[serde(rename = "get_winner")]
    Winner(Option<u64>),
    #[serde(rename = "get_all_candidates")]
    Candidates(Vec<CandidateDetails>),
    #[serde(rename = "get_candidate_votes")]
    CandidateVotes(u64),
    #[serde(rename = "has_voter_voted")]
    VoterVoted(bool),
}

impl ViewResult {
    pub fn decode(function: ViewFunction, result: &Value) -> Result<Self> {
        Ok(match function {
            ViewFunction::GetElectionInfo => Self::ElectionInfo(decode_view(result)?),
            ViewFunction::GetWinner => Self::Winner(decode_view::<WinnerView>(result)?.0),
            ViewFunction::GetAllCandidates => {
                Self::Candidates(decode_view::<CandidateList>(result)?.0)
            }
            ViewFunction::GetCandidateVotes => {
                Self::CandidateVotes(decode_view::<CandidateVotes>(result)?.0)
            }
            ViewFunction::HasVoterVoted => Self::VoterVoted(decode_view::<VoterVoted>(result)?.0),
        })
    }

    pub fn function(&self) -> ViewFunction {
        match self {
            Self::ElectionInfo(_) => ViewFunction::GetElectionInfo,
            Self::Winner(_) => ViewFunction::GetWinner,
            Self::Candidates(_) => ViewFunction::GetAllCandidates,
            Self::CandidateVotes(_) => ViewFunction::GetCandidateVotes,
            Self::VoterVoted(_) => ViewFunction::HasVoterVoted,
        }
    }
}

// === Outputs ===

/// `(string::String, bool, Option<u64>, Option<u64>, u64)`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionInfoView {
    pub election_name: String,
    pub is_active: bool,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub total_votes: u64,
}

impl ViewOutput for ElectionInfoView {
    const FUNCTION: ViewFunction = ViewFunction::GetElectionInfo;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        let (election_name, is_active, start_time, end_time, total_votes) =
            FromViewValues::from_view_values(values)?;
        Ok(Self {
            election_name,
            is_active,
            start_time,
            end_time,
            total_votes,
        })
    }
}

impl From<ElectionInfoView> for ElectionInfo {
    fn from(view: ElectionInfoView) -> Self {
        Self {
            election_name: view.election_name,
            is_active: view.is_active,
            start_time: view.start_time.unwrap_or_default(),
            end_time: view.end_time.unwrap_or_default(),
            total_votes: view.total_votes,
        }
    }
}

/// `Option<u64>`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WinnerView(pub Option<u64>);

impl ViewOutput for WinnerView {
    const FUNCTION: ViewFunction = ViewFunction::GetWinner;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        let (winner,) = FromViewValues::from_view_values(values)?;
        Ok(Self(winner))
    }
}

impl From<WinnerView> for ElectionWinner {
    fn from(view: WinnerView) -> Self {
        Self {
            winner_id: view.0.unwrap_or_default(),
        }
    }
}

/// `vector<Candidate>`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CandidateList(pub Vec<CandidateDetails>);

impl ViewOutput for CandidateList {
    const FUNCTION: ViewFunction = ViewFunction::GetAllCandidates;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        let (candidates,) = FromViewValues::from_view_values(values)?;
        Ok(Self(candidates))
    }
}

/// `u64`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CandidateVotes(pub u64);

impl ViewOutput for CandidateVotes {
    const FUNCTION: ViewFunction = ViewFunction::GetCandidateVotes;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        let (votes,) = FromViewValues::from_view_values(values)?;
        Ok(Self(votes))
    }
}

/// `bool`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VoterVoted(pub bool);

impl ViewOutput for VoterVoted {
    const FUNCTION: ViewFunction = ViewFunction::HasVoterVoted;

    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        let (voted,) = FromViewValues::from_view_values(values)?;
        Ok(Self(voted))
    }
}

// === Host value parsing ===

pub trait FromViewValue: Sized {
    fn from_view_value(value: &Value) -> ShapeResult<Self>;
}

pub trait FromViewValues: Sized {
    fn from_view_values(values: &[Value]) -> ShapeResult<Self>;
}

/// Sequential reader over returned values.
pub struct ViewTuple<'a> {
    values: std::slice::Iter<'a, Value>,
    index: usize,
}

impl<'a> ViewTuple<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self {
            values: values.iter(),
            index: 0,
        }
    }

    pub fn read_next<T: FromViewValue>(&mut self) -> ShapeResult<T> {
        let index = self.index;
        let value = self
            .values
            .next()
            .ok_or_else(|| format!("unexpected end of values at #{index}"))?;
        self.index += 1;
        T::from_view_value(value).map_err(|e| format!("value #{index}: {e}"))
    }
}

impl FromViewValue for u64 {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        match value {
            Value::String(s) => s
                .parse::<u64>()
                .map_err(|e| format!("invalid u64 string {s:?}: {e}")),
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| format!("invalid u64 number {n}")),
            other => Err(expected("u64", other)),
        }
    }
}

impl FromViewValue for U256 {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        match value {
            Value::String(s) => s.parse::<U256>().map_err(|e| e.to_string()),
            Value::Number(n) => n
                .as_u64()
                .map(U256::from)
                .ok_or_else(|| format!("invalid u256 number {n}")),
            other => Err(expected("u256", other)),
        }
    }
}

impl FromViewValue for bool {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        value.as_bool().ok_or_else(|| expected("bool", value))
    }
}

impl FromViewValue for String {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        value
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| expected("string", value))
    }
}

impl FromViewValue for AccountAddress {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        match value {
            Value::String(s) => s.parse().map_err(|e: Error| e.to_string()),
            other => Err(expected("address", other)),
        }
    }
}

impl FromViewValue for CandidateDetails {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        deserialize_record("candidate", value)
    }
}

impl<T: FromViewValue> FromViewValue for Vec<T> {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        let Value::Array(items) = value else {
            return Err(expected("array", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_view_value(item).map_err(|e| format!("item #{i}: {e}")))
            .collect()
    }
}

/// Reads the `{"vec": [..]}` option wrapper.
impl<T: FromViewValue> FromViewValue for Option<T> {
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        let Some(Value::Array(items)) = value.get("vec") else {
            return Err(expected("option", value));
        };
        match items.as_slice() {
            [] => Ok(None),
            [item] => T::from_view_value(item).map(Some),
            _ => Err(format!("option with {} elements", items.len())),
        }
    }
}

impl<T: FromViewValue> FromViewValue for MoveOption<T> {
    #[inline]
    fn from_view_value(value: &Value) -> ShapeResult<Self> {
        <Option<T>>::from_view_value(value).map(MoveOption::from)
    }
}

impl<T: FromViewValue> FromViewValues for Vec<T> {
    fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
        values.iter().map(T::from_view_value).collect()
    }
}

macro_rules! impl_for_tuples {
    ($($n:literal => ($($ty:ident),+$(,)?)),+$(,)?) => {
        $(impl<$($ty: FromViewValue),+> FromViewValues for ($($ty,)+) {
            fn from_view_values(values: &[Value]) -> ShapeResult<Self> {
                if values.len() != $n {
                    return Err(format!(
                        "expected {} return values, got {}",
                        $n,
                        values.len(),
                    ));
                }
                let mut tuple = ViewTuple::new(values);
                Ok(($(tuple.read_next::<$ty>()?,)+))
            }
        })*
    };
}

impl_for_tuples! {
    1 => (T0),
    2 => (T0, T1),
    3 => (T0, T1, T2),
    4 => (T0, T1, T2, T3),
    5 => (T0, T1, T2, T3, T4),
}

fn deserialize_record<T: DeserializeOwned>(name: &str, value: &Value) -> ShapeResult<T> {
    if !value.is_object() {
        return Err(expected(name, value));
    }
    T::deserialize(value).map_err(|e| format!("invalid {name}: {e}"))
}

fn expected(what: &str, value: &Value) -> String {
    format!("expected {what}, got {}", value_kind(value))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serde helper for `u64` values which the node renders as decimal strings.
///
/// Accepts both strings and numbers, always serializes as a number.
pub mod json_u64 {
    use serde::de::{Error, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct U64Visitor;

        impl Visitor<'_> for U64Visitor {
            type Value = u64;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an unsigned integer or a decimal string")
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<u64, E> {
                u64::try_from(v)
                    .map_err(|_e| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<u64, E> {
                v.parse()
                    .map_err(|_e| E::invalid_value(serde::de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(U64Visitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn candidate_json(id: &str, votes: &str) -> Value {
        json!({
            "candidate_id": id,
            "name": "Alice",
            "candidate_address": "0x1",
            "dao": "Builders",
            "image": "ipfs://cid",
            "votes": votes,
        })
    }

    #[test]
    fn election_info() {
        let result = json!(["Board Vote", true, { "vec": ["1700000000"] }, { "vec": [] }, "12"]);
        let view = decode_view::<ElectionInfoView>(&result).unwrap();
        assert_eq!(view, ElectionInfoView {
            election_name: "Board Vote".to_owned(),
            is_active: true,
            start_time: Some(1700000000),
            end_time: None,
            total_votes: 12,
        });

        let info = ElectionInfo::from(view);
        assert_eq!(info.start_time, 1700000000);
        assert_eq!(info.end_time, 0);
    }

    #[test]
    fn election_info_malformed() {
        for result in [
            json!(null),
            json!({ "election_name": "x" }),
            json!(["Board Vote", true, { "vec": [] }, { "vec": [] }]),
            json!(["Board Vote", "yes", { "vec": [] }, { "vec": [] }, "0"]),
            json!(["Board Vote", true, "1700000000", { "vec": [] }, "0"]),
            json!(["Board Vote", true, { "vec": ["1", "2"] }, { "vec": [] }, "0"]),
            json!(["Board Vote", true, { "vec": [] }, { "vec": [] }, "-1"]),
        ] {
            let err = decode_view::<ElectionInfoView>(&result).unwrap_err();
            assert!(
                matches!(err, Error::InvalidShape { function: "get_election_info", .. }),
                "{result}: {err}"
            );
        }
    }

    #[test]
    fn winner() {
        let view = decode_view::<WinnerView>(&json!([{ "vec": ["3"] }])).unwrap();
        assert_eq!(ElectionWinner::from(view).winner_id, 3);

        let view = decode_view::<WinnerView>(&json!([{ "vec": [] }])).unwrap();
        assert_eq!(view, WinnerView(None));
        assert_eq!(ElectionWinner::from(view).winner_id, 0);

        assert!(decode_view::<WinnerView>(&json!(["3"])).is_err());
    }

    #[test]
    fn candidates() {
        let result = json!([[candidate_json("1", "4"), candidate_json("2", "0")]]);
        let CandidateList(candidates) = decode_view(&result).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].candidate_id, 1);
        assert_eq!(candidates[0].votes, 4);
        assert_eq!(candidates[1].candidate_id, 2);
        assert_eq!(candidates[0].candidate_address.as_bytes()[31], 1);

        let CandidateList(empty) = decode_view(&json!([[]])).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn candidates_malformed() {
        for result in [
            json!([]),
            json!({}),
            json!([candidate_json("1", "4")]),
            json!([["not a record"]]),
            json!([[{ "candidate_id": "1" }]]),
        ] {
            assert!(decode_view::<CandidateList>(&result).is_err(), "{result}");
        }
    }

    #[test]
    fn scalars() {
        assert_eq!(decode_view::<CandidateVotes>(&json!(["7"])).unwrap().0, 7);
        assert_eq!(decode_view::<CandidateVotes>(&json!([7])).unwrap().0, 7);
        assert!(decode_view::<CandidateVotes>(&json!([true])).is_err());

        assert!(decode_view::<VoterVoted>(&json!([true])).unwrap().0);
        assert!(!decode_view::<VoterVoted>(&json!([false])).unwrap().0);
        assert!(decode_view::<VoterVoted>(&json!(["true"])).is_err());
    }

    #[test]
    fn tagged_result() {
        let result = ViewResult::decode(ViewFunction::GetWinner, &json!([{ "vec": ["9"] }]))
            .unwrap();
        assert_eq!(result, ViewResult::Winner(Some(9)));
        assert_eq!(result.function(), ViewFunction::GetWinner);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "function": "get_winner", "result": 9 })
        );

        let function = "has_voter_voted".parse::<ViewFunction>().unwrap();
        assert_eq!(
            ViewResult::decode(function, &json!([true])).unwrap(),
            ViewResult::VoterVoted(true)
        );
        assert!("get_everything".parse::<ViewFunction>().is_err());
    }
}
