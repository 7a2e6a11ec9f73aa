use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ArgumentId = String;
pub type KeyPointId = String;
pub type Topic = String;

/// Match label. `1.0` is a match, `0.0` no match; anything in between is allowed.
pub type Label = f64;

/// Position taken towards a topic, encoded as `1` (pro) or `-1` (con) on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Stance {
    Pro,
    Con,
}

impl TryFrom<i64> for Stance {
    type Error = DataError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Pro),
            -1 => Ok(Self::Con),
            other => Err(DataError::InvalidStance(other)),
        }
    }
}

impl From<Stance> for i64 {
    fn from(stance: Stance) -> Self {
        match stance {
            Stance::Pro => 1,
            Stance::Con => -1,
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pro => f.write_str("pro"),
            Self::Con => f.write_str("con"),
        }
    }
}

/// Single argument with its stance towards a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub id: ArgumentId,
    pub text: String,
    pub topic: Topic,
    pub stance: Stance,
}

/// Single key point with its stance towards a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub id: KeyPointId,
    pub text: String,
    pub topic: Topic,
    pub stance: Stance,
}

impl Argument {
    /// Whether a key point shares this argument's topic and stance
    #[must_use]
    pub fn is_candidate_for(&self, key_point: &KeyPoint) -> bool {
        self.topic == key_point.topic && self.stance == key_point.stance
    }
}

/// Identifies an argument / key point pair. The pair may or may not match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId {
    pub argument_id: ArgumentId,
    pub key_point_id: KeyPointId,
}

impl PairId {
    pub fn new(argument_id: impl Into<ArgumentId>, key_point_id: impl Into<KeyPointId>) -> Self {
        Self {
            argument_id: argument_id.into(),
            key_point_id: key_point_id.into(),
        }
    }

    #[must_use]
    pub fn of(argument: &Argument, key_point: &KeyPoint) -> Self {
        Self::new(argument.id.clone(), key_point.id.clone())
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.argument_id, self.key_point_id)
    }
}

/// Dataset partition as published by the shared task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }

    #[must_use]
    pub fn arguments_file(self) -> String {
        format!("arguments_{}.csv", self.as_str())
    }

    #[must_use]
    pub fn key_points_file(self) -> String {
        format!("key_points_{}.csv", self.as_str())
    }

    #[must_use]
    pub fn labels_file(self) -> String {
        format!("labels_{}.csv", self.as_str())
    }

    /// All CSV files that make up this split
    #[must_use]
    pub fn files(self) -> [String; 3] {
        [
            self.arguments_file(),
            self.key_points_file(),
            self.labels_file(),
        ]
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
