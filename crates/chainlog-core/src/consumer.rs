//! Consumer identifiers.
//!
//! Two job-identifier schemes coexist: the legacy UUID scheme and the newer
//! 32-bit integer scheme. A `ConsumerId` carries exactly one of them, and the
//! scheme decides which storage column holds the value. The two schemes never
//! alias, even when their raw values happen to be numerically equal.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job identifier from the legacy (UUID) scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacyJobId(pub Uuid);

/// Job identifier from the 32-bit integer scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i32);

/// The job a log broadcast is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "id", rename_all = "snake_case")]
pub enum ConsumerId {
    /// Legacy UUID-scheme job.
    Legacy(LegacyJobId),
    /// Integer-scheme job.
    V2(JobId),
}

/// The storage column a consumer identifier is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsumerColumn {
    /// `job_id`, holding legacy UUIDs.
    JobId,
    /// `job_id_v2`, holding 32-bit integers.
    JobIdV2,
}

impl ConsumerColumn {
    /// Returns the column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::JobId => "job_id",
            Self::JobIdV2 => "job_id_v2",
        }
    }
}

impl ConsumerId {
    /// Resolves the storage column for this identifier's scheme.
    #[must_use]
    pub const fn column(&self) -> ConsumerColumn {
        match self {
            Self::Legacy(_) => ConsumerColumn::JobId,
            Self::V2(_) => ConsumerColumn::JobIdV2,
        }
    }
}

impl From<LegacyJobId> for ConsumerId {
    fn from(id: LegacyJobId) -> Self {
        Self::Legacy(id)
    }
}

impl From<JobId> for ConsumerId {
    fn from(id: JobId) -> Self {
        Self::V2(id)
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy(LegacyJobId(id)) => write!(f, "job {id}"),
            Self::V2(JobId(id)) => write!(f, "job v2 {id}"),
        }
    }
}
