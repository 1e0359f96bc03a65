//! Configuration for the sync dispatch.

use std::fmt;
use std::str::FromStr;

/// How a collection-level fetch that returns no records is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFetchPolicy {
    /// An empty list is a successful result.
    #[default]
    Success,
    /// An empty list is reported as `SyncError::NotFound`, the way hosts
    /// that test the result for truthiness expect.
    NotFound,
}

impl fmt::Display for EmptyFetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::NotFound => "not-found",
        })
    }
}

/// Error from parsing an unknown empty-fetch policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown empty-fetch policy `{0}` (expected `success` or `not-found`)")]
pub struct ParsePolicyError(pub String);

impl FromStr for EmptyFetchPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "not-found" => Ok(Self::NotFound),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Configuration for the sync dispatch.
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Routing of an empty `find_all` result.
    pub empty_fetch: EmptyFetchPolicy,
}
