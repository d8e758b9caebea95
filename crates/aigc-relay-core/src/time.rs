//! Timestamp normalization.

use chrono::{DateTime, SubsecRound, Utc};

/// Drop sub-second precision. Signatures and tokens carry whole seconds only.
#[must_use]
pub fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}
