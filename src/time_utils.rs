// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time in the storage timestamp format.
///
/// Used by the document-store implementations when stamping `created_at`
/// and `updated_at`; callers never supply their own timestamps.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}
