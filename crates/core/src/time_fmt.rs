// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compact elapsed-time formatting for list views.

/// Format the gap between two epoch-millisecond stamps as `5s`, `3m`, `2h`, `4d`.
///
/// Returns `0s` when `then_ms` is in the future (clock skew between
/// cooperating processes).
pub fn format_elapsed_ms(now_ms: u64, then_ms: u64) -> String {
    let secs = now_ms.saturating_sub(then_ms) / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
