// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-sent-event framing for the per-node goal subscription endpoint.

use serde::Serialize;

/// Render one SSE frame: `event: <event_type>\ndata: <json>\n\n`.
pub fn sse_frame<T: Serialize>(event_type: &str, data: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(data)?;
    Ok(format!("event: {event_type}\ndata: {json}\n\n"))
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
