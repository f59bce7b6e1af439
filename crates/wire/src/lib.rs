// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire formats for the Cloud Scheduler's HTTP surface.
//!
//! Wire format: UTF-8 JSON (or YAML, both decoders are attempted on write
//! endpoints) bodies, wrapped in a uniform [`ApiMessage`] envelope; SSE
//! frames carry one JSON event per message.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod envelope;
mod sse;

pub use codec::{decode_body, CodecError};
pub use envelope::ApiMessage;
pub use sse::sse_frame;
