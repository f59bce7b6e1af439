// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root-level integration suite: end-to-end scenarios spanning the
//! Cloud Scheduler's HTTP surface and the Node Scheduler's rule-evaluator
//! and workload-dispatch loop, exercised against real `sg-cloud`/`sg-node`
//! components rather than per-crate unit fakes.

mod prelude;

mod cloud;
mod node;
