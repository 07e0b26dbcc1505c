// Copyright 2026 Pandavote Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pandavote library — automated ballot runner for the Great Bear Council
//! panda election.
//!
//! This library crate exposes the core modules for integration testing.

pub mod ballot;
pub mod cli;
pub mod election;
pub mod extract;
pub mod http;
pub mod platform;
pub mod report;
