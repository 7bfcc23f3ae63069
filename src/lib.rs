// Copyright 2026 RedNote Spider Contributors
// SPDX-License-Identifier: Apache-2.0

//! RedNote search spider: collects note listings from a keyword search.
//!
//! This library crate exposes the pipeline modules for integration testing.

pub mod browser;
pub mod config;
pub mod cookies;
pub mod export;
pub mod extract;
pub mod pipeline;
