// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Status page reporting for beacon.
//!
//! This crate provides:
//! - [`StatusReporter`]: the boundary the scheduler uses to read and write
//!   component status
//! - [`CachetClient`]: a [`StatusReporter`] backed by the Cachet REST API

mod client;
mod error;
mod reporter;

pub use client::{CachetClient, CachetClientBuilder, ClientConfig};
pub use error::{Result, StatusError};
pub use reporter::{ComponentStatus, NewIncident, StatusReporter};
