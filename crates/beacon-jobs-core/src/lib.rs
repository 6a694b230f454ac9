// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the beacon job scheduler.
//!
//! This crate provides:
//! - [`JobDefinition`]: validated, immutable configuration of one job
//! - [`ExecutionResult`]: the record of a single process attempt
//! - [`Outcome`]: how an attempt ended

pub mod definition;
pub mod error;
pub mod execution;

pub use definition::{ComponentId, JobDefinition, JobDefinitionBuilder, MAX_DURATION};
pub use error::{DefinitionError, Result};
pub use execution::{ExecutionResult, ExitDetail, Outcome};
