// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod jobs;
mod logging;
mod status;

pub use jobs::JobConfigLayer;
pub use logging::{LoggingConfig, LoggingConfigLayer, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL};
pub use status::{StatusConfig, StatusConfigLayer, DEFAULT_REQUEST_TIMEOUT_SECS};
