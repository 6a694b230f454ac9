// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sections::{JobConfigLayer, LoggingConfigLayer, StatusConfigLayer};

/// One source's partial view of the configuration. Later layers override
/// earlier ones field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfigLayer {
	pub status: Option<StatusConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub jobs: BTreeMap<String, JobConfigLayer>,
}

impl SchedulerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.status, other.status, StatusConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		for (name, job) in other.jobs {
			self.jobs.entry(name).or_default().merge(job);
		}
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(other)) => merge(existing, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}
