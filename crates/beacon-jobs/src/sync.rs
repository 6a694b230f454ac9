// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reconciliation of a failed job's status page component.

use std::sync::Arc;

use beacon_jobs_core::{ExecutionResult, JobDefinition};
use beacon_status::{NewIncident, StatusReporter};
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::log::JobLog;

/// What a reconciliation did to the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
	/// The final result was a success; the status page was not contacted.
	NotRequired,
	/// The component already had the failure status; nothing was written.
	AlreadySet { status: u32 },
	/// The component was moved to the failure status.
	Updated { previous: u32, status: u32 },
}

#[derive(Clone)]
pub struct StatusSynchronizer {
	reporter: Arc<dyn StatusReporter>,
}

impl StatusSynchronizer {
	pub fn new(reporter: Arc<dyn StatusReporter>) -> Self {
		Self { reporter }
	}

	/// Brings the job's component to its failure status if it is not there yet.
	///
	/// Fetch and update failures are returned to the caller. An incident is
	/// opened after a successful update when the job asks for one; failing to
	/// open it is logged only.
	#[instrument(skip_all, fields(job = %job.name(), component_id = %job.component_id()))]
	pub async fn reconcile(
		&self,
		job: &JobDefinition,
		final_result: &ExecutionResult,
		log: &JobLog,
	) -> Result<ReconcileAction> {
		if final_result.is_success() {
			return Ok(ReconcileAction::NotRequired);
		}

		let desired = job.failure_status();
		let current = self.reporter.get_status(job.component_id()).await?;
		log.append(format!(
			"Current component status: {} ({})",
			current.status_name, current.status
		));

		if current.status == desired {
			log.append(
				"Status of component is already set to the configured failure status, no need to update",
			);
			info!(status = desired, "Component already in failure status");
			return Ok(ReconcileAction::AlreadySet { status: desired });
		}

		self.reporter
			.set_status(job.component_id(), desired)
			.await?;
		log.append(format!("Component set to status code: {desired}"));
		info!(previous = current.status, status = desired, "Component status updated");

		if job.create_incident() {
			self.open_incident(job, final_result, log).await;
		}

		Ok(ReconcileAction::Updated {
			previous: current.status,
			status: desired,
		})
	}

	async fn open_incident(&self, job: &JobDefinition, final_result: &ExecutionResult, log: &JobLog) {
		let incident = NewIncident {
			component_id: job.component_id(),
			component_status: job.failure_status(),
			name: format!("{} failed", job.name()),
			message: format!(
				"Job '{}' failed after {} attempt(s): {} ({})",
				job.name(),
				job.max_attempts(),
				final_result.outcome(),
				final_result.exit()
			),
		};

		match self.reporter.create_incident(&incident).await {
			Ok(()) => log.append("Incident created"),
			Err(e) => {
				log.append(format!("Could not create incident: {e}"));
				warn!(error = %e, "Failed to create incident");
			}
		}
	}
}
