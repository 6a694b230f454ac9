// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SIGINT/SIGTERM handling. Handlers are registered by [`ShutdownSignal::install`],
//! so a signal arriving before anyone awaits [`ShutdownSignal::recv`] is kept.

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

pub struct ShutdownSignal {
	#[cfg(unix)]
	interrupt: Signal,
	#[cfg(unix)]
	terminate: Signal,
}

impl ShutdownSignal {
	#[cfg(unix)]
	pub fn install() -> io::Result<Self> {
		Ok(Self {
			interrupt: signal(SignalKind::interrupt())?,
			terminate: signal(SignalKind::terminate())?,
		})
	}

	#[cfg(not(unix))]
	pub fn install() -> io::Result<Self> {
		Ok(Self {})
	}

	/// Waits for the first shutdown signal.
	#[cfg(unix)]
	pub async fn recv(&mut self) -> io::Result<()> {
		tokio::select! {
			_ = self.interrupt.recv() => Ok(()),
			_ = self.terminate.recv() => Ok(()),
		}
	}

	#[cfg(not(unix))]
	pub async fn recv(&mut self) -> io::Result<()> {
		tokio::signal::ctrl_c().await
	}
}
