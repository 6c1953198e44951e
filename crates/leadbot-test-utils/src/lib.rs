// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for the leadbot workspace.
//!
//! Provides recording mocks for every collaborator trait so engine and
//! gateway tests run fast and deterministic without external services.

pub mod memory_store;
pub mod mock_channel;
pub mod mock_jobs;
pub mod mock_seller;

pub use memory_store::{MemoryKv, MemoryLeadRepo};
pub use mock_channel::{MockNotifier, RecordingTransport, SentItem};
pub use mock_jobs::{MockBroadcast, MockReminders};
pub use mock_seller::MockSeller;
