// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations, applied at startup.

use leadbot_core::LeadbotError;
use tracing::info;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Run all pending migrations against `conn`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LeadbotError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| LeadbotError::Storage {
            source: Box::new(e),
        })?;

    let applied = report.applied_migrations();
    if !applied.is_empty() {
        info!(count = applied.len(), "applied schema migrations");
    }
    Ok(())
}
