// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the leadbot lead-qualification bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the leadbot workspace. All adapters (chat
//! transport, seller responder, lead repository, durable store) implement
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{LeadbotError, SellerFailure};
pub use types::{
    BroadcastJob, Day, FormStep, HistoryTurn, InboundUpdate, Intent, Lead, LeadContext,
    LeadSource, Product, ReminderJob, ReminderKind, SalesPhase, SellerRequest, Session, TimeSlot,
};

// Re-export all collaborator traits at crate root.
pub use traits::{
    BroadcastQueue, ChatTransport, KvStore, LeadRepository, Notifier, ReminderScheduler,
    SellerResponder, SessionStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leadbot_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = LeadbotError::Config("test".into());
        let _storage = LeadbotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = LeadbotError::Channel {
            message: "test".into(),
            source: None,
        };
        let _seller = LeadbotError::Seller {
            kind: SellerFailure::Failed,
            message: "test".into(),
        };
        let _repository = LeadbotError::Repository {
            message: "test".into(),
            source: None,
        };
        let _internal = LeadbotError::Internal("test".into());
    }

    #[test]
    fn rate_limit_detection() {
        let limited = LeadbotError::Seller {
            kind: SellerFailure::RateLimited,
            message: "429".into(),
        };
        let failed = LeadbotError::Seller {
            kind: SellerFailure::Failed,
            message: "500".into(),
        };
        assert!(limited.is_rate_limited());
        assert!(!failed.is_rate_limited());
        assert!(!LeadbotError::Internal("x".into()).is_rate_limited());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Verifies all collaborator traits compile and are accessible
        // through the public API.
        fn _assert_transport<T: ChatTransport>() {}
        fn _assert_notifier<T: Notifier>() {}
        fn _assert_repository<T: LeadRepository>() {}
        fn _assert_seller<T: SellerResponder>() {}
        fn _assert_kv<T: KvStore>() {}
        fn _assert_sessions<T: SessionStore>() {}
        fn _assert_reminders<T: ReminderScheduler>() {}
        fn _assert_broadcast<T: BroadcastQueue>() {}
    }
}
