// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the leadbot workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a lead entered the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadSource {
    /// Entered via an advertising deep link (`/start <payload>`).
    Ads,
    /// Entered organically (`/start` without payload).
    Organic,
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Operator-facing labels; the spreadsheet and the notification both
        // carry the Russian strings the operators expect.
        match self {
            LeadSource::Ads => write!(f, "Реклама"),
            LeadSource::Organic => write!(f, "Органика"),
        }
    }
}

/// One append-only lead row.
///
/// A user may have multiple rows over time; the current lead is the most
/// recent row for that user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// ISO 8601 creation timestamp.
    pub timestamp: String,
    pub source: LeadSource,
    pub user_id: String,
    pub name: String,
    pub contact: String,
    pub company: String,
    /// Free-text answers/notes accumulated during qualification.
    pub answers: String,
    pub checklist_sent: bool,
}

impl Lead {
    /// True once all three contact-form fields are known (possibly empty in
    /// legacy lenient captures, but present).
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn has_contact(&self) -> bool {
        !self.contact.trim().is_empty()
    }

    pub fn has_company(&self) -> bool {
        !self.company.trim().is_empty()
    }
}

/// Which contact-form question the user is answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStep {
    Name,
    Contact,
    Company,
}

/// Post-capture sales dialogue phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesPhase {
    /// A scheduling intent was detected; waiting for a concrete time.
    Scheduling,
    /// A time slot was confirmed.
    Scheduled,
}

/// Flagship products the sales dialogue can pivot around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    Cashflow,
    Bunker,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Cashflow => write!(f, "Cashflow"),
            Product::Bunker => write!(f, "Бункер"),
        }
    }
}

/// A single prior conversation turn, kept as short rolling history for the
/// seller responder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// "user" or "assistant".
    pub role: String,
    pub text: String,
}

/// Ephemeral per-user conversation record.
///
/// This is a cache, not a source of truth: it may be silently lost at any
/// time, and the engine recovers form position from the replied-to prompt
/// text and known-field state from the lead repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub step: Option<FormStep>,
    pub phase: Option<SalesPhase>,
    /// Collected but not yet persisted name.
    pub name: Option<String>,
    /// Collected but not yet persisted contact.
    pub contact: Option<String>,
    pub product: Option<Product>,
    /// Short rolling history of prior turns (bounded by the engine).
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

/// Relative day for a parsed scheduling slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Day {
    Today,
    Tomorrow,
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Day::Today => write!(f, "сегодня"),
            Day::Tomorrow => write!(f, "завтра"),
        }
    }
}

/// A parsed scheduling slot: optional relative day plus a normalized
/// `HH:MM` 24-hour time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Option<Day>,
    pub time: String,
}

/// Classified intent of a free-form message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// A concrete time slot was recognized. Always wins over keyword intents.
    Time,
    /// The flagship product was named.
    Cashflow,
    /// The user asked for elaboration ("tell me more", "price").
    Details,
    /// The user signalled readiness to proceed ("let's do it", "call me").
    Schedule,
}

/// Reminder follow-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    FourHours,
    TwentyFourHours,
}

impl ReminderKind {
    /// Delay from scheduling to due time, in milliseconds.
    pub fn delay_ms(&self) -> i64 {
        match self {
            ReminderKind::FourHours => 4 * 60 * 60 * 1000,
            ReminderKind::TwentyFourHours => 24 * 60 * 60 * 1000,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderKind::FourHours => write!(f, "4h"),
            ReminderKind::TwentyFourHours => write!(f, "24h"),
        }
    }
}

impl FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4h" => Ok(ReminderKind::FourHours),
            "24h" => Ok(ReminderKind::TwentyFourHours),
            other => Err(format!("unknown reminder kind `{other}`")),
        }
    }
}

/// A harvested due reminder job.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderJob {
    /// Store key, `r:{user}:{kind}:{due_ms}`.
    pub id: String,
    pub user_id: String,
    pub chat_id: i64,
    pub kind: ReminderKind,
}

/// A queued broadcast job awaiting fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastJob {
    /// Store key, `job:{enqueue_ms}`.
    pub id: String,
    pub text: String,
}

/// Channel-agnostic inbound update handed to the conversation engine.
#[derive(Debug, Clone)]
pub struct InboundUpdate {
    pub chat_id: i64,
    pub user_id: String,
    pub text: String,
    /// Text of the message this one replies to, if any. This is the
    /// authoritative step-recovery signal.
    pub reply_to_text: Option<String>,
    /// Whether the sender passed the operator admin check.
    pub from_admin: bool,
}

/// Lead context handed to the seller responder alongside the user message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeadContext {
    pub source: Option<String>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub company: Option<String>,
    pub product: Option<String>,
}

/// A seller completion request.
#[derive(Debug, Clone)]
pub struct SellerRequest {
    pub user_message: String,
    pub context: LeadContext,
    /// Extra steering instruction (e.g. do not repeat the greeting).
    pub instruction: Option<String>,
    pub history: Vec<HistoryTurn>,
}
