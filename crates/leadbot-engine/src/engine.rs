// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user conversation state machine.
//!
//! Each inbound update is processed by a short-lived invocation that may
//! not share memory with the previous one. The engine therefore treats the
//! session store as a cache: the replied-to prompt text is the
//! authoritative step-recovery signal, and the lead repository is the
//! source of truth for fields that are already known.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use leadbot_core::{
    BroadcastQueue, ChatTransport, FormStep, HistoryTurn, InboundUpdate, Intent, Lead,
    LeadContext, LeadRepository, LeadSource, LeadbotError, Notifier, Product, ReminderScheduler,
    SalesPhase, SellerRequest, SellerResponder, Session, SessionStore,
};

use crate::{intent, links, markdown, prompts, slots};

/// Collaborator handles the engine is wired with.
pub struct EngineParts {
    pub repo: Arc<dyn LeadRepository>,
    pub seller: Arc<dyn SellerResponder>,
    pub transport: Arc<dyn ChatTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub sessions: Arc<dyn SessionStore>,
    /// `None` when no durable store is configured; reminders are disabled.
    pub reminders: Option<Arc<dyn ReminderScheduler>>,
    /// `None` when no durable store is configured; broadcast is disabled.
    pub broadcast: Option<Arc<dyn BroadcastQueue>>,
}

/// Engine tuning options.
pub struct EngineOptions {
    /// Welcome checklist document URL (Google Drive viewer links are
    /// rewritten to direct-download form).
    pub checklist_url: Option<String>,
    /// Welcome logo image URL.
    pub logo_url: Option<String>,
    /// Rolling history turns kept for the seller responder.
    pub history_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            checklist_url: None,
            logo_url: None,
            history_limit: 10,
        }
    }
}

/// The conversation state machine.
pub struct ConversationEngine {
    repo: Arc<dyn LeadRepository>,
    seller: Arc<dyn SellerResponder>,
    transport: Arc<dyn ChatTransport>,
    notifier: Arc<dyn Notifier>,
    sessions: Arc<dyn SessionStore>,
    reminders: Option<Arc<dyn ReminderScheduler>>,
    broadcast: Option<Arc<dyn BroadcastQueue>>,
    options: EngineOptions,
}

impl ConversationEngine {
    pub fn new(parts: EngineParts, options: EngineOptions) -> Self {
        Self {
            repo: parts.repo,
            seller: parts.seller,
            transport: parts.transport,
            notifier: parts.notifier,
            sessions: parts.sessions,
            reminders: parts.reminders,
            broadcast: parts.broadcast,
            options,
        }
    }

    /// Process one inbound update end to end.
    ///
    /// Transition order per message: admin broadcast capture, `/start`
    /// entry, form step recovery/advance, `/broadcast` command, sales-phase
    /// handling, and finally the seller responder default.
    pub async fn handle(&self, update: &InboundUpdate) -> Result<(), LeadbotError> {
        let text = update.text.trim();
        if text.is_empty() {
            debug!(user_id = %update.user_id, "ignoring empty message");
            return Ok(());
        }

        // Admin broadcast capture: a reply to our own broadcast prompt.
        if let Some(reply) = update.reply_to_text.as_deref()
            && prompts::is_broadcast_prompt(reply)
            && update.from_admin
        {
            return self.capture_broadcast(update, text).await;
        }

        // Only a bare "/start" or "/start <payload>" counts; run-on tokens
        // like "/startabc" are ordinary text.
        if let Some(rest) = text.strip_prefix("/start")
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            return self.handle_start(update, rest.trim()).await;
        }

        let mut session = self.load_session(&update.user_id).await;
        let lead = self.lookup_lead(&update.user_id).await;
        let qualified = lead
            .as_ref()
            .is_some_and(|l| l.has_name() && l.has_contact() && l.has_company());

        // Step recovery: the replied-to prompt text is authoritative; the
        // live session is the fallback. A fully qualified user never
        // re-enters the form regardless of stale state.
        let step = update
            .reply_to_text
            .as_deref()
            .and_then(prompts::step_for_prompt)
            .or(session.step);
        if let Some(step) = step
            && !qualified
        {
            return self
                .advance_form(update, step, text, session, lead.as_ref())
                .await;
        }

        if text == "/broadcast" {
            return self.handle_broadcast_command(update).await;
        }

        self.handle_sales(update, text, &mut session, lead.as_ref(), qualified)
            .await
    }

    // ---- entry ---------------------------------------------------------

    async fn handle_start(
        &self,
        update: &InboundUpdate,
        payload: &str,
    ) -> Result<(), LeadbotError> {
        if !payload.is_empty() {
            return self.handle_ads_entry(update, payload).await;
        }

        let lead = self.lookup_lead(&update.user_id).await;
        if lead.is_some() {
            // Known user: never re-greet, straight to the seller. The
            // no-repeat instruction only applies when the contact fields
            // really were collected; an ads placeholder row has none.
            let qualified = lead
                .as_ref()
                .is_some_and(|l| l.has_name() && l.has_contact() && l.has_company());
            let mut session = self.load_session(&update.user_id).await;
            return self
                .seller_reply(update, "/start", &mut session, lead.as_ref(), qualified)
                .await;
        }

        info!(user_id = %update.user_id, "organic entry, starting contact form");
        self.send_welcome_materials(update.chat_id).await?;

        let session = Session {
            step: Some(FormStep::Name),
            ..Session::default()
        };
        self.save_session(&update.user_id, &session).await;
        self.transport
            .send_prompt(update.chat_id, prompts::ASK_NAME)
            .await
    }

    /// Advertising deep link: skip the form entirely. A placeholder lead
    /// row is appended immediately so later invocations see the user as
    /// qualified, with the ad session id kept in the answers column.
    async fn handle_ads_entry(
        &self,
        update: &InboundUpdate,
        payload: &str,
    ) -> Result<(), LeadbotError> {
        info!(user_id = %update.user_id, session_id = %payload, "advertising entry");

        let lead = Lead {
            timestamp: Utc::now().to_rfc3339(),
            source: LeadSource::Ads,
            user_id: update.user_id.clone(),
            name: String::new(),
            contact: String::new(),
            company: String::new(),
            answers: payload.to_string(),
            checklist_sent: true,
        };
        if let Err(e) = self.repo.append(&lead).await {
            warn!(user_id = %update.user_id, error = %e, "lead append failed");
        }
        if let Err(e) = self.notifier.notify_lead(&lead).await {
            warn!(user_id = %update.user_id, error = %e, "operator notify failed");
        }

        self.send_welcome_materials(update.chat_id).await?;

        let mut session = self.load_session(&update.user_id).await;
        let context = LeadContext {
            source: Some(LeadSource::Ads.to_string()),
            ..LeadContext::default()
        };
        let request = SellerRequest {
            user_message: update.text.clone(),
            context,
            instruction: Some(
                "Пользователь пришёл по рекламной ссылке. Поздоровайся и предложи следующий шаг."
                    .to_string(),
            ),
            history: Vec::new(),
        };
        self.deliver_seller_reply(update, &request, &mut session)
            .await?;
        self.schedule_reminders(update).await;
        Ok(())
    }

    /// Welcome text, optional logo, and the best-effort checklist document.
    async fn send_welcome_materials(&self, chat_id: i64) -> Result<(), LeadbotError> {
        self.transport.send_text(chat_id, prompts::WELCOME).await?;

        if let Some(logo) = &self.options.logo_url
            && let Err(e) = self.transport.send_photo(chat_id, logo, "").await
        {
            warn!(chat_id, error = %e, "logo send failed");
        }

        if let Some(url) = &self.options.checklist_url {
            let direct = links::gdrive_direct_url(url);
            if let Err(e) = self
                .transport
                .send_document(chat_id, &direct, prompts::CHECKLIST_CAPTION)
                .await
            {
                warn!(chat_id, error = %e, "checklist document send failed, falling back to link");
                let fallback = format!("{}\n{direct}", prompts::CHECKLIST_CAPTION);
                if let Err(e) = self.transport.send_text(chat_id, &fallback).await {
                    warn!(chat_id, error = %e, "checklist link fallback failed");
                }
            }
        }
        Ok(())
    }

    // ---- contact form --------------------------------------------------

    async fn advance_form(
        &self,
        update: &InboundUpdate,
        step: FormStep,
        answer: &str,
        mut session: Session,
        lead: Option<&Lead>,
    ) -> Result<(), LeadbotError> {
        debug!(user_id = %update.user_id, ?step, "form answer");

        match step {
            FormStep::Name => session.name = Some(answer.to_string()),
            FormStep::Contact => session.contact = Some(answer.to_string()),
            FormStep::Company => {
                // The company answer always completes the form, even when
                // earlier answers were lost with the session: an empty
                // field is accepted over re-asking an already-answered
                // question.
                return self
                    .complete_form(update, session, lead, answer.to_string())
                    .await;
            }
        }

        // Ask only for fields that are genuinely unknown: a partial prior
        // lead row counts as known.
        let has_contact = session.contact.is_some() || lead.is_some_and(|l| l.has_contact());
        let has_company = lead.is_some_and(|l| l.has_company());

        if !has_contact {
            session.step = Some(FormStep::Contact);
            self.save_session(&update.user_id, &session).await;
            return self
                .transport
                .send_prompt(update.chat_id, prompts::ASK_CONTACT)
                .await;
        }
        if !has_company {
            session.step = Some(FormStep::Company);
            self.save_session(&update.user_id, &session).await;
            return self
                .transport
                .send_prompt(update.chat_id, prompts::ASK_COMPANY)
                .await;
        }

        let company = lead.map(|l| l.company.clone()).unwrap_or_default();
        self.complete_form(update, session, lead, company).await
    }

    /// Final form step: persist the lead, notify, clear session, hand to
    /// the seller with a no-repeat instruction, schedule follow-ups.
    async fn complete_form(
        &self,
        update: &InboundUpdate,
        session: Session,
        prior: Option<&Lead>,
        company: String,
    ) -> Result<(), LeadbotError> {
        // Lenient on lost fields: recovery via reply text may leave
        // name/contact unknown, and an empty string is accepted over
        // re-asking a question the user already answered.
        let name = session
            .name
            .clone()
            .or_else(|| prior.filter(|l| l.has_name()).map(|l| l.name.clone()))
            .unwrap_or_default();
        let contact = session
            .contact
            .clone()
            .or_else(|| prior.filter(|l| l.has_contact()).map(|l| l.contact.clone()))
            .unwrap_or_default();

        let lead = Lead {
            timestamp: Utc::now().to_rfc3339(),
            source: LeadSource::Organic,
            user_id: update.user_id.clone(),
            name,
            contact,
            company,
            answers: String::new(),
            checklist_sent: true,
        };

        info!(user_id = %update.user_id, company = %lead.company, "form complete, persisting lead");
        if let Err(e) = self.repo.append(&lead).await {
            warn!(user_id = %update.user_id, error = %e, "lead append failed");
        }
        if let Err(e) = self.notifier.notify_lead(&lead).await {
            warn!(user_id = %update.user_id, error = %e, "operator notify failed");
        }
        if let Err(e) = self.sessions.clear(&update.user_id).await {
            warn!(user_id = %update.user_id, error = %e, "session clear failed");
        }

        let mut fresh = Session::default();
        let request = SellerRequest {
            user_message: update.text.clone(),
            context: lead_context(&fresh, Some(&lead)),
            instruction: Some(prompts::NO_REPEAT_INSTRUCTION.to_string()),
            history: Vec::new(),
        };
        self.deliver_seller_reply(update, &request, &mut fresh)
            .await?;
        self.schedule_reminders(update).await;
        Ok(())
    }

    // ---- broadcast -----------------------------------------------------

    async fn handle_broadcast_command(&self, update: &InboundUpdate) -> Result<(), LeadbotError> {
        if !update.from_admin {
            // Authorization failures are silent.
            debug!(user_id = %update.user_id, "ignoring /broadcast from non-admin");
            return Ok(());
        }
        if self.broadcast.is_none() {
            return self
                .transport
                .send_text(update.chat_id, "Рассылка недоступна: хранилище не настроено.")
                .await;
        }
        self.transport
            .send_prompt(update.chat_id, prompts::BROADCAST_PROMPT)
            .await
    }

    async fn capture_broadcast(
        &self,
        update: &InboundUpdate,
        text: &str,
    ) -> Result<(), LeadbotError> {
        let Some(queue) = &self.broadcast else {
            return self
                .transport
                .send_text(update.chat_id, "Рассылка недоступна: хранилище не настроено.")
                .await;
        };
        queue.enqueue(text).await?;
        info!(user_id = %update.user_id, "broadcast job enqueued");
        self.transport
            .send_text(update.chat_id, prompts::BROADCAST_QUEUED)
            .await
    }

    // ---- sales phase ---------------------------------------------------

    async fn handle_sales(
        &self,
        update: &InboundUpdate,
        text: &str,
        session: &mut Session,
        lead: Option<&Lead>,
        qualified: bool,
    ) -> Result<(), LeadbotError> {
        let intent = intent::classify(text);

        if session.phase == Some(SalesPhase::Scheduling) || intent == Some(Intent::Time) {
            return match slots::parse(text) {
                Some(slot) => {
                    info!(user_id = %update.user_id, time = %slot.time, "slot confirmed");
                    self.transport
                        .send_text(update.chat_id, &prompts::confirm_slot(&slot))
                        .await?;
                    let line =
                        prompts::operator_slot_line(&update.user_id, &slot, session.product);
                    if let Err(e) = self.notifier.notify_text(&line).await {
                        warn!(user_id = %update.user_id, error = %e, "operator notify failed");
                    }
                    session.phase = Some(SalesPhase::Scheduled);
                    self.save_session(&update.user_id, session).await;
                    self.cancel_reminders(&update.user_id).await;
                    Ok(())
                }
                None => {
                    self.transport
                        .send_text(update.chat_id, prompts::ASK_TIME)
                        .await
                }
            };
        }

        match intent {
            Some(Intent::Cashflow) => {
                session.product = Some(Product::Cashflow);
                session.phase = Some(SalesPhase::Scheduling);
                self.save_session(&update.user_id, session).await;
                self.cancel_reminders(&update.user_id).await;
                self.transport
                    .send_text(update.chat_id, prompts::ASK_TIME)
                    .await
            }
            Some(Intent::Schedule) => {
                session.phase = Some(SalesPhase::Scheduling);
                self.save_session(&update.user_id, session).await;
                self.cancel_reminders(&update.user_id).await;
                self.transport
                    .send_text(update.chat_id, prompts::ASK_TIME)
                    .await
            }
            Some(Intent::Details) => {
                let detail = match session.product {
                    Some(Product::Cashflow) => prompts::DETAILS_CASHFLOW,
                    _ => prompts::DETAILS_GENERIC,
                };
                self.transport.send_text(update.chat_id, detail).await?;
                session.phase = Some(SalesPhase::Scheduling);
                self.save_session(&update.user_id, session).await;
                self.cancel_reminders(&update.user_id).await;
                self.transport
                    .send_text(update.chat_id, prompts::ASK_TIME)
                    .await
            }
            Some(Intent::Time) | None => {
                self.seller_reply(update, text, session, lead, qualified)
                    .await
            }
        }
    }

    // ---- seller --------------------------------------------------------

    async fn seller_reply(
        &self,
        update: &InboundUpdate,
        text: &str,
        session: &mut Session,
        lead: Option<&Lead>,
        qualified: bool,
    ) -> Result<(), LeadbotError> {
        let instruction = qualified.then(|| prompts::NO_REPEAT_INSTRUCTION.to_string());
        let request = SellerRequest {
            user_message: text.to_string(),
            context: lead_context(session, lead),
            instruction,
            history: session.history.clone(),
        };
        self.deliver_seller_reply(update, &request, session).await
    }

    /// Call the seller and relay its reply, degrading on failure: a rate
    /// limit becomes the ask-for-a-time prompt, anything else a static
    /// apology. The user never sees a raw error.
    async fn deliver_seller_reply(
        &self,
        update: &InboundUpdate,
        request: &SellerRequest,
        session: &mut Session,
    ) -> Result<(), LeadbotError> {
        match self.seller.reply(request).await {
            Ok(reply) => {
                let clean = markdown::strip(&reply);
                self.transport.send_text(update.chat_id, &clean).await?;
                push_history(session, self.options.history_limit, &request.user_message, &clean);
                self.save_session(&update.user_id, session).await;
                Ok(())
            }
            Err(e) if e.is_rate_limited() => {
                warn!(user_id = %update.user_id, error = %e, "seller rate limited, degrading to scheduling prompt");
                self.transport
                    .send_text(update.chat_id, prompts::ASK_TIME)
                    .await
            }
            Err(e) => {
                warn!(user_id = %update.user_id, error = %e, "seller failed, sending fallback");
                self.transport
                    .send_text(update.chat_id, prompts::APOLOGY)
                    .await
            }
        }
    }

    // ---- small helpers -------------------------------------------------

    async fn load_session(&self, user_id: &str) -> Session {
        match self.sessions.get(user_id).await {
            Ok(Some(session)) => session,
            Ok(None) => Session::default(),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "session load failed, starting fresh");
                Session::default()
            }
        }
    }

    async fn save_session(&self, user_id: &str, session: &Session) {
        if let Err(e) = self.sessions.put(user_id, session).await {
            warn!(user_id = %user_id, error = %e, "session save failed");
        }
    }

    async fn lookup_lead(&self, user_id: &str) -> Option<Lead> {
        match self.repo.find_latest_by_user(user_id).await {
            Ok(lead) => lead,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "lead lookup failed, treating as unknown");
                None
            }
        }
    }

    async fn schedule_reminders(&self, update: &InboundUpdate) {
        if let Some(reminders) = &self.reminders
            && let Err(e) = reminders.schedule(&update.user_id, update.chat_id).await
        {
            warn!(user_id = %update.user_id, error = %e, "reminder scheduling failed");
        }
    }

    async fn cancel_reminders(&self, user_id: &str) {
        if let Some(reminders) = &self.reminders
            && let Err(e) = reminders.cancel(user_id).await
        {
            warn!(user_id = %user_id, error = %e, "reminder cancellation failed");
        }
    }
}

/// Build the seller context from everything known about the user.
fn lead_context(session: &Session, lead: Option<&Lead>) -> LeadContext {
    let field = |from_session: Option<&String>, from_lead: Option<String>| {
        from_session
            .cloned()
            .or(from_lead)
            .filter(|v| !v.trim().is_empty())
    };
    LeadContext {
        source: lead.map(|l| l.source.to_string()),
        name: field(session.name.as_ref(), lead.map(|l| l.name.clone())),
        contact: field(session.contact.as_ref(), lead.map(|l| l.contact.clone())),
        company: field(None, lead.map(|l| l.company.clone())),
        product: session.product.map(|p| p.to_string()),
    }
}

fn push_history(session: &mut Session, limit: usize, user_text: &str, reply: &str) {
    session.history.push(HistoryTurn {
        role: "user".to_string(),
        text: user_text.to_string(),
    });
    session.history.push(HistoryTurn {
        role: "assistant".to_string(),
        text: reply.to_string(),
    });
    let len = session.history.len();
    if len > limit {
        session.history.drain(..len - limit);
    }
}
