//! # NotesApp — the presentation boundary
//!
//! Ties an [`AuthGateway`] and a [`NoteRepository`] together behind the four user
//! intents (`register`, `sign_in`, `sign_out`, `submit_note`) and exposes what a
//! view renders: the session, the last error, the note list, the draft and the
//! activity log.
//!
//! ## Event flow
//!
//! The gateway's session listener and every live note query only enqueue a
//! [`ClientEvent`]. [`NotesApp::pump`] (or [`NotesApp::process_next`] in an async
//! loop) handles them one at a time:
//!
//! - `SessionChanged` goes through [`SessionStore`]; a start, switch or end of
//!   session unbinds and rebinds the [`NoteListController`] accordingly.
//! - `Snapshot` is handed to the controller, which drops it if its epoch no
//!   longer matches the current binding.
//!
//! Intents pump the queue once their remote call completes, so the view sees
//! the resulting session and notes right away.
//! They pump before deciding whether their result is still relevant: a write or
//! a failed sign-in that finishes after the session moved on is dropped without
//! touching the error or the activity log.
//!
//! A sign-out the provider never confirmed leaves that user abandoned. Further
//! notifications for them are ignored until the provider reports no session or
//! the user signs in again explicitly.
//!
//! ## Errors
//!
//! Failures never escape as panics or fatal errors. Each intent returns its
//! [`UiError`] and also records it as [`NotesApp::last_error`] until it is cleared
//! or the next intent succeeds.

use api::auth::validate_credentials;
use api::{AuthGateway, Identity};
use store::{ClientConfig, Note, NoteRepository, SubscriptionHandle};

use crate::activity_log::{ActivityLog, LogLevel};
use crate::controller::{NoteListController, SnapshotOutcome};
use crate::error::UiError;
use crate::events::{channel, ClientEvent, EventReceiver, EventSender};
use crate::session::{SessionStore, SessionTransition};

pub struct NotesApp<A, R> {
    auth: A,
    config: ClientConfig,
    session: SessionStore,
    notes: NoteListController<R>,
    events_tx: EventSender,
    events_rx: EventReceiver,
    listener: Option<SubscriptionHandle>,
    /// Signed out locally while the provider may still hold the session.
    abandoned: Option<String>,
    last_error: Option<UiError>,
    draft: String,
    activity: ActivityLog,
}

impl<A: AuthGateway, R: NoteRepository> NotesApp<A, R> {
    /// Build the app and register its session listener. The provider's current
    /// session, if any, is applied before this returns.
    pub fn new(auth: A, repo: R, config: ClientConfig) -> Self {
        let (events_tx, events_rx) = channel();
        let notes = NoteListController::new(repo, events_tx.clone());
        let mut app = Self {
            auth,
            config,
            session: SessionStore::new(),
            notes,
            events_tx,
            events_rx,
            listener: None,
            abandoned: None,
            last_error: None,
            draft: String::new(),
            activity: ActivityLog::default(),
        };
        app.reattach();
        app.pump();
        app
    }

    /// Register the session listener, releasing the previous one first.
    pub fn reattach(&mut self) {
        if let Some(previous) = self.listener.take() {
            previous.unsubscribe();
        }
        let events = self.events_tx.clone();
        let handle = self.auth.on_session_change(Box::new(move |session| {
            if events.send(ClientEvent::SessionChanged(session)).is_err() {
                tracing::trace!("event queue closed, session change discarded");
            }
        }));
        tracing::debug!(listener = %handle.id(), "session listener attached");
        self.listener = Some(handle);
    }

    /// Release the session listener and tear down the session-bound state.
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.unsubscribe();
        }
        let discarded = std::iter::from_fn(|| self.events_rx.try_recv().ok()).count();
        if discarded > 0 {
            tracing::debug!(discarded, "dropped queued events on detach");
        }
        self.handle_session_change(None);
    }

    pub fn session(&self) -> Option<&Identity> {
        self.session.current()
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn activity_mut(&mut self) -> &mut ActivityLog {
        &mut self.activity
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn repository(&self) -> &R {
        self.notes.repository()
    }

    pub async fn register(&mut self, email: &str, password: &str) -> Result<Identity, UiError> {
        let email = self.check_credentials(email, password, self.config.auth.min_password_len)?;
        let generation = self.session.generation();
        let result = self.auth.register(&email, password).await;
        self.finish_auth("Registered", generation, result)
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Identity, UiError> {
        // Password length rules apply at registration only.
        let email = self.check_credentials(email, password, 1)?;
        let generation = self.session.generation();
        let result = self.auth.sign_in(&email, password).await;
        self.finish_auth("Signed in", generation, result)
    }

    /// Sign out locally right away, then tell the provider. A failed remote call is
    /// logged but never brings the session back.
    pub async fn sign_out(&mut self) {
        // Queued notifications predate the sign-out and must not reinstate the session.
        self.pump();
        let signed_out = self.session.current().map(|identity| identity.user_id.clone());
        self.handle_session_change(None);

        match self.auth.sign_out().await {
            Ok(()) => self.abandoned = None,
            Err(err) => {
                tracing::warn!(error = %err, "remote sign-out failed; staying signed out locally");
                self.activity
                    .log_activity(LogLevel::Warning, &format!("Sign-out not confirmed: {err}"));
                if signed_out.is_some() {
                    self.abandoned = signed_out;
                }
            }
        }
        self.pump();
    }

    /// Write a note for the signed-in user. Blank text returns `Ok(None)` without
    /// contacting the store.
    pub async fn submit_note(&mut self, text: &str) -> Result<Option<Note>, UiError> {
        if store::normalize_note_text(text).is_none() {
            return Ok(None);
        }
        let Some(identity) = self.session.current().cloned() else {
            return Err(self.record_error(UiError::Validation("Sign in to add notes".to_string())));
        };

        let generation = self.session.generation();
        let result = self.notes.submit(&identity.user_id, text).await;

        // Session changes made during the write are still queued.
        self.pump();
        if self.session.generation() != generation {
            tracing::debug!(user_id = %identity.user_id, "session changed during write, dropping result");
            return match result {
                Ok(_) => Ok(None),
                Err(err) => Err(err.into()),
            };
        }

        match result {
            Ok(created) => {
                if created.is_some() {
                    self.last_error = None;
                    self.activity.log_activity(LogLevel::Success, "Note added");
                }
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(user_id = %identity.user_id, error = %err, "note write failed");
                Err(self.record_error(err.into()))
            }
        }
    }

    /// Submit the current draft; the draft is cleared once the note is accepted.
    pub async fn submit_draft(&mut self) -> Result<Option<Note>, UiError> {
        let text = self.draft.clone();
        let result = self.submit_note(&text).await;
        if matches!(result, Ok(Some(_))) {
            self.draft.clear();
        }
        result
    }

    /// Handle every queued event. Returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Wait for the next event and handle it.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    fn handle_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::SessionChanged(Some(identity))
                if self.abandoned.as_deref() == Some(identity.user_id.as_str()) =>
            {
                tracing::debug!(user_id = %identity.user_id, "ignoring session the client signed out of");
            }
            ClientEvent::SessionChanged(next) => {
                if next.is_none() {
                    self.abandoned = None;
                }
                self.handle_session_change(next)
            }
            ClientEvent::Snapshot { epoch, notes } => {
                if let SnapshotOutcome::Stale = self.notes.apply_snapshot(epoch, notes) {
                    tracing::debug!(epoch, "discarded snapshot from superseded query");
                }
            }
        }
    }

    fn handle_session_change(&mut self, next: Option<Identity>) {
        match self.session.apply(next) {
            SessionTransition::Unchanged => {}
            SessionTransition::Started(identity) => {
                tracing::info!(user_id = %identity.user_id, "session started");
                self.notes.bind(&identity.user_id);
                self.activity.log_activity(
                    LogLevel::Info,
                    &format!("Welcome, {}", identity.display_name()),
                );
            }
            SessionTransition::Switched { from, to } => {
                tracing::info!(from = %from.user_id, to = %to.user_id, "session switched");
                self.notes.unbind();
                self.notes.bind(&to.user_id);
                self.activity
                    .log_activity(LogLevel::Info, &format!("Welcome, {}", to.display_name()));
            }
            SessionTransition::Ended(identity) => {
                tracing::info!(user_id = %identity.user_id, "session ended");
                self.notes.unbind();
                self.activity.log_activity(LogLevel::Info, "Signed out");
            }
        }
    }

    fn check_credentials(
        &mut self,
        email: &str,
        password: &str,
        min_password_len: usize,
    ) -> Result<String, UiError> {
        validate_credentials(email, password, min_password_len)
            .map_err(|err| self.record_error(err.into()))
    }

    fn finish_auth(
        &mut self,
        action: &str,
        generation: u64,
        result: Result<Identity, api::AuthError>,
    ) -> Result<Identity, UiError> {
        if let Ok(identity) = &result {
            // An explicit sign-in takes the user back after an unconfirmed sign-out.
            if self.abandoned.as_deref() == Some(identity.user_id.as_str()) {
                self.abandoned = None;
            }
        }
        self.pump();

        match result {
            Ok(identity) => {
                // The provider may already have ended or replaced this session.
                let current = self
                    .session
                    .current()
                    .is_some_and(|s| s.user_id == identity.user_id);
                if current {
                    self.last_error = None;
                    self.activity.log_activity(
                        LogLevel::Success,
                        &format!("{action} as {}", identity.display_name()),
                    );
                } else {
                    tracing::debug!(user_id = %identity.user_id, "{action} outlived its session");
                }
                Ok(identity)
            }
            Err(err) => {
                tracing::warn!(error = %err, "{action} failed");
                let err = UiError::from(err);
                if self.session.generation() != generation {
                    tracing::debug!("session changed during {action}, dropping error");
                    Err(err)
                } else {
                    Err(self.record_error(err))
                }
            }
        }
    }

    fn record_error(&mut self, err: UiError) -> UiError {
        self.activity.log_activity(LogLevel::Error, &err.to_string());
        self.last_error = Some(err.clone());
        err
    }
}
