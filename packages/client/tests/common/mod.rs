#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use api::{AuthError, AuthGateway, Identity, SessionListener};
use store::{Note, NoteRepository, SnapshotListener, StoreError, SubscriptionHandle, SubscriptionId};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn identity(user_id: &str) -> Identity {
    Identity::new(user_id, format!("{user_id}@example.com"))
}

pub fn note(id: &str, text: &str, owner: &str) -> Note {
    Note {
        id: id.to_string(),
        text: text.to_string(),
        owner_id: owner.to_string(),
        created_at: None,
    }
}

struct Feed {
    owner_id: String,
    listener: Arc<SnapshotListener>,
    active: Arc<AtomicBool>,
}

type CreateHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct RepoState {
    feeds: Vec<Feed>,
    creates: Vec<(String, String)>,
    teardowns: usize,
    during_create: Option<CreateHook>,
    reject_creates: Option<String>,
}

/// Repository whose deliveries are driven by the test, including late
/// deliveries on feeds that were already unsubscribed.
#[derive(Clone, Default)]
pub struct ScriptedRepository {
    state: Arc<Mutex<RepoState>>,
}

impl ScriptedRepository {
    pub fn feed_count(&self) -> usize {
        self.state.lock().unwrap().feeds.len()
    }

    pub fn feed_owner(&self, feed: usize) -> String {
        self.state.lock().unwrap().feeds[feed].owner_id.clone()
    }

    pub fn is_active(&self, feed: usize) -> bool {
        self.state.lock().unwrap().feeds[feed].active.load(Ordering::SeqCst)
    }

    /// Invoke a feed's listener whether or not it was unsubscribed.
    pub fn deliver(&self, feed: usize, notes: Vec<Note>) {
        let listener = self.state.lock().unwrap().feeds[feed].listener.clone();
        listener(notes);
    }

    pub fn create_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().creates.clone()
    }

    pub fn teardowns(&self) -> usize {
        self.state.lock().unwrap().teardowns
    }

    /// Run `hook` while a `create` is in flight, before it completes.
    pub fn during_create(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.state.lock().unwrap().during_create = Some(Arc::new(hook));
    }

    pub fn reject_creates(&self, reason: &str) {
        self.state.lock().unwrap().reject_creates = Some(reason.to_string());
    }
}

impl NoteRepository for ScriptedRepository {
    async fn create(&self, owner_id: &str, text: &str) -> Result<Note, StoreError> {
        let (hook, rejection, count) = {
            let mut state = self.state.lock().unwrap();
            state.creates.push((owner_id.to_string(), text.to_string()));
            (
                state.during_create.clone(),
                state.reject_creates.clone(),
                state.creates.len(),
            )
        };
        if let Some(hook) = hook {
            hook();
        }
        match rejection {
            Some(reason) => Err(StoreError::WriteRejected(reason)),
            None => Ok(note(&format!("created-{count}"), text, owner_id)),
        }
    }

    fn subscribe(&self, owner_id: &str, on_snapshot: SnapshotListener) -> SubscriptionHandle {
        let active = Arc::new(AtomicBool::new(true));
        self.state.lock().unwrap().feeds.push(Feed {
            owner_id: owner_id.to_string(),
            listener: Arc::new(on_snapshot),
            active: active.clone(),
        });

        let state = self.state.clone();
        SubscriptionHandle::new(SubscriptionId::next(), move || {
            active.store(false, Ordering::SeqCst);
            state.lock().unwrap().teardowns += 1;
        })
    }
}

#[derive(Default)]
struct AuthState {
    listener: Option<(SubscriptionId, Arc<SessionListener>)>,
    registrations: usize,
    fail_sign_out: bool,
    sign_out_calls: usize,
    reject_sign_in: Option<Option<Identity>>,
}

/// Gateway whose session notifications are pushed by the test.
#[derive(Clone, Default)]
pub struct ScriptedAuth {
    state: Arc<Mutex<AuthState>>,
}

impl ScriptedAuth {
    pub fn notify(&self, session: Option<Identity>) {
        let listener = self
            .state
            .lock()
            .unwrap()
            .listener
            .as_ref()
            .map(|(_, l)| l.clone());
        if let Some(listener) = listener {
            listener(session);
        }
    }

    pub fn fail_sign_out(&self) {
        self.state.lock().unwrap().fail_sign_out = true;
    }

    /// Make the next sign-in fail after the provider has pushed `meanwhile`.
    pub fn reject_sign_in_after(&self, meanwhile: Option<Identity>) {
        self.state.lock().unwrap().reject_sign_in = Some(meanwhile);
    }

    pub fn registrations(&self) -> usize {
        self.state.lock().unwrap().registrations
    }

    pub fn sign_out_calls(&self) -> usize {
        self.state.lock().unwrap().sign_out_calls
    }

    pub fn has_listener(&self) -> bool {
        self.state.lock().unwrap().listener.is_some()
    }
}

impl AuthGateway for ScriptedAuth {
    async fn register(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        let identity = Identity::new(format!("uid:{email}"), email);
        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity, AuthError> {
        let rejection = self.state.lock().unwrap().reject_sign_in.take();
        if let Some(meanwhile) = rejection {
            self.notify(meanwhile);
            return Err(AuthError::InvalidCredentials);
        }
        let identity = Identity::new(format!("uid:{email}"), email);
        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let fail = {
            let mut state = self.state.lock().unwrap();
            state.sign_out_calls += 1;
            state.fail_sign_out
        };
        if fail {
            return Err(AuthError::ProviderUnavailable("connection reset".to_string()));
        }
        self.notify(None);
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> SubscriptionHandle {
        let id = SubscriptionId::next();
        {
            let mut state = self.state.lock().unwrap();
            state.listener = Some((id, Arc::new(listener)));
            state.registrations += 1;
        }
        let state = self.state.clone();
        SubscriptionHandle::new(id, move || {
            let mut state = state.lock().unwrap();
            if state.listener.as_ref().is_some_and(|(current, _)| *current == id) {
                state.listener = None;
            }
        })
    }
}
