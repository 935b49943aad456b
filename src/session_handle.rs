//! Process-wide session handle.
//!
//! Only one session may own the capture device at a time. Callers either
//! [`acquire`] the active session (creating it if none exists) or
//! [`create`] a fresh one, which fails while another is live.

use crate::{session::Session, Error, Result};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, lockable session
pub type SharedSession = Arc<Mutex<Session>>;

static ACTIVE_SESSION: Mutex<Option<SharedSession>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<SharedSession>> {
    ACTIVE_SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Return the active session, building one with `init` if there is none
///
/// `init` only runs when no session is active, and runs under the handle
/// lock, so it must not call back into this module.
///
/// # Errors
///
/// Returns whatever `init` fails with
pub fn acquire<F>(init: F) -> Result<SharedSession>
where
    F: FnOnce() -> Result<Session>,
{
    let mut active = slot();
    if let Some(existing) = active.as_ref() {
        debug!("Reusing active session");
        return Ok(Arc::clone(existing));
    }
    let session = Arc::new(Mutex::new(init()?));
    *active = Some(Arc::clone(&session));
    info!("Session created");
    Ok(session)
}

/// Build a new session with `init` and make it the active one
///
/// # Errors
///
/// Returns [`Error::SessionActive`] if a session is already live, or
/// whatever `init` fails with
pub fn create<F>(init: F) -> Result<SharedSession>
where
    F: FnOnce() -> Result<Session>,
{
    let mut active = slot();
    if active.is_some() {
        return Err(Error::SessionActive);
    }
    let session = Arc::new(Mutex::new(init()?));
    *active = Some(Arc::clone(&session));
    info!("Session created");
    Ok(session)
}

/// The active session, if any
#[must_use]
pub fn current() -> Option<SharedSession> {
    slot().clone()
}

/// Whether a session is live
#[must_use]
pub fn is_active() -> bool {
    slot().is_some()
}

/// Quit and forget the active session; returns false if there was none
///
/// Clones handed out earlier keep the session object alive, but its
/// provider is released here.
pub fn release() -> bool {
    let Some(session) = slot().take() else {
        return false;
    };
    session.lock().unwrap_or_else(PoisonError::into_inner).quit();
    info!("Session released");
    true
}
