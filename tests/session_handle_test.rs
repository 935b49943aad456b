//! Tests for the process-wide session handle
//!
//! The handle is global, so everything runs inside one test to keep the
//! steps ordered.

mod test_helpers;

use headmouse::{
    config::Config,
    controller::LoggingController,
    session::Session,
    session_handle, Error, Result,
};
use std::sync::Arc;
use test_helpers::{FaceBuilder, ScriptedProvider};

fn build(provider: ScriptedProvider) -> Result<Session> {
    Session::new(Box::new(provider), Box::new(LoggingController::new()), &Config::default())
}

#[test]
fn test_session_handle_lifecycle() {
    assert!(!session_handle::is_active());
    assert!(session_handle::current().is_none());
    assert!(!session_handle::release());

    // A failing constructor leaves no session behind
    let failed = session_handle::acquire(|| Err(Error::CameraUnavailable("no device".to_string())));
    assert!(matches!(failed, Err(Error::CameraUnavailable(_))));
    assert!(!session_handle::is_active());

    let provider = ScriptedProvider::new().face(FaceBuilder::at(200, 100));
    let released = provider.released_flag();
    let first = session_handle::acquire(|| build(provider)).unwrap();

    // Reuse does not run the constructor again
    let second = session_handle::acquire(|| panic!("constructor must not run")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &session_handle::current().unwrap()));

    let duplicate = session_handle::create(|| build(ScriptedProvider::new()));
    assert!(matches!(duplicate, Err(Error::SessionActive)));

    first.lock().unwrap().refresh().unwrap();
    assert!(first.lock().unwrap().is_calibrated());

    assert!(session_handle::release());
    assert!(*released.lock().unwrap());
    assert!(!session_handle::is_active());

    let fresh = session_handle::create(|| build(ScriptedProvider::new())).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert!(!fresh.lock().unwrap().is_calibrated());
    assert!(session_handle::release());
}
