//! Gesture detection over synthetic faces

mod test_helpers;

use headmouse::{
    constants::{LEFT_EYE_POINTS, RIGHT_EYE_POINTS},
    gesture_detector::{eye_aspect_ratio, GestureDetector, GestureThresholds, PrimaryEye},
};
use proptest::prelude::*;
use test_helpers::{FaceBuilder, CLOSED_EYE, OPEN_EYE};

fn detector(consec_frames: u32) -> GestureDetector {
    let thresholds = GestureThresholds {
        ear_consec_frames: consec_frames,
        ..GestureThresholds::default()
    };
    GestureDetector::new(&thresholds, PrimaryEye::Right, true)
}

#[test]
fn test_synthetic_eye_ratios() {
    let landmarks = FaceBuilder::at(300, 200).right_closed().landmarks();
    let right = eye_aspect_ratio(&landmarks.eye(RIGHT_EYE_POINTS).unwrap());
    let left = eye_aspect_ratio(&landmarks.eye(LEFT_EYE_POINTS).unwrap());
    assert!((right - f64::from(CLOSED_EYE) / 30.0).abs() < 1e-9);
    assert!((left - f64::from(OPEN_EYE) / 30.0).abs() < 1e-9);
}

#[test]
fn test_threshold_change_keeps_counter() {
    let mut detector = detector(3);
    let closed = FaceBuilder::at(300, 200).right_closed().landmarks();
    let open = FaceBuilder::at(300, 200).landmarks();

    detector.process(&closed).unwrap();
    detector.process(&closed).unwrap();
    let relaxed = GestureThresholds {
        ear_consec_frames: 2,
        ..GestureThresholds::default()
    };
    detector.set_thresholds(&relaxed);
    assert!(detector.process(&open).unwrap().wink_right);
}

#[test]
fn test_primary_eye_switch_restarts_counters() {
    let mut detector = detector(2);
    let closed = FaceBuilder::at(300, 200).right_closed().landmarks();
    let open = FaceBuilder::at(300, 200).landmarks();

    detector.process(&closed).unwrap();
    detector.process(&closed).unwrap();
    detector.set_primary_eye(PrimaryEye::Left);
    let events = detector.process(&open).unwrap();
    assert!(!events.any());
    assert_eq!(detector.primary_eye(), PrimaryEye::Left);
}

#[test]
fn test_mouth_baseline_follows_head() {
    let mut detector = detector(2);
    // The whole face translating must not look like a twitch
    for offset in 0..20 {
        let landmarks = FaceBuilder::at(300 + offset * 3, 200 - offset).landmarks();
        assert!(!detector.process(&landmarks).unwrap().mouth_twitch);
    }
}

#[test]
fn test_disabling_mouth_forgets_baseline() {
    let mut detector = detector(2);
    detector.process(&FaceBuilder::at(300, 200).landmarks()).unwrap();
    detector.set_mouth_enabled(false);
    assert!(!detector.mouth_enabled());
    detector.set_mouth_enabled(true);

    // First frame after re-enabling records a new baseline
    let shifted = FaceBuilder::at(300, 200).mouth_shift(8, 0).landmarks();
    assert!(!detector.process(&shifted).unwrap().mouth_twitch);
    assert!(!detector.process(&shifted).unwrap().mouth_twitch);
}

proptest! {
    #[test]
    fn prop_wink_needs_enough_closed_frames(closed_frames in 0..8u32, consec in 1..5u32) {
        let mut detector = detector(consec);
        let closed = FaceBuilder::at(300, 200).right_closed().landmarks();
        let open = FaceBuilder::at(300, 200).landmarks();

        for _ in 0..closed_frames {
            prop_assert!(!detector.process(&closed).unwrap().wink_right);
        }
        let events = detector.process(&open).unwrap();
        prop_assert_eq!(events.wink_right, closed_frames >= consec);
        prop_assert!(!events.wink_left);
    }

    #[test]
    fn prop_left_wink_suppressed_by_right(frames in 2..6u32) {
        let mut detector = detector(2);
        let both = FaceBuilder::at(300, 200).right_closed().left_closed().landmarks();
        let open = FaceBuilder::at(300, 200).landmarks();

        for _ in 0..frames {
            detector.process(&both).unwrap();
        }
        let events = detector.process(&open).unwrap();
        prop_assert!(events.wink_right);
        prop_assert!(!events.wink_left);
    }
}
