//! Keyboard macro tests
//!
//! Recording, replay and the replay tag

mod common;

use common::{calls, dispatcher_with, test_config, test_dispatcher, type_keys, RecordingHost};

use keyseq::dispatch::{Dispatcher, KeyOutcome};
use keyseq::keymap::{token_from_raw, EventTag, KeyEvent, Token};

fn recorded_tokens(d: &Dispatcher<RecordingHost>) -> Vec<Token> {
    d.macro_events()
        .iter()
        .map(|event| token_from_raw(&event.raw))
        .collect()
}

#[test]
fn test_record_and_replay() {
    let (mut d, log) = test_dispatcher();

    assert_eq!(d.handle_token("<f3>"), KeyOutcome::Handled);
    assert!(d.is_recording());
    assert_eq!(d.host().last_status(), Some("Defining Keyboard macro ..."));

    type_keys(&mut d, "j C-x C-s");
    assert_eq!(d.handle_token("<f4>"), KeyOutcome::Handled);
    assert!(!d.is_recording());
    assert_eq!(d.host().last_status(), Some("Keyboard macro defined"));
    assert_eq!(
        recorded_tokens(&d),
        vec![Token::from("j"), Token::from("C-x"), Token::from("C-s")]
    );

    assert_eq!(d.handle_token("<f4>"), KeyOutcome::Handled);
    assert!(d.host().saw_status("Do macro"));
    assert_eq!(
        calls(&log),
        vec!["scroll-down", "save-page", "scroll-down", "save-page"]
    );
    assert!(d.snapshot().is_neutral());
}

#[test]
fn test_replay_can_run_repeatedly() {
    let (mut d, log) = test_dispatcher();

    type_keys(&mut d, "<f3> j <f4> <f4> <f4>");
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(d.macro_events().len(), 1);
}

#[test]
fn test_prefix_argument_is_recorded() {
    let (mut d, log) = test_dispatcher();

    type_keys(&mut d, "<f3> C-u 2 n <f4> <f4>");
    assert_eq!(*log.borrow(), vec![("next-line".to_string(), Some(2)); 4]);
}

#[test]
fn test_no_macro_defined() {
    let (mut d, log) = test_dispatcher();

    assert_eq!(d.handle_token("<f4>"), KeyOutcome::Handled);
    assert_eq!(d.host().last_status(), Some("No macro defined"));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_empty_recording_defines_nothing() {
    let (mut d, _) = test_dispatcher();

    type_keys(&mut d, "<f3> <f4> <f4>");
    assert_eq!(d.host().last_status(), Some("No macro defined"));
}

#[test]
fn test_start_key_while_recording_finishes() {
    let (mut d, _) = test_dispatcher();

    type_keys(&mut d, "<f3> j <f3>");
    assert!(!d.is_recording());
    assert_eq!(d.host().last_status(), Some("Keyboard macro defined"));
    assert_eq!(recorded_tokens(&d), vec![Token::from("j")]);
}

#[test]
fn test_new_recording_replaces_old_macro() {
    let (mut d, log) = test_dispatcher();

    type_keys(&mut d, "<f3> j <f4>");
    type_keys(&mut d, "<f3> n <f4>");
    log.borrow_mut().clear();

    d.handle_token("<f4>");
    assert_eq!(calls(&log), vec!["next-line"]);
}

#[test]
fn test_replayed_events_are_not_recorded() {
    let (mut d, log) = test_dispatcher();

    d.handle_token("<f3>");
    let replayed = KeyEvent::from_token("j", EventTag::Replayed);
    assert_eq!(d.handle_event(&replayed), KeyOutcome::Executed);
    d.handle_token("n");
    d.handle_token("<f4>");

    assert_eq!(recorded_tokens(&d), vec![Token::from("n")]);
    assert_eq!(calls(&log), vec!["scroll-down", "next-line"]);
}

#[test]
fn test_keys_outside_recording_are_not_captured() {
    let (mut d, _) = test_dispatcher();

    type_keys(&mut d, "j n");
    assert!(d.macro_events().is_empty());
}

#[test]
fn test_suspended_keys_are_not_recorded() {
    let (mut d, _) = test_dispatcher();

    type_keys(&mut d, "<f3> j <f2> n <f2> <f4>");
    assert_eq!(recorded_tokens(&d), vec![Token::from("j")]);
}

#[test]
fn test_quit_does_not_stop_recording() {
    let (mut d, _) = test_dispatcher();

    type_keys(&mut d, "<f3> j C-g");
    assert!(d.is_recording());
    type_keys(&mut d, "n <f4>");
    assert_eq!(
        recorded_tokens(&d),
        vec![Token::from("j"), Token::from("C-g"), Token::from("n")]
    );
}

#[test]
fn test_replay_delivers_unbound_keys() {
    let (mut d, log) = dispatcher_with(RecordingHost::editable(), test_config());

    type_keys(&mut d, "<f3>");
    assert_eq!(d.handle_token("x"), KeyOutcome::Unhandled);
    assert_eq!(d.handle_token("C-a"), KeyOutcome::Executed);
    assert_eq!(d.handle_token("y"), KeyOutcome::Unhandled);
    type_keys(&mut d, "<f4>");
    assert!(d.host().delivered.is_empty());

    let stopped = d.host().stopped;
    assert_eq!(d.handle_token("<f4>"), KeyOutcome::Handled);
    assert_eq!(d.host().delivered, vec![Token::from("x"), Token::from("y")]);
    assert_eq!(calls(&log), vec!["beginning-of-line", "beginning-of-line"]);
    // only the replay key and the bound command are claimed
    assert_eq!(d.host().stopped, stopped + 2);
}
