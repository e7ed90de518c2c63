// Integration tests for the lesson run and its execution history

use ptrlab::interpreter::constants::MAX_FRAME_SLOTS;
use ptrlab::interpreter::engine::Interpreter;
use ptrlab::interpreter::errors::{InvalidReason, RuntimeError};
use ptrlab::lesson::source::line_of;
use ptrlab::lesson::{Input, LessonOptions};

fn run_lesson(input: &str, trigger_fault: bool) -> (Interpreter, Result<(), RuntimeError>) {
    let mut interpreter = Interpreter::new(LessonOptions {
        trigger_fault,
        ..LessonOptions::default()
    });
    let result = interpreter.run(Input::Text(input.to_string()));
    (interpreter, result)
}

#[test]
fn test_lesson_output() {
    let (interpreter, result) = run_lesson("7", false);
    assert!(result.is_ok(), "Lesson failed: {:?}", result);
    assert!(interpreter.is_finished());
    assert!(interpreter.error_state().is_none());

    let text = interpreter.console().text();
    for expected in [
        "a = 10 lives at 0x",
        "b = 3.141593 lives at 0x",
        "new value of a: 12\n",
        "read through pt1: 12\n",
        "pt3 is not initialized\n",
        "distance between u and v: 31.56",
        "before swap: x = 42, y = 24\n",
        "after swap: x = 24, y = 42\n",
        "(expired)\n",
        "global: 101\n",
        "a through a double pointer: 12\n",
        "Enter a number: 7\n",
        "you entered 7\n",
    ] {
        assert!(text.contains(expected), "Missing '{}' in:\n{}", expected, text);
    }
    assert!(!text.contains("dangling points at"));
}

#[test]
fn test_prompt_and_answer_share_a_row() {
    let (interpreter, _) = run_lesson("7", false);
    let rows = interpreter.console().get_output();
    assert!(rows.contains(&"Enter a number: 7".to_string()), "{:?}", rows);
    assert!(!rows.contains(&"7".to_string()));

    let mut typed: &[u8] = b"15\n";
    let mut interpreter = Interpreter::new(LessonOptions::default());
    interpreter.run(Input::Reader(&mut typed)).unwrap();
    assert!(interpreter
        .console()
        .get_output()
        .contains(&"Enter a number: 15".to_string()));
}

#[test]
fn test_main_fits_its_frame_addresses() {
    let (mut interpreter, _) = run_lesson("7", false);
    interpreter.step_backward().unwrap();
    let slots = interpreter.memory().stack().arena(0).unwrap().slots().len();
    assert!(slots as u64 <= MAX_FRAME_SLOTS, "main uses {} slots", slots);
}

#[test]
fn test_main_returns() {
    let (interpreter, _) = run_lesson("7", false);
    assert!(interpreter.memory().stack().is_empty());
    assert_eq!(interpreter.current_location().line, line_of("return 0;").unwrap());
}

#[test]
fn test_unparseable_input_keeps_value() {
    let (interpreter, result) = run_lesson("abc", false);
    assert!(result.is_ok());

    let text = interpreter.console().text();
    assert!(text.contains("(no number read, a keeps its value)"));
    assert!(text.contains("you entered 12\n"));
}

#[test]
fn test_reader_input() {
    let mut typed: &[u8] = b"  15\n";
    let mut interpreter = Interpreter::new(LessonOptions::default());
    interpreter.run(Input::Reader(&mut typed)).unwrap();

    let text = interpreter.console().text();
    assert!(text.contains("Enter a number:   15\n"));
    assert!(text.contains("you entered 15\n"));
}

#[test]
fn test_reader_at_eof() {
    let mut typed: &[u8] = b"";
    let mut interpreter = Interpreter::new(LessonOptions::default());
    interpreter.run(Input::Reader(&mut typed)).unwrap();

    assert!(interpreter.console().text().contains("you entered 12\n"));
}

#[test]
fn test_fault_stops_at_dangling_dereference() {
    let (interpreter, result) = run_lesson("7", true);

    let error = result.unwrap_err();
    assert!(error.is_invalid_reference());
    match &error {
        RuntimeError::InvalidReference {
            alias: Some(_),
            reason: InvalidReason::Expired { .. },
        } => {}
        other => panic!("Expected an expired alias, got {:?}", other),
    }

    let state = interpreter.error_state().unwrap();
    assert_eq!(state.error, error);
    assert_eq!(state.location.line, line_of("*dangling);").unwrap());
    assert!(interpreter.at_error());

    // The output before the fault is complete, main never returned
    let text = interpreter.console().text();
    assert!(text.contains("you entered 7\n"));
    assert!(!text.contains("dangling points at"));
    assert_eq!(interpreter.memory().stack().depth(), 1);
}

#[test]
fn test_fault_is_snapshotted() {
    let (clean, _) = run_lesson("7", false);
    let (faulted, _) = run_lesson("7", true);

    // One extra step for the faulting dereference
    assert_eq!(faulted.total_snapshots(), clean.total_snapshots() + 1);
}

#[test]
fn test_history_navigation() {
    let (mut interpreter, _) = run_lesson("7", false);
    let total = interpreter.total_snapshots();
    assert_eq!(interpreter.history_position(), total - 1);
    assert!(interpreter.step_forward().is_err());

    interpreter.step_backward().unwrap();
    assert_eq!(interpreter.history_position(), total - 2);
    assert_eq!(
        interpreter.current_location().line,
        line_of("you entered").unwrap()
    );
    let a = interpreter.memory().address_of::<i32>("a").unwrap();
    assert_eq!(interpreter.memory().read(a).unwrap(), 7);

    interpreter.rewind_to_start().unwrap();
    assert_eq!(interpreter.history_position(), 0);
    assert!(interpreter.memory().stack().is_empty());
    assert!(interpreter.console().text().is_empty());
    assert!(interpreter.step_backward().is_err());

    interpreter.step_forward().unwrap();
    assert_eq!(interpreter.history_position(), 1);
    assert_eq!(interpreter.memory().stack().depth(), 1);

    interpreter.jump_to_end().unwrap();
    assert_eq!(interpreter.history_position(), total - 1);
    assert!(interpreter.console().text().contains("you entered 7\n"));
}

#[test]
fn test_history_keeps_dangling_contents_visible() {
    let (mut interpreter, _) = run_lesson("7", false);
    while interpreter.current_location().line != line_of("dangling = %p").unwrap() {
        interpreter.step_backward().unwrap();
    }

    // The returned frame's arena still holds the stale local
    let arena = interpreter.memory().stack().arena(1).unwrap();
    let stale = &arena.slots()[0];
    assert_eq!(stale.name, "local");
    assert!(!stale.is_live());
}

#[test]
fn test_global_survives_the_lesson() {
    let (interpreter, _) = run_lesson("7", false);
    let global = interpreter.memory().global::<i32>("global_value").unwrap();
    assert_eq!(interpreter.memory().read(global).unwrap(), 101);
}

#[test]
fn test_snapshot_limit_stops_run() {
    let mut interpreter = Interpreter::new(LessonOptions {
        snapshot_limit: 256,
        ..LessonOptions::default()
    });
    let result = interpreter.run(Input::Text("7".to_string()));
    assert!(matches!(
        result,
        Err(RuntimeError::SnapshotLimitExceeded { limit: 256, .. })
    ));
}
