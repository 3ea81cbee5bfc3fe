//! Integration tests for a full input session.
//!
//! These tests drive `InputService` the way the transport does (raw pointer
//! tuples and encoded key messages) and check what reaches the recording
//! host and the synthetic UI tree. Timing tests run on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};
use touchbridge_agent::application::host::{
    AccessibilityTree, AutomationHost, GlobalAction, UiExecutor, UiJob,
};
use touchbridge_agent::application::input_service::{InputError, InputService};
use touchbridge_agent::application::session::SessionConfig;
use touchbridge_agent::infrastructure::host::mock::RecordingHost;
use touchbridge_agent::infrastructure::replay::{parse_script, replay};
use touchbridge_agent::infrastructure::scratch_editor::OffscreenEditor;
use touchbridge_agent::infrastructure::storage::config::AgentConfig;
use touchbridge_agent::infrastructure::ui_tree::mock::{SyntheticNode, SyntheticTree};
use touchbridge_core::protocol::messages::{
    PointerKind, MASK_MOVE, MASK_PRIMARY_DOWN, MASK_PRIMARY_MOVE, MASK_PRIMARY_UP, MASK_SCROLL_DOWN,
    MASK_SECONDARY_UP, MASK_WHEEL_BUTTON_DOWN, MASK_WHEEL_BUTTON_UP, TOUCH_PAN_END, TOUCH_PAN_START,
    TOUCH_PAN_UPDATE,
};
use touchbridge_core::{encode_key_message, KeyEventMessage, KeyboardMode, Point};

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// Runs UI jobs inline so paused-clock tests never wait on another thread.
struct InlineExecutor;

impl UiExecutor for InlineExecutor {
    fn execute(&self, job: UiJob) -> bool {
        job();
        true
    }
}

fn service(host: &Arc<RecordingHost>, tree: SyntheticTree, session: SessionConfig) -> InputService {
    InputService::new(
        Arc::clone(host) as Arc<dyn AutomationHost>,
        Arc::new(tree) as Arc<dyn AccessibilityTree>,
        Box::new(OffscreenEditor::new()),
        Arc::new(InlineExecutor),
        session,
    )
}

fn mouse(svc: &InputService, mask: i32, x: i32, y: i32) {
    assert_ok!(svc.handle_pointer(PointerKind::Mouse, mask, x, y, None));
}

fn touch(svc: &InputService, mask: i32, x: i32, y: i32) {
    assert_ok!(svc.handle_pointer(PointerKind::Touch, mask, x, y, None));
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ── Gestures ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_drag_becomes_one_stroke_with_real_duration() {
    // Arrange
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    // Act
    mouse(&svc, MASK_PRIMARY_DOWN, 100, 400);
    advance(30).await;
    mouse(&svc, MASK_PRIMARY_MOVE, 100, 300);
    advance(20).await;
    mouse(&svc, MASK_PRIMARY_UP, 100, 200);

    // Assert
    let strokes = host.gestures();
    assert_eq!(strokes.len(), 1);
    assert_eq!(
        strokes[0].points(),
        &[Point::new(100, 400), Point::new(100, 300), Point::new(100, 200)]
    );
    assert_eq!(strokes[0].duration(), Duration::from_millis(50));
    assert_eq!(strokes[0].start_offset(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_held_button_becomes_long_press_and_late_up_is_ignored() {
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    mouse(&svc, MASK_PRIMARY_DOWN, 50, 60);
    advance(900).await;
    mouse(&svc, MASK_PRIMARY_UP, 50, 60);

    let strokes = host.gestures();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].duration(), Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn test_plain_moves_never_dispatch() {
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    for x in 0..20 {
        mouse(&svc, MASK_MOVE, x * 10, 500);
    }
    advance(1000).await;

    assert!(host.gestures().is_empty());
    assert_eq!(svc.gestures().position(), Point::new(190, 500));
}

#[tokio::test(start_paused = true)]
async fn test_touch_pan_moves_opposite_to_delta() {
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    touch(&svc, TOUCH_PAN_START, 200, 200);
    advance(10).await;
    touch(&svc, TOUCH_PAN_UPDATE, 0, 50);
    touch(&svc, TOUCH_PAN_END, 200, 200);

    let strokes = host.gestures();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].end(), Point::new(200, 150));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_buttons() {
    // Arrange
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    // Act: back, quick wheel click (home), held wheel button (recents)
    mouse(&svc, MASK_SECONDARY_UP, 0, 0);
    mouse(&svc, MASK_WHEEL_BUTTON_DOWN, 0, 0);
    advance(50).await;
    mouse(&svc, MASK_WHEEL_BUTTON_UP, 0, 0);
    mouse(&svc, MASK_WHEEL_BUTTON_DOWN, 0, 0);
    advance(250).await;
    mouse(&svc, MASK_WHEEL_BUTTON_UP, 0, 0);

    // Assert
    assert_eq!(
        host.actions(),
        vec![GlobalAction::Back, GlobalAction::Home, GlobalAction::Recents]
    );
}

#[tokio::test(start_paused = true)]
async fn test_wheel_burst_is_paced_and_never_overlaps() {
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    mouse(&svc, MASK_MOVE, 300, 800);
    for _ in 0..4 {
        mouse(&svc, MASK_SCROLL_DOWN, 300, 800);
    }
    advance(1000).await;

    let records = host.gesture_records();
    assert_eq!(records.len(), 4);
    for pair in records.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_millis(60));
    }
    assert!(records.iter().all(|r| r.stroke.end() == Point::new(300, 680)));
}

#[tokio::test(start_paused = true)]
async fn test_configured_scale_applies_to_pointer_coordinates() {
    // Arrange
    let config: AgentConfig = toml::from_str("[session]\nscale = 2\n").unwrap();
    let host = Arc::new(RecordingHost::new());
    let svc = service(&host, SyntheticTree::new(), config.session());

    // Act
    mouse(&svc, MASK_PRIMARY_DOWN, 10, 20);
    advance(5).await;
    mouse(&svc, MASK_PRIMARY_UP, 10, 20);

    // Assert
    assert_eq!(host.gestures()[0].start(), Point::new(20, 40));
}

// ── Keys and text ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_typing_without_input_connection_edits_focused_field() {
    // Arrange
    let host = Arc::new(RecordingHost::new());
    let field = SyntheticNode::new(3).editable().text("").selection(0, 0).build();
    let svc = service(
        &host,
        SyntheticTree::new().input_focus(Arc::clone(&field)),
        SessionConfig::default(),
    );

    // Act: "hé" in Legacy mode, then a backspace press
    for ch in ['h', 'é'] {
        let mut msg = KeyEventMessage::new(KeyboardMode::Legacy);
        msg.down = true;
        msg.chr = Some(ch as u32);
        assert_ok!(svc.handle_key(&encode_key_message(&msg)));
    }
    let mut backspace = KeyEventMessage::new(KeyboardMode::Translate);
    backspace.press = true;
    backspace.control_key = Some(touchbridge_core::ControlKey::Backspace);
    assert_ok!(svc.handle_key(&encode_key_message(&backspace)));
    svc.flush_ui().await;

    // Assert
    assert_eq!(field.current_text().as_deref(), Some("h"));
    assert_eq!(field.current_selection(), (1, 1));
}

#[tokio::test]
async fn test_bad_inputs_are_rejected_and_later_inputs_still_work() {
    let host = Arc::new(RecordingHost::with_input_connection());
    let svc = service(&host, SyntheticTree::new(), SessionConfig::default());

    let err = assert_err!(svc.handle_key(&[0xFF]));
    assert!(matches!(err, InputError::Protocol(_)));
    assert_err!(svc.handle_pointer(PointerKind::Touch, 99, 0, 0, None));

    let mut msg = KeyEventMessage::new(KeyboardMode::Sequence);
    msg.press = true;
    msg.seq = Some("ok".to_string());
    assert_ok!(svc.handle_key(&encode_key_message(&msg)));

    assert_eq!(host.connection().unwrap().commits(), vec!["ok".to_string()]);
}

// ── Replay ────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_replay_script_drives_the_whole_session() {
    // Arrange
    let script = r#"
{"pointer":{"kind":"mouse","mask":9,"x":100,"y":900}}
{"wait":{"ms":40}}
{"pointer":{"kind":"mouse","mask":10,"x":100,"y":500}}
{"key":{"down":false,"press":true,"mode":"sequence","seq":"hi"}}
{"pointer":{"kind":"mouse","mask":37,"x":0,"y":0}}
{"pointer":{"kind":"mouse","mask":38,"x":0,"y":0,"aux":"https://example.com"}}
{"pointer":{"kind":"mouse","mask":12345,"x":0,"y":0}}
"#;
    let steps = parse_script(script).unwrap();
    let host = Arc::new(RecordingHost::new());
    let field = SyntheticNode::new(3).editable().text("").selection(0, 0).build();
    let svc = service(
        &host,
        SyntheticTree::new().input_focus(Arc::clone(&field)),
        SessionConfig::default(),
    );

    // Act
    let summary = replay(&svc, &steps).await;

    // Assert
    assert_eq!(summary.pointer_steps, 5);
    assert_eq!(summary.key_steps, 1);
    assert_eq!(summary.waits, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(host.gestures().len(), 1);
    assert_eq!(host.gestures()[0].duration(), Duration::from_millis(40));
    assert_eq!(field.current_text().as_deref(), Some("hi"));
    assert!(svc.overlay_visible());
    assert_eq!(host.urls(), vec!["https://example.com".to_string()]);
}
