use scene_ngin::{
    DeviceEvent, WindowEvent,
    input::{InputState, Key},
};
use winit::keyboard::KeyCode;

#[test]
fn key_codes_map_to_scene_keys() {
    assert_eq!(Key::from_key_code(KeyCode::KeyW), Some(Key::W));
    assert_eq!(Key::from_key_code(KeyCode::KeyA), Some(Key::A));
    assert_eq!(Key::from_key_code(KeyCode::KeyS), Some(Key::S));
    assert_eq!(Key::from_key_code(KeyCode::KeyD), Some(Key::D));
    assert_eq!(Key::from_key_code(KeyCode::KeyQ), Some(Key::Q));
    assert_eq!(Key::from_key_code(KeyCode::KeyE), Some(Key::E));
    assert_eq!(Key::from_key_code(KeyCode::KeyP), Some(Key::P));
    assert_eq!(Key::from_key_code(KeyCode::Escape), Some(Key::Escape));
    assert_eq!(Key::from_key_code(KeyCode::KeyZ), None);
    assert_eq!(Key::from_key_code(KeyCode::Space), None);
}

#[test]
fn keys_stay_down_until_released() {
    let mut input = InputState::new();
    input.press(Key::W);
    input.press(Key::W);
    assert!(input.is_down(Key::W));
    assert!(!input.is_down(Key::S));

    input.release(Key::W);
    assert!(!input.is_down(Key::W));
}

#[test]
fn escape_or_close_request_ends_the_loop() {
    let mut input = InputState::new();
    assert!(!input.should_close());

    input.press(Key::Escape);
    assert!(input.should_close());
    input.release(Key::Escape);
    assert!(!input.should_close());

    assert!(input.handle_window_event(&WindowEvent::CloseRequested));
    assert!(input.should_close());
}

#[test]
fn unrelated_window_events_are_ignored() {
    let mut input = InputState::new();
    assert!(!input.handle_window_event(&WindowEvent::Focused(true)));
    assert!(!input.handle_window_event(&WindowEvent::RedrawRequested));
    assert!(!input.should_close());
}

#[test]
fn raw_motion_accumulates_into_a_virtual_cursor() {
    let mut input = InputState::new();
    input.push_motion(1.0, 2.0);
    input.push_motion(3.0, 4.0);
    assert_eq!(input.take_cursor_samples(), vec![(1.0, 2.0), (4.0, 6.0)]);
    assert!(input.take_cursor_samples().is_empty());

    // The virtual cursor keeps its position across frames.
    assert!(input.handle_device_event(&DeviceEvent::MouseMotion { delta: (-4.0, 0.0) }));
    assert_eq!(input.take_cursor_samples(), vec![(0.0, 6.0)]);
}

#[test]
fn other_device_events_are_ignored() {
    let mut input = InputState::new();
    assert!(!input.handle_device_event(&DeviceEvent::Added));
    assert!(input.take_cursor_samples().is_empty());
}

#[test]
fn scroll_accumulates_until_taken() {
    let mut input = InputState::new();
    input.push_scroll(1.0);
    input.push_scroll(-3.0);
    assert_eq!(input.take_scroll(), -2.0);
    assert_eq!(input.take_scroll(), 0.0);
}
