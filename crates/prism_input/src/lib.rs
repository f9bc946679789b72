pub mod physical;

pub use physical::{InputState, MouseButtons};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_reset_after_end_frame() {
        let mut input = InputState::default();
        input.on_mouse_move(10.0, 4.0);
        input.on_mouse_wheel(240.0);

        assert_eq!(input.mouse_delta(), (10.0, 4.0));
        assert_eq!(input.scroll_delta(), 2.0);

        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
        assert_eq!(input.scroll_delta(), 0.0);
    }

    #[test]
    fn keys_and_buttons() {
        let mut input = InputState::default();
        input.on_key_down(87);
        input.on_mouse_down(3);
        assert!(input.is_pressed(87));
        assert_eq!(input.mouse_buttons, MouseButtons::RIGHT);

        input.on_key_up(87);
        input.on_mouse_up();
        assert!(!input.is_pressed(87));
        assert!(input.mouse_buttons.is_empty());
    }

    #[test]
    fn touch_end_clears_position() {
        let mut input = InputState::default();
        input.on_touch(3.0, 5.0);
        input.end_frame();
        input.on_touch_end();
        assert_eq!(input.touch, None);
        assert_eq!(input.touch_previous, Some((3.0, 5.0)));
    }
}
