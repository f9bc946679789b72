use std::collections::HashSet;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const NONE   = 0;
        const LEFT   = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT  = 1 << 2;
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        MouseButtons::empty()
    }
}

impl MouseButtons {
    /// Maps a 1-based button number (1 = left, 2 = middle, 3 = right).
    pub fn from_button_number(which: u16) -> Self {
        match which {
            1 => MouseButtons::LEFT,
            2 => MouseButtons::MIDDLE,
            3 => MouseButtons::RIGHT,
            _ => MouseButtons::NONE,
        }
    }
}

/// Ambient input state. The windowing layer writes it through the
/// `on_*` methods; scripts read it during the frame.
#[derive(Default, Debug, Clone)]
pub struct InputState {
    pub mouse_position: (f32, f32),
    pub mouse_previous: (f32, f32),
    pub mouse_buttons: MouseButtons,
    pub mouse_scroll: f32,
    pub mouse_previous_scroll: f32,

    pub pressed_keys: HashSet<u32>,

    // Multitouch not supported, only the latest touch is tracked
    pub touch: Option<(f32, f32)>,
    pub touch_previous: Option<(f32, f32)>,

    /// Acceleration including gravity
    pub acceleration: (f32, f32, f32),
    /// Heading in radians derived from device orientation
    pub compass_angle: f32,
}

impl InputState {
    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        // Previous position rolls over in end_frame, not here, because
        // events arrive out of step with the animation loop.
        self.mouse_position = (x, y);
    }

    pub fn on_mouse_down(&mut self, which: u16) {
        self.mouse_buttons = MouseButtons::from_button_number(which);
    }

    pub fn on_mouse_up(&mut self) {
        self.mouse_buttons = MouseButtons::NONE;
    }

    /// Wheel deltas come in multiples of 120 per notch.
    pub fn on_mouse_wheel(&mut self, delta: f32) {
        self.mouse_scroll += delta / 120.0;
    }

    pub fn on_key_down(&mut self, key: u32) {
        self.pressed_keys.insert(key);
    }

    pub fn on_key_up(&mut self, key: u32) {
        self.pressed_keys.remove(&key);
    }

    pub fn is_pressed(&self, key: u32) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn on_touch(&mut self, x: f32, y: f32) {
        self.touch = Some((x, y));
    }

    pub fn on_touch_end(&mut self) {
        self.touch = None;
    }

    pub fn on_motion(&mut self, x: f32, y: f32, z: f32) {
        self.acceleration = (x, y, z);
    }

    /// `alpha` is the device orientation in degrees. With an absolute
    /// compass heading available the sign convention flips.
    pub fn on_orientation(&mut self, alpha: f32, has_compass_heading: bool) {
        let degrees = if has_compass_heading {
            alpha - 90.0
        } else {
            -90.0 - alpha
        };
        self.compass_angle = degrees.to_radians();
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        (
            self.mouse_position.0 - self.mouse_previous.0,
            self.mouse_position.1 - self.mouse_previous.1,
        )
    }

    pub fn scroll_delta(&self) -> f32 {
        self.mouse_scroll - self.mouse_previous_scroll
    }

    /// Rolls current values into the previous slots. Called once per
    /// animation tick after scripts ran.
    pub fn end_frame(&mut self) {
        self.mouse_previous = self.mouse_position;
        self.mouse_previous_scroll = self.mouse_scroll;
        self.touch_previous = self.touch;
    }
}
