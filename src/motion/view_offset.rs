/// How far the camera has been pulled back along a branch to read a tall sign.
///
/// Always within `[0, max]`; a negative `max` pins the offset at zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewOffset {
    value: f32,
    max: f32,
    wheel_speed: f32,
    touch_speed: f32,
    touch_y: Option<f32>,
}

impl ViewOffset {
    pub fn new(max: f32, wheel_speed: f32, touch_speed: f32) -> Self {
        Self {
            value: 0.0,
            max,
            wheel_speed,
            touch_speed,
            touch_y: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set_max(&mut self, max: f32) {
        self.max = max;
        self.clamp();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.value -= delta_y * self.wheel_speed;
        self.clamp();
    }

    pub fn touch_start(&mut self, y: f32) {
        self.touch_y = Some(y);
    }

    /// Drag relative to the previous touch position, which then becomes the new start.
    pub fn touch_move(&mut self, y: f32) {
        let Some(start) = self.touch_y else {
            self.touch_y = Some(y);
            return;
        };
        if !y.is_finite() {
            return;
        }
        self.value -= (start - y) * self.touch_speed;
        self.touch_y = Some(y);
        self.clamp();
    }

    pub fn touch_end(&mut self) {
        self.touch_y = None;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
        self.touch_y = None;
    }

    fn clamp(&mut self) {
        self.value = self.value.clamp(0.0, self.max.max(0.0));
    }
}
