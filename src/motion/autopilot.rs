/// Result of one autopilot frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AutopilotStep {
    /// No target, or nothing to move along.
    Idle,
    Moving,
    /// Progress snapped onto the target this frame.
    Arrived,
}

/// Eases a progress value toward a target at a fixed world-space speed.
///
/// The autopilot holds no target of its own; the caller passes the current
/// target every frame and `None` means idle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Autopilot {
    /// World units per second.
    pub speed: f32,
    /// Distance under which progress snaps onto the target.
    pub snap_distance: f32,
}

impl Autopilot {
    pub const fn new(speed: f32, snap_distance: f32) -> Self {
        Self {
            speed,
            snap_distance,
        }
    }

    /// Advances `progress` toward `target` for a frame of `dt` seconds.
    ///
    /// Never overshoots: a step that would pass the target lands on it.
    pub fn step(
        &self,
        progress: &mut f32,
        target: Option<f32>,
        curve_length: f32,
        dt: f32,
    ) -> AutopilotStep {
        let target = match target {
            Some(t) if curve_length > 0.0 => t,
            _ => return AutopilotStep::Idle,
        };

        let diff = target - *progress;
        let t_snap = self.snap_distance / curve_length;

        if diff.abs() < t_snap {
            *progress = target;
            return AutopilotStep::Arrived;
        }

        let t_speed = self.speed / curve_length;
        let step = diff.signum() * t_speed * dt.max(0.0);

        let next = *progress + step;
        // A step that reaches or crosses the target lands on it
        *progress = if (target - next) * diff <= 0.0 {
            target
        } else {
            next
        };

        AutopilotStep::Moving
    }
}
