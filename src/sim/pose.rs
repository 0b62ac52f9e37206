use super::math::{Float3, Quaternion};

/// World-space placement of a rigid object: where it is and which way it faces.
///
/// `direction` need not be horizontal; yaw and pitch are derived from it.
/// C-compatible layout for FFI.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
pub struct Pose {
    pub position: Float3,
    pub direction: Float3,
}

impl Pose {
    pub const fn new(position: Float3, direction: Float3) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Pose facing `target` from `position`. Falls back to +Z when they coincide.
    pub fn looking_at(position: Float3, target: Float3) -> Self {
        let direction = (target - position).normalize();
        if direction == Float3::ZERO {
            return Self::new(position, Float3::FORWARD);
        }
        Self::new(position, direction)
    }

    /// Heading around +Y, 0 when facing +Z.
    pub fn yaw(self) -> f32 {
        self.direction.x.atan2(self.direction.z)
    }

    pub fn pitch(self) -> f32 {
        let mag =
            (self.direction.x * self.direction.x + self.direction.z * self.direction.z).sqrt();
        self.direction.y.atan2(mag)
    }

    /// Rotation taking +Z onto `direction` (yaw then pitch, no roll).
    pub fn rotation(self) -> Quaternion {
        let yaw = Quaternion::from_axis_angle(Float3::UP, self.yaw());
        let pitch = Quaternion::from_axis_angle(Float3::RIGHT, -self.pitch());
        yaw * pitch
    }

    /// Same position, facing the opposite way.
    pub fn reversed(self) -> Self {
        Self::new(self.position, -self.direction)
    }

    pub const DEFAULT: Self = Self::new(Float3::ZERO, Float3::FORWARD);
}

impl Default for Pose {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn yaw_of_cardinal_directions() {
        let p = Float3::ZERO;
        assert_relative_eq!(Pose::new(p, Float3::FORWARD).yaw(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(Pose::new(p, Float3::RIGHT).yaw(), PI / 2.0, epsilon = 1e-6);
        assert_relative_eq!(Pose::new(p, Float3::BACK).yaw().abs(), PI, epsilon = 1e-6);
    }

    #[test]
    fn pitch_follows_lifted_heading() {
        let pose = Pose::new(Float3::ZERO, Float3::new(0.0, 1.0, 1.0).normalize());
        assert_relative_eq!(pose.pitch(), PI / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_maps_forward_onto_direction() {
        let dir = Float3::new(1.0, 0.5, -2.0).normalize();
        let pose = Pose::new(Float3::ZERO, dir);
        let mapped = pose.rotation().rotate(Float3::FORWARD);

        assert_relative_eq!(mapped.x, dir.x, epsilon = 1e-5);
        assert_relative_eq!(mapped.y, dir.y, epsilon = 1e-5);
        assert_relative_eq!(mapped.z, dir.z, epsilon = 1e-5);
    }

    #[test]
    fn looking_at_self_falls_back_to_forward() {
        let p = Float3::new(1.0, 2.0, 3.0);
        assert_eq!(Pose::looking_at(p, p).direction, Float3::FORWARD);
    }

    #[test]
    fn reversed_flips_yaw_by_half_turn() {
        let pose = Pose::new(Float3::ZERO, Float3::RIGHT).reversed();
        assert_relative_eq!(pose.yaw(), -PI / 2.0, epsilon = 1e-6);
    }
}
