use std::ops::{Add, Mul, Neg, Sub};

/// Point or direction in scene units. Y is up, the main line runs along +Z.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
pub struct Float3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Float3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// Direction of travel along the main line.
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector, or zero for a (near) zero input.
    pub fn normalize(self) -> Self {
        match self.magnitude() {
            m if m < f32::EPSILON => Self::ZERO,
            m => self * m.recip(),
        }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).magnitude()
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Add for Float3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Float3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Float3 {
    type Output = Self;
    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Float3 {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Default for Float3 {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Unit rotation quaternion, `(x, y, z)` vector part and `w` scalar part.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    fn from_parts(v: Float3, w: f32) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
            w,
        }
    }

    fn vector(self) -> Float3 {
        Float3::new(self.x, self.y, self.z)
    }

    /// Rotation of `angle` radians around `axis` (right-handed).
    pub fn from_axis_angle(axis: Float3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::from_parts(axis.normalize() * sin, cos)
    }

    pub fn rotate(self, v: Float3) -> Float3 {
        let t = self.vector().cross(v) * 2.0;
        v + t * self.w + self.vector().cross(t)
    }
}

/// Hamilton product: `a * b` applies `b` first.
impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self.vector(), rhs.vector());
        Self::from_parts(
            b * self.w + a * rhs.w + a.cross(b),
            self.w * rhs.w - a.dot(b),
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Clamps a curve parameter to [0, 1]. NaN maps to 0.
pub fn clamp01(t: f32) -> f32 {
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent exponential smoothing toward `target`.
///
/// `lambda` is the smoothing rate; larger values converge faster.
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    lerp(current, target, 1.0 - (-lambda * dt.max(0.0)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_scales_to_unit_length() {
        let n = Float3::new(0.0, 3.0, 4.0).normalize();
        assert_relative_eq!(n.y, 0.6, epsilon = 1e-6);
        assert_relative_eq!(n.z, 0.8, epsilon = 1e-6);
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn operators_act_per_component() {
        let a = Float3::new(1.0, -2.0, 3.0);
        let b = Float3::new(0.5, 4.0, -1.0);
        assert_eq!(a + b, Float3::new(1.5, 2.0, 2.0));
        assert_eq!(a - b, Float3::new(0.5, -6.0, 4.0));
        assert_eq!(a * 2.0, Float3::new(2.0, -4.0, 6.0));
        assert_eq!(-a, Float3::new(-1.0, 2.0, -3.0));
        assert_eq!(a.lerp(b, 0.5), Float3::new(0.75, 1.0, 1.0));
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(Float3::ZERO.normalize(), Float3::ZERO);
    }

    #[test]
    fn forward_cross_up_is_minus_x() {
        // Travelling +Z, the cross with UP is -X.
        let side = Float3::FORWARD.cross(Float3::UP);
        assert_relative_eq!(side.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(side.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(side.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn quarter_turn_about_up_takes_forward_to_right() {
        let q = Quaternion::from_axis_angle(Float3::UP, std::f32::consts::FRAC_PI_2);
        let v = q.rotate(Float3::FORWARD);
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn product_applies_right_operand_first() {
        let turn = Quaternion::from_axis_angle(Float3::UP, 0.7);
        let tilt = Quaternion::from_axis_angle(Float3::RIGHT, -0.3);
        let v = Float3::new(0.2, 0.1, 1.0);

        let combined = (turn * tilt).rotate(v);
        let stepwise = turn.rotate(tilt.rotate(v));
        assert_relative_eq!(combined.x, stepwise.x, epsilon = 1e-5);
        assert_relative_eq!(combined.y, stepwise.y, epsilon = 1e-5);
        assert_relative_eq!(combined.z, stepwise.z, epsilon = 1e-5);
    }

    #[test]
    fn clamp01_bounds_and_nan() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(f32::NAN), 0.0);
    }

    #[test]
    fn damp_converges_without_overshoot() {
        let mut x = 0.0;
        for _ in 0..600 {
            x = damp(x, 10.0, 2.0, 1.0 / 60.0);
            assert!(x <= 10.0);
        }
        assert_relative_eq!(x, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn damp_zero_dt_is_identity() {
        assert_eq!(damp(3.0, 10.0, 2.0, 0.0), 3.0);
        assert_eq!(damp(3.0, 10.0, 2.0, -1.0), 3.0);
    }
}
