use serde::Serialize;

use crate::config::TrainConfig;
use crate::curve::Curve;
use crate::sim::{clamp01, Float3, Pose};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum CarriageKind {
    FrontLoco,
    Wagon,
    /// Coupled facing backwards.
    RearLoco,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Carriage {
    pub kind: CarriageKind,
    /// Curve progress this carriage sits at, after clamping.
    pub t: f32,
    pub pose: Pose,
}

/// World poses for the three carriages of the train.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TrainPose {
    pub carriages: [Carriage; 3],
}

impl TrainPose {
    /// Places the train with its front at `progress` along `curve`.
    pub fn place(curve: &impl Curve, progress: f32, config: &TrainConfig) -> Self {
        let length = curve.length();
        let (front_dt, rear_dt) = if length > 0.0 {
            (config.front_spacing / length, config.rear_spacing / length)
        } else {
            (0.0, 0.0)
        };

        let carriage = |kind: CarriageKind, offset: f32| {
            let t = clamp01(progress - offset);
            let point = curve.point_at(t);
            let mut heading = curve.tangent_at(t);
            heading.y += config.heading_lift;

            let mut pose = Pose::looking_at(point, point + heading);
            pose.position.y += config.rig_height;
            if kind == CarriageKind::RearLoco {
                pose = pose.reversed();
            }
            Carriage { kind, t, pose }
        };

        Self {
            carriages: [
                carriage(CarriageKind::FrontLoco, 0.0),
                carriage(CarriageKind::Wagon, front_dt),
                carriage(CarriageKind::RearLoco, front_dt + rear_dt),
            ],
        }
    }

    pub fn front(&self) -> &Carriage {
        &self.carriages[0]
    }

    /// The wagon, which the camera treats as the train's centre.
    pub fn centre(&self) -> Float3 {
        self.carriages[1].pose.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::TrackCurve;
    use approx::assert_relative_eq;

    fn line() -> TrackCurve {
        TrackCurve::line(Float3::new(0.0, 0.6, 0.0), Float3::new(0.0, 0.6, 100.0))
    }

    #[test]
    fn carriages_trail_by_configured_spacing() {
        let train = TrainPose::place(&line(), 0.5, &TrainConfig::default());
        let [front, wagon, rear] = train.carriages;

        assert_relative_eq!(front.pose.position.z, 50.0, epsilon = 1e-3);
        assert_relative_eq!(wagon.pose.position.z, 50.0 - 3.05, epsilon = 1e-3);
        assert_relative_eq!(rear.pose.position.z, 50.0 - 6.6, epsilon = 1e-3);
    }

    #[test]
    fn rig_sits_above_rail() {
        let train = TrainPose::place(&line(), 0.5, &TrainConfig::default());
        for c in &train.carriages {
            assert_relative_eq!(c.pose.position.y, 1.4, epsilon = 1e-5);
        }
    }

    #[test]
    fn heading_is_lifted_and_rear_faces_back() {
        let train = TrainPose::place(&line(), 0.5, &TrainConfig::default());
        let [front, _, rear] = train.carriages;

        let expected = Float3::new(0.0, 0.8, 1.0).normalize();
        assert_relative_eq!(front.pose.direction.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(front.pose.direction.z, expected.z, epsilon = 1e-5);
        assert!(rear.pose.direction.z < 0.0);
    }

    #[test]
    fn trailing_carriages_clamp_at_start() {
        let train = TrainPose::place(&line(), 0.01, &TrainConfig::default());
        let [front, wagon, rear] = train.carriages;
        assert_relative_eq!(front.t, 0.01);
        assert_eq!(wagon.t, 0.0);
        assert_eq!(rear.t, 0.0);
        assert_relative_eq!(rear.pose.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn progress_past_end_clamps() {
        let train = TrainPose::place(&line(), 1.7, &TrainConfig::default());
        assert_eq!(train.front().t, 1.0);
        assert_relative_eq!(train.front().pose.position.z, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn centre_is_wagon() {
        let train = TrainPose::place(&line(), 0.5, &TrainConfig::default());
        assert_relative_eq!(train.centre().z, 46.95, epsilon = 1e-3);
    }
}
