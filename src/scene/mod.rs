//! Scene assembly: train and camera poses, sign layout, ground voxels, and the
//! [`Scene`] that steps all of it frame by frame.

mod camera;
mod compose;
mod ground;
mod sign;
mod train;

pub use camera::FollowCamera;
pub use compose::{InputEvent, Scene, SceneFrame, TrackRails};
pub use ground::{hsl_to_rgb, GroundField, Voxel};
pub use sign::{
    branch_max_offset, place_signs, FrameBox, FramePart, SignButton, SignMetrics, SignOwner,
    SignPlacement,
};
pub use train::{Carriage, CarriageKind, TrainPose};
