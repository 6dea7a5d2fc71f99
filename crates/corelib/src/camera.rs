use crate::{Mat4, Vec3, vec3};

/// Camera position the viewer starts from and returns to on reset.
pub const DEFAULT_CAMERA_POSITION: Vec3 = vec3(0.0, 5.0, 10.0);

/// Distance bounds enforced when the pose is turned into a projection camera.
pub const MIN_CAMERA_DISTANCE: f32 = 0.1;
pub const MAX_CAMERA_DISTANCE: f32 = 2000.0;

/// Keeps orbiting away from the poles so `look_at` stays well defined.
const MAX_PITCH_RAD: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Where the viewer camera sits and what it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const DEFAULT: Self = Self {
        position: DEFAULT_CAMERA_POSITION,
        target: Vec3::ZERO,
    };

    /// Distance of the camera from the origin.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.position.length()
    }

    /// Scale the position vector around the origin (< 1 moves closer).
    pub fn zoom(&mut self, factor: f32) {
        self.position *= factor;
    }

    /// Rotate the position around the target: yaw about +Y, pitch towards/away from it.
    pub fn orbit(&mut self, yaw_rad: f32, pitch_rad: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let current_pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let pitch = (current_pitch + pitch_rad).clamp(-MAX_PITCH_RAD, MAX_PITCH_RAD);
        let yaw = offset.x.atan2(offset.z) + yaw_rad;

        let horizontal = radius * pitch.cos();
        let rotated = vec3(horizontal * yaw.sin(), radius * pitch.sin(), horizontal * yaw.cos());
        self.position = self.target + rotated;
    }

    /// Back to [`CameraPose::DEFAULT`], aimed at the origin.
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Simple perspective camera (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Viewer camera for a pose: 50 degree fov, wide depth range, distance clamped to
    /// [`MIN_CAMERA_DISTANCE`]..[`MAX_CAMERA_DISTANCE`].
    pub fn from_pose(pose: &CameraPose, aspect: f32) -> Self {
        let offset = pose.position - pose.target;
        let distance = offset.length();
        let eye = if distance <= f32::EPSILON {
            pose.target + Vec3::Z * MIN_CAMERA_DISTANCE
        } else {
            let clamped = distance.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
            pose.target + offset * (clamped / distance)
        };
        Self::new_perspective(
            eye,
            pose.target,
            Vec3::Y,
            50f32.to_radians(),
            0.1,
            5000.0,
            aspect,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Depth range is [0,1], which is what wgpu expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }
}
