//! Core types: math re-exports, Transform, Camera, repository/asset identifiers.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod descriptor;
pub mod transform;

pub use camera::{Camera, CameraPose};
pub use descriptor::{AssetDescriptor, RepositoryReference, has_supported_extension};
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_rotation_applies_between_scale_and_translation() {
        // glTF node: quarter turn about +Y, doubled, lifted by 1.
        let node = Transform::from_trs(
            vec3(0.0, 1.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = node.matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(vec3(0.0, 1.0, -2.0), 1e-5), "{p}");
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn default_pose_centres_the_origin_on_screen() {
        let camera = Camera::from_pose(&CameraPose::DEFAULT, 16.0 / 9.0);
        assert_eq!(camera.eye, camera::DEFAULT_CAMERA_POSITION);
        let ndc = camera.proj_view().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "{ndc}");
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn orbited_pose_keeps_its_distance_on_camera() {
        let mut pose = CameraPose::default();
        pose.orbit(1.0, 0.3);
        let camera = Camera::from_pose(&pose, 1.0);
        assert!((camera.eye.length() - pose.distance()).abs() < 1e-4);
        assert!(camera.proj_view().to_cols_array().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn descriptor_for_supported_file() {
        let asset = AssetDescriptor::new("models/Ship.GLTF", "https://example.com/Ship.GLTF");
        assert!(has_supported_extension(&asset.path));
        assert_eq!(asset.extension_label(), "GLTF");
        assert!(!has_supported_extension("models/ship.gltf.bak"));
    }
}
