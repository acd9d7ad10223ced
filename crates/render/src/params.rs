use glam::{Mat4, Quat, Vec3};
use voxelwall_common::{Axis, Transform};

use crate::RenderError;

/// View and projection of a frame plus a model matrix stack for hierarchical
/// transformations. Every operation right-multiplies the current model matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    stack: Vec<Mat4>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

impl RenderParams {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection,
            model: Mat4::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Identity everything. Used by passes that ignore the camera.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push_matrix(&mut self) {
        self.stack.push(self.model);
    }

    /// Restore the most recently pushed model matrix.
    pub fn pop_matrix(&mut self) -> Result<(), RenderError> {
        self.model = self.stack.pop().ok_or(RenderError::MatrixStackEmpty)?;
        Ok(())
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.model *= Mat4::from_translation(offset);
    }

    /// Rotate by `angle` radians around `axis`.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.model *= Mat4::from_quat(Quat::from_axis_angle(axis.normalize(), angle));
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.model *= Mat4::from_rotation_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.model *= Mat4::from_rotation_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.model *= Mat4::from_rotation_z(angle);
    }

    pub fn scale(&mut self, factor: f32) {
        self.model *= Mat4::from_scale(Vec3::splat(factor));
    }

    pub fn scale_axis(&mut self, axis: Axis, factor: f32) {
        let mut s = Vec3::ONE;
        match axis {
            Axis::X => s.x = factor,
            Axis::Y => s.y = factor,
            Axis::Z => s.z = factor,
        }
        self.model *= Mat4::from_scale(s);
    }

    pub fn scale_x(&mut self, factor: f32) {
        self.scale_axis(Axis::X, factor);
    }

    pub fn scale_y(&mut self, factor: f32) {
        self.scale_axis(Axis::Y, factor);
    }

    pub fn scale_z(&mut self, factor: f32) {
        self.scale_axis(Axis::Z, factor);
    }

    /// Apply a mesh transform on top of the current model matrix.
    pub fn apply(&mut self, transform: &Transform) {
        self.model *= transform.to_matrix();
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut params = RenderParams::empty();
        assert_eq!(params.pop_matrix(), Err(RenderError::MatrixStackEmpty));
    }

    #[test]
    fn push_pop_restores_model() {
        let mut params = RenderParams::empty();
        params.translate(Vec3::X);
        params.push_matrix();
        params.scale(3.0);
        params.rotate_y(1.0);
        params.pop_matrix().unwrap();
        assert_eq!(params.model, Mat4::from_translation(Vec3::X));
        assert_eq!(params.pop_matrix(), Err(RenderError::MatrixStackEmpty));
    }

    #[test]
    fn operations_right_multiply() {
        let mut params = RenderParams::empty();
        params.translate(Vec3::new(1.0, 0.0, 0.0));
        params.scale(2.0);
        // Scale applies first, then the translation.
        let p = params.model.transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn per_axis_scale() {
        let mut params = RenderParams::empty();
        params.scale_y(4.0);
        assert_eq!(params.model.transform_point3(Vec3::ONE), Vec3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn apply_transform_matches_matrix() {
        let transform = Transform {
            translation: Vec3::new(0.0, 2.0, 0.0),
            scale: 0.5,
            ..Transform::default()
        };
        let mut params = RenderParams::empty();
        params.apply(&transform);
        assert_eq!(params.model, transform.to_matrix());
    }

    #[test]
    fn mvp_composes_projection_view_model() {
        let view = Mat4::from_translation(Vec3::Z);
        let projection = Mat4::from_scale(Vec3::splat(2.0));
        let mut params = RenderParams::new(view, projection);
        params.rotate(Vec3::Y, 0.5);
        let expected = projection * view * Mat4::from_rotation_y(0.5);
        assert!(params.model_view_projection().abs_diff_eq(expected, 1e-6));
    }
}
