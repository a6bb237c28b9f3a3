use raylib::prelude::*;

use crate::matrix::Mat4;
use crate::point3d::Point3D;
use crate::transform::Transform;

/// Everything the pipeline needs to know about the camera for one frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewParams {
    pub position: Point3D,
    pub forward: Point3D,
    pub view: Mat4,
    pub projection: Mat4,
    pub near: f32,
}

/// Input sampled once per frame
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraInput {
    pub look: Option<(f32, f32)>,
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub wheel: f32,
}

pub struct Camera {
    pub fov: f32,
    pub near: f32,
    pub camera_speed: f32,
    pub mouse_sensitivity: f32,
    pub transform: Transform,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            camera_speed: 1.0,
            mouse_sensitivity: 0.002,
            transform: Transform::default(),
        }
    }
}

impl Camera {
    pub fn camera_update(&mut self, r1: &RaylibHandle) {
        let mouse_delta = r1.get_mouse_delta();
        let input = CameraInput {
            look: r1
                .is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT)
                .then_some((mouse_delta.x, mouse_delta.y)),
            forward: r1.is_key_down(KeyboardKey::KEY_W),
            back: r1.is_key_down(KeyboardKey::KEY_S),
            left: r1.is_key_down(KeyboardKey::KEY_A),
            right: r1.is_key_down(KeyboardKey::KEY_D),
            up: r1.is_key_down(KeyboardKey::KEY_SPACE),
            down: r1.is_key_down(KeyboardKey::KEY_LEFT_SHIFT),
            wheel: r1.get_mouse_wheel_move(),
        };
        self.apply_input(&input);
    }

    pub fn apply_input(&mut self, input: &CameraInput) {
        // Update yaw & pitch if clicking
        if let Some((dx, dy)) = input.look {
            self.transform.yaw -= dx * self.mouse_sensitivity;
            self.transform.pitch += dy * self.mouse_sensitivity;
            // Clamp pitch so camera can't flip upside-down
            self.transform.pitch = self.transform.pitch.clamp(-85.0f32.to_radians(), 85.0f32.to_radians());
        }
        let (right, _up, forward) = self.transform.get_basis_vectors();
        let step = self.camera_speed;

        if input.forward { self.transform.position += forward * step }
        if input.left { self.transform.position -= right * step }
        if input.back { self.transform.position -= forward * step }
        if input.right { self.transform.position += right * step }
        // World y points down the screen
        if input.up { self.transform.position.y -= step }
        if input.down { self.transform.position.y += step }
        self.fov -= input.wheel / 100.0;
        // Clamp fov so camera can't flip inside-out
        self.fov = self.fov.clamp(1.0_f32.to_radians(), 170.0_f32.to_radians());
    }

    pub fn view_params(&self, width: u32, height: u32) -> ViewParams {
        let aspect = width as f32 / height.max(1) as f32;
        ViewParams {
            position: self.transform.position,
            forward: self.transform.forward(),
            view: self.transform.to_inverse_matrix(),
            projection: Mat4::perspective(self.fov, aspect, self.near),
            near: self.near,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.apply_input(&CameraInput { look: Some((0.0, 1.0e6)), ..Default::default() });
        assert!((cam.transform.pitch - 85.0f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn moving_forward_follows_the_view_direction() {
        let mut cam = Camera { camera_speed: 2.0, ..Default::default() };
        cam.apply_input(&CameraInput { forward: true, ..Default::default() });
        assert!((cam.transform.position - Point3D::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn view_params_use_the_camera_transform() {
        let cam = Camera { transform: Transform::new(0.0, 0.0, Point3D::new(1.0, 2.0, 3.0)), ..Default::default() };
        let params = cam.view_params(200, 100);
        let local = params.view.transform_point(Point3D::new(1.0, 2.0, 13.0));
        assert!((local.xyz() - Point3D::new(0.0, 0.0, 10.0)).length() < 1e-5);
        assert_eq!(params.near, cam.near);
    }
}
