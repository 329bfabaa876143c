//! Free-fly camera.
//!
//! Position and orientation accumulate from input deltas; nothing else
//! writes camera state. Yaw 0 / pitch 0 looks down -Z. Pitch clamps to
//! [-89, +89] degrees so the view basis never flips.

use bytemuck::{Pod, Zeroable};
use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::constants::camera::*;
use crate::world::{Mode, World};

/// Camera configuration, immutable once passed to [`Camera::init`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub field_of_view: f64,
    pub wireframe: bool,
    pub position: [f32; 3],
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            field_of_view: DEFAULT_FOV_DEGREES,
            wireframe: false,
            position: [0.0, 0.0, 0.0],
        }
    }
}

/// View/projection uniform block in the layout the renderer consumes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_matrix: [[f32; 4]; 4],
    pub projection_matrix: [[f32; 4]; 4],
    pub position: [f32; 3],
    _padding: f32,
}

#[derive(Debug)]
pub struct Camera {
    position: Point3<f32>,
    yaw: Deg<f32>,
    pitch: Deg<f32>,
    fovy: Deg<f32>,
    aspect: f32,
    mode: Mode,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            yaw: Deg(0.0),
            pitch: Deg(0.0),
            fovy: Deg(DEFAULT_FOV_DEGREES as f32),
            aspect: DEFAULT_ASPECT,
            mode: Mode::Normal,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to the configured defaults. Orientation always restarts level.
    pub fn init(&mut self, config: &Configuration) {
        *self = Self::default();
        self.position = Point3::new(config.position[0], config.position[1], config.position[2]);
        self.set_field_of_view(config.field_of_view as f32);
        self.mode = if config.wireframe {
            Mode::WireFrame
        } else {
            Mode::Normal
        };
        log::debug!(
            "[Camera] init at ({:.1}, {:.1}, {:.1}), fov {:.1} deg, mode {:?}",
            self.position.x,
            self.position.y,
            self.position.z,
            self.fovy.0,
            self.mode
        );
    }

    /// Add a world-space displacement. Free-fly: no clamping to terrain.
    pub fn inc_position(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Accumulate yaw and pitch, in degrees. Pitch clamps at +/-89 degrees;
    /// yaw wraps freely.
    pub fn inc_orientation(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += Deg(delta_yaw);
        self.pitch = Deg((self.pitch.0 + delta_pitch).clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES));
    }

    /// Unit view direction. Yaw 0 / pitch 0 gives (0, 0, -1).
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = Rad::from(self.yaw).0.sin_cos();
        let (sin_pitch, cos_pitch) = Rad::from(self.pitch).0.sin_cos();

        Vector3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw)
    }

    /// Unit strafe direction, orthogonal to both forward and world up.
    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(Vector3::unit_y()).normalize()
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Direct setter; non-finite components are ignored.
    pub fn set_position(&mut self, position: Point3<f32>) {
        if position.x.is_finite() && position.y.is_finite() && position.z.is_finite() {
            self.position = position;
        } else {
            log::warn!("[Camera] Ignoring non-finite position {:?}", position);
        }
    }

    pub fn field_of_view(&self) -> f32 {
        self.fovy.0
    }

    /// Direct setter; non-finite or non-positive values are ignored.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        if degrees.is_finite() && degrees > 0.0 {
            self.fovy = Deg(degrees);
        } else {
            log::warn!("[Camera] Ignoring invalid field of view {}", degrees);
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Height of the terrain directly under the camera. The world is passed
    /// in explicitly; the camera keeps no world handle.
    pub fn terrain_height_below(&self, world: &World) -> f32 {
        world.height_at(self.position.x, self.position.z)
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.forward(), Vector3::unit_y())
    }

    pub fn build_projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, ZNEAR, ZFAR)
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_matrix: self.build_view_matrix().into(),
            projection_matrix: self.build_projection_matrix().into(),
            position: self.position.into(),
            _padding: 0.0,
        }
    }
}
