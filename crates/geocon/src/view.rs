//! Camera rotation and screen ↔ model mappings for the 3D views.
//!
//! - Sphere: orthographic projection along camera `z`, front hemisphere `z > 0`.
//! - Hyperboloid: perspective from the camera-space eye `(0,0,−1)` onto the
//!   plane `z = 0`; with the identity rotation this is exactly the Poincaré disk.
//! - `ScreenTransform` maps camera-plane coordinates to pixels (y down).

use nalgebra::{Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::cfg::DENOM_EPS;
use crate::chart::HyperbolicChart;

/// Orientation of the model in front of the camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewRotation {
    pub rot: Rotation3<f64>,
}

impl Default for ViewRotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewRotation {
    pub fn identity() -> Self {
        Self {
            rot: Rotation3::identity(),
        }
    }

    /// Yaw about `z`, then pitch about `y`, then roll about `x` (applied right to left).
    pub fn from_yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            rot: Rotation3::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// `self` first, then `next`.
    pub fn then(&self, next: &ViewRotation) -> ViewRotation {
        ViewRotation {
            rot: next.rot * self.rot,
        }
    }

    /// Compose an incremental camera rotation (e.g. from a drag).
    pub fn rotate_by(&mut self, yaw: f64, pitch: f64, roll: f64) {
        *self = self.then(&ViewRotation::from_yaw_pitch_roll(yaw, pitch, roll));
    }

    pub fn inverse(&self) -> ViewRotation {
        ViewRotation {
            rot: self.rot.inverse(),
        }
    }

    /// Model → camera.
    #[inline]
    pub fn apply(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.rot * v
    }

    /// Camera → model.
    #[inline]
    pub fn unapply(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.rot.inverse_transform_vector(&v)
    }
}

/// Camera plane → pixels: `center + scale·(x, −y)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenTransform {
    pub center: Vector2<f64>,
    pub scale: f64,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self {
            center: Vector2::zeros(),
            scale: 1.0,
        }
    }
}

impl ScreenTransform {
    pub fn new(center: Vector2<f64>, scale: f64) -> Self {
        Self { center, scale }
    }

    #[inline]
    pub fn to_screen(&self, p: Vector2<f64>) -> Vector2<f64> {
        self.center + Vector2::new(p.x, -p.y) * self.scale
    }

    #[inline]
    pub fn from_screen(&self, s: Vector2<f64>) -> Vector2<f64> {
        let d = (s - self.center) / self.scale;
        Vector2::new(d.x, -d.y)
    }

    pub fn pan(&mut self, delta_px: Vector2<f64>) {
        self.center += delta_px;
    }

    /// Zoom by `factor`, keeping the model point under `anchor_px` fixed.
    pub fn zoom_at(&mut self, anchor_px: Vector2<f64>, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let model = self.from_screen(anchor_px);
        self.scale *= factor;
        let moved = self.to_screen(model);
        self.center += anchor_px - moved;
    }
}

/// Screen position plus camera depth (`> 0` faces the viewer on the sphere).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub screen: Vector2<f64>,
    pub depth: f64,
}

/// Per-mode view state owned by the caller next to its document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub rotation: ViewRotation,
    pub screen: ScreenTransform,
    pub chart: HyperbolicChart,
}

/// Orthographic projection of a sphere point.
pub fn project_sphere(rot: &ViewRotation, screen: &ScreenTransform, v: Vector3<f64>) -> Projected {
    let c = rot.apply(v);
    Projected {
        screen: screen.to_screen(Vector2::new(c.x, c.y)),
        depth: c.z,
    }
}

/// Screen → front-hemisphere point; `None` outside the sphere's silhouette.
pub fn unproject_sphere(
    rot: &ViewRotation,
    screen: &ScreenTransform,
    s: Vector2<f64>,
) -> Option<Vector3<f64>> {
    let p = screen.from_screen(s);
    let rr = p.norm_squared();
    if rr > 1.0 {
        return None;
    }
    let c = Vector3::new(p.x, p.y, (1.0 - rr).sqrt());
    Some(rot.unapply(c).normalize())
}

/// Perspective projection of a hyperboloid point from the eye `(0,0,−1)`.
pub fn project_hyperboloid(
    rot: &ViewRotation,
    screen: &ScreenTransform,
    h: Vector3<f64>,
) -> Option<Projected> {
    let c = rot.apply(h);
    let w = c.z + 1.0;
    if !(w > DENOM_EPS) {
        return None;
    }
    Some(Projected {
        screen: screen.to_screen(Vector2::new(c.x, c.y) / w),
        depth: c.z,
    })
}

/// Minkowski bilinear form `z₁z₂ − x₁x₂ − y₁y₂`.
#[inline]
pub fn minkowski(a: Vector3<f64>, b: Vector3<f64>) -> f64 {
    a.z * b.z - a.x * b.x - a.y * b.y
}

/// Screen → hyperboloid: smallest positive ray parameter landing on the upper sheet.
pub fn unproject_hyperboloid(
    rot: &ViewRotation,
    screen: &ScreenTransform,
    s: Vector2<f64>,
) -> Option<Vector3<f64>> {
    let p = screen.from_screen(s);
    let eye = rot.unapply(Vector3::new(0.0, 0.0, -1.0));
    let dir = rot.unapply(Vector3::new(p.x, p.y, 1.0));
    // ⟨eye + t dir, eye + t dir⟩ = 1
    let a = minkowski(dir, dir);
    let b = minkowski(eye, dir);
    let c = minkowski(eye, eye) - 1.0;
    let mut roots = Vec::with_capacity(2);
    if a.abs() <= DENOM_EPS {
        if b.abs() > DENOM_EPS {
            roots.push(-c / (2.0 * b));
        }
    } else {
        let disc = b * b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        roots.push((-b - sq) / a);
        roots.push((-b + sq) / a);
    }
    roots
        .into_iter()
        .filter(|t| t.is_finite() && *t > DENOM_EPS.sqrt())
        .map(|t| eye + dir * t)
        .filter(|x| x.z > 0.0)
        .min_by(|x, y| {
            (x - eye)
                .norm_squared()
                .partial_cmp(&(y - eye).norm_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
