//! Free-flyer pose integration.
//!
//! The base orientation is stored in the state vector as roll/pitch/yaw,
//! with the rotation matrix composed as `Rz(yaw) * Ry(pitch) * Rx(roll)`.
//! Adding angular velocity to those angles directly is only valid for
//! small rotations, so the orientation is advanced by rotating each column
//! of the rotation matrix about the angular velocity axis (Rodrigues'
//! formula) and the angles are read back from the result.

use nalgebra::{DVector, Matrix3, Matrix4, Vector3};
use sf_core::{Tolerances, nearly_equal};

use crate::FREE_FLYER_DOF;
use crate::error::{DeviceError, DeviceResult};

/// Rotation matrix stored as its three columns.
pub type Columns = [Vector3<f64>; 3];

/// Columns of `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rpy_columns(roll: f64, pitch: f64, yaw: f64) -> Columns {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();
    [
        Vector3::new(cp * cy, cp * sy, -sp),
        Vector3::new(sr * sp * cy - cr * sy, sr * sp * sy + cr * cy, sr * cp),
        Vector3::new(cr * sp * cy + sr * sy, cr * sp * sy - sr * cy, cr * cp),
    ]
}

/// Roll, pitch and yaw of a rotation given by its columns.
///
/// Valid away from `pitch = ±π/2`, where roll and yaw are not separable.
pub fn rpy_from_columns(columns: &Columns) -> Vector3<f64> {
    let nx = columns[2][2];
    let ny = columns[1][2];
    Vector3::new(
        ny.atan2(nx),
        (-columns[0][2]).atan2((ny * ny + nx * nx).sqrt()),
        columns[0][1].atan2(columns[0][0]),
    )
}

/// Rotate `e` by `angle` about the unit vector `axis`.
pub fn rodrigues(e: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    let (s, c) = angle.sin_cos();
    e * c + axis.cross(e) * s + axis * (axis.dot(e) * (1.0 - c))
}

/// Columns of the rotation block of a homogeneous transform.
pub fn columns_of(pose: &Matrix4<f64>) -> Columns {
    let r: Matrix3<f64> = pose.fixed_view::<3, 3>(0, 0).into_owned();
    [
        r.column(0).into_owned(),
        r.column(1).into_owned(),
        r.column(2).into_owned(),
    ]
}

/// Overwrite the rotation block of a homogeneous transform.
pub fn set_columns(pose: &mut Matrix4<f64>, columns: &Columns) {
    pose.fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&Matrix3::from_columns(columns));
}

/// Homogeneous transform of the base described by `position[0..6]`.
pub fn pose_from_base(position: &DVector<f64>) -> DeviceResult<Matrix4<f64>> {
    check_free_flyer("state", position)?;
    let mut pose = Matrix4::identity();
    for i in 0..3 {
        pose[(i, 3)] = position[i];
    }
    set_columns(&mut pose, &rpy_columns(position[3], position[4], position[5]));
    Ok(pose)
}

/// `true` if the columns are unit length and mutually orthogonal.
pub fn is_orthonormal(columns: &Columns, tol: f64) -> bool {
    let tol = Tolerances { abs: tol, rel: 0.0 };
    (0..3).all(|i| {
        (0..3).all(|j| {
            let expected = if i == j { 1.0 } else { 0.0 };
            nearly_equal(columns[i].dot(&columns[j]), expected, tol)
        })
    })
}

/// Advance the free-flyer block of `position` by one step of `dt`.
///
/// `control[0..3]` is the linear velocity, `control[3..6]` the angular
/// velocity. Translation is integrated with explicit Euler; orientation is
/// rotated by `dt * |omega|` about `omega`. `pose` receives the new
/// translation and rotation.
///
/// With zero angular velocity the orientation, including the stored
/// angles, is left exactly as it was.
pub fn integrate_roll_pitch_yaw(
    position: &mut DVector<f64>,
    control: &DVector<f64>,
    dt: f64,
    pose: &mut Matrix4<f64>,
) -> DeviceResult<()> {
    check_free_flyer("state", position)?;
    check_free_flyer("control", control)?;

    for i in 0..3 {
        position[i] += control[i] * dt;
        pose[(i, 3)] = position[i];
    }
    let omega = Vector3::new(control[3], control[4], control[5]);

    let mut columns = rpy_columns(position[3], position[4], position[5]);

    let norm = omega.norm();
    let angle = dt * norm;
    if angle == 0.0 {
        set_columns(pose, &columns);
        return Ok(());
    }

    let axis = omega / norm;
    for column in &mut columns {
        *column = rodrigues(column, &axis, angle);
    }
    set_columns(pose, &columns);

    let rpy = rpy_from_columns(&columns);
    for i in 0..3 {
        position[3 + i] = rpy[i];
    }
    Ok(())
}

fn check_free_flyer(what: &'static str, v: &DVector<f64>) -> DeviceResult<()> {
    if v.len() < FREE_FLYER_DOF {
        return Err(DeviceError::Dimension {
            what,
            expected: FREE_FLYER_DOF,
            actual: v.len(),
        });
    }
    Ok(())
}
