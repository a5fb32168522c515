//! Earth rotation during signal propagation
use nalgebra::{Rotation3, Vector3};

use crate::constants::EARTH_ANGULAR_VEL_RAD;

/// Rotates a position expressed in the ECEF frame at transmission time,
/// into the ECEF frame at reception time, `travel_time_s` later.
/// The Earth rotated by θ = ωE.τ in the meantime, so the position
/// is rotated by -θ around the Z axis.
pub fn earth_rotation(position_m: Vector3<f64>, travel_time_s: f64) -> Vector3<f64> {
    let theta = EARTH_ANGULAR_VEL_RAD * travel_time_s;
    Rotation3::from_axis_angle(&Vector3::z_axis(), -theta) * position_m
}
