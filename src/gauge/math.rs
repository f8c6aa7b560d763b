/*
Pip Gauge - by David Petnick
*/
use bevy::prelude::*;
use std::f32::consts::TAU;

/// Where 'value' Sits Between 'from' and 'to' (Unclamped)
/// Empty Range Returns 0 so Callers Never See NaN
#[inline]
pub fn inverse_lerp(from: f32, to: f32, value: f32) -> f32 {
    if (to - from).abs() <= f32::EPSILON {
        return 0.0;
    }
    f32::inverse_lerp(from, to, value)
}

/// Remap Degrees 0..360 Onto Radians 0..2PI
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    0.0_f32.lerp(TAU, inverse_lerp(0.0, 360.0, deg))
}

/// Constant When Both Ends Match, Otherwise sRGBA Mix
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    if from == to {
        return from;
    }
    from.to_srgba().mix(&to.to_srgba(), t).into()
}

/// Same Rule as Colors: Equal Ends Skip Interpolation Entirely
pub fn lerp_scale(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    if from == to {
        return from;
    }
    from.lerp(to, t)
}
