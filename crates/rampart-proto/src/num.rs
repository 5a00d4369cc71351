//! Tolerant numeric deserializers.
//!
//! The wire makes no distinction between integer and floating-point
//! numbers, so inbound integer fields accept either representation and
//! round to the nearest integer. Out-of-range and non-finite values are
//! decode errors (the whole datagram is dropped).

use serde::de::{Deserializer, Error};
use serde::Deserialize;

fn checked(v: f64, min: f64, max: f64) -> Result<f64, String> {
    if !v.is_finite() {
        return Err(format!("numeric field is not finite: {v}"));
    }
    let rounded = v.round();
    if rounded < min || rounded > max {
        return Err(format!("numeric field out of range: {v}"));
    }
    Ok(rounded)
}

pub(crate) fn tolerant_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = f64::deserialize(d)?;
    checked(v, 0.0, f64::from(u32::MAX))
        .map(|v| v as u32)
        .map_err(D::Error::custom)
}

pub(crate) fn tolerant_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let v = f64::deserialize(d)?;
    // f64 integers above 2^53 are not exact; sequences and ticks stay
    // far below that in practice.
    checked(v, 0.0, 9_007_199_254_740_992.0)
        .map(|v| v as u64)
        .map_err(D::Error::custom)
}

pub(crate) fn tolerant_i32<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let v = f64::deserialize(d)?;
    checked(v, f64::from(i32::MIN), f64::from(i32::MAX))
        .map(|v| v as i32)
        .map_err(D::Error::custom)
}

pub(crate) fn tolerant_u32_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u32>, D::Error> {
    let raw = Vec::<f64>::deserialize(d)?;
    raw.into_iter()
        .map(|v| {
            checked(v, 0.0, f64::from(u32::MAX))
                .map(|v| v as u32)
                .map_err(D::Error::custom)
        })
        .collect()
}
