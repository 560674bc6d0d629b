use crate::animation::values::Interpolatable;
use crate::errors::{Result, SceneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    Step,
    #[default]
    Linear,
    /// Values are stored as `[in_tangent, value, out_tangent]` per key.
    CubicSpline,
}

/// A sorted list of keys for one animated value.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track, validating that keys exist and that the value count
    /// matches the interpolation mode.
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.is_empty() {
            return Err(SceneError::EmptyTrack);
        }

        let expected = match interpolation {
            InterpolationMode::CubicSpline => times.len() * 3,
            _ => times.len(),
        };
        if values.len() != expected {
            return Err(SceneError::TrackLengthMismatch {
                times: times.len(),
                values: values.len(),
                expected,
            });
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    /// Linear track from `(time, value)` pairs.
    pub fn linear(keys: &[(f32, T)]) -> Result<Self> {
        let (times, values): (Vec<f32>, Vec<T>) = keys.iter().copied().unzip();
        Self::new(times, values, InterpolationMode::Linear)
    }

    /// Single-key track holding `value` for all times.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
            interpolation: InterpolationMode::Step,
        }
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Time of the last key.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Samples the track. Times before the first key or after the last key
    /// clamp to the boundary values.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        // First key strictly after `time`
        let next = self.times.partition_point(|&t| t <= time);
        if next == 0 {
            return self.key_value(0);
        }
        let index = next - 1;
        if index + 1 >= self.times.len() {
            return self.key_value(index);
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;
        let t = if dt > 1e-6 { ((time - t0) / dt).clamp(0.0, 1.0) } else { 0.0 };

        match self.interpolation {
            InterpolationMode::Step => self.key_value(index),
            InterpolationMode::Linear => T::interpolate_linear(self.key_value(index), self.key_value(index + 1), t),
            InterpolationMode::CubicSpline => {
                let out_tangent0 = self.values[index * 3 + 2];
                let in_tangent1 = self.values[(index + 1) * 3];
                T::interpolate_cubic(
                    self.key_value(index),
                    out_tangent0,
                    in_tangent1,
                    self.key_value(index + 1),
                    t,
                    dt,
                )
            }
        }
    }

    fn key_value(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            _ => self.values[index],
        }
    }
}
