use crate::shader::UniformValue;

/// Smooth oscillation in `[0, 1]` with a period of `2π` seconds.
///
/// `0.5` at `t = 0` and `t = π`, `1.0` at `t = π/2`.
#[inline]
pub fn pulse(elapsed_seconds: f32) -> f32 {
    0.5 + 0.5 * elapsed_seconds.sin()
}

/// A uniform recomputed from elapsed time every frame.
///
/// The value is pushed by name to every program; programs that do not declare
/// the uniform ignore it.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeUniform {
    /// `vec4` color equal to `base` with channel `channel` replaced by [`pulse`].
    ColorPulse {
        uniform: String,
        base: [f32; 4],
        channel: usize,
    },
    /// Scalar `f32` holding [`pulse`] directly.
    ScalarPulse { uniform: String },
}

impl TimeUniform {
    /// Green-channel pulse over opaque black.
    pub fn green_pulse(uniform: impl Into<String>) -> Self {
        TimeUniform::ColorPulse {
            uniform: uniform.into(),
            base: [0.0, 0.0, 0.0, 1.0],
            channel: 1,
        }
    }

    pub fn uniform(&self) -> &str {
        match self {
            TimeUniform::ColorPulse { uniform, .. } | TimeUniform::ScalarPulse { uniform } => {
                uniform
            }
        }
    }

    pub fn evaluate(&self, elapsed_seconds: f32) -> UniformValue {
        let p = pulse(elapsed_seconds);
        match self {
            TimeUniform::ColorPulse { base, channel, .. } => {
                let mut color = *base;
                if let Some(c) = color.get_mut(*channel) {
                    *c = p;
                }
                UniformValue::Vec4(color)
            }
            TimeUniform::ScalarPulse { .. } => UniformValue::Float(p),
        }
    }
}
