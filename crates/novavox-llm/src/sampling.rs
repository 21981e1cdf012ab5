//! Sampling parameters with silent clamping
//!
//! Out-of-range values are clamped to the valid range, never rejected: this
//! is the documented policy (the model boundary always receives parameters
//! it was designed for, and callers are not burdened with validation).

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Completion length cap, clamped to [1, 1024].
    pub max_tokens: u32,
    /// Softmax temperature, clamped to [0, 2].
    pub temperature: f32,
    /// Nucleus sampling mass, clamped to [0, 1].
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl SamplingParams {
    /// Return a copy with every field clamped into its valid range.
    /// Non-finite floats fall back to the defaults.
    pub fn clamped(&self) -> Self {
        let clamped = Self {
            max_tokens: self.max_tokens.clamp(1, 1024),
            temperature: clamp_finite(self.temperature, 0.0, 2.0, Self::default().temperature),
            top_p: clamp_finite(self.top_p, 0.0, 1.0, Self::default().top_p),
        };
        if clamped != *self {
            tracing::debug!(requested = ?self, effective = ?clamped, "sampling parameters clamped");
        }
        clamped
    }
}

fn clamp_finite(value: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_params_are_untouched() {
        let params = SamplingParams::default();
        assert_eq!(params.clamped(), params);
    }

    #[test]
    fn out_of_range_params_are_clamped_not_rejected() {
        let params = SamplingParams {
            max_tokens: 0,
            temperature: 5.0,
            top_p: -1.0,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.max_tokens, 1);
        assert_eq!(clamped.temperature, 2.0);
        assert_eq!(clamped.top_p, 0.0);

        let params = SamplingParams {
            max_tokens: 9000,
            temperature: -0.5,
            top_p: 3.0,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.max_tokens, 1024);
        assert_eq!(clamped.temperature, 0.0);
        assert_eq!(clamped.top_p, 1.0);
    }

    #[test]
    fn non_finite_floats_fall_back_to_defaults() {
        let params = SamplingParams {
            max_tokens: 10,
            temperature: f32::NAN,
            top_p: f32::INFINITY,
        };
        let clamped = params.clamped();
        assert_eq!(clamped.temperature, SamplingParams::default().temperature);
        assert_eq!(clamped.top_p, SamplingParams::default().top_p);
    }
}
