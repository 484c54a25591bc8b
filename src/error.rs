use thiserror::Error;

/// Errors surfaced by the few fallible seams in the core.
///
/// Everything else (tree growth, drift detection, Poisson bagging) is a
/// total function over its inputs and never returns an error.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),

    #[error("distribution has zero total weight and strict normalization was requested")]
    DegenerateDistribution,
}

/// How a zero-sum class distribution should be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Return the raw, unnormalized values unchanged (the published default).
    #[default]
    SilentFallback,
    /// Fail with [`CoreError::DegenerateDistribution`].
    Strict,
}

/// Normalizes `values` in place so they sum to 1.0.
///
/// `factor` overrides the divisor; pass `0.0` to derive it from `values`'
/// own sum. On a zero total, behavior is governed by `mode`.
pub fn normalize_in_place(
    values: &mut [f64],
    factor: f64,
    mode: NormalizeMode,
) -> Result<(), CoreError> {
    let factor = if factor == 0.0 {
        values.iter().sum()
    } else {
        factor
    };
    if factor == 0.0 {
        return match mode {
            NormalizeMode::SilentFallback => Ok(()),
            NormalizeMode::Strict => Err(CoreError::DegenerateDistribution),
        };
    }
    for v in values.iter_mut() {
        *v /= factor;
    }
    Ok(())
}
