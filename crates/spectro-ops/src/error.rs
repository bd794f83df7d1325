//! Error types for transform and convolution operations.

use thiserror::Error;

/// Result type for transform and convolution operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors raised by the operators.
///
/// Every failure is terminal for the current operation: there are no
/// internal retries, and partial output is dropped before the error is
/// returned. Messages carry the operation and channel that failed so a
/// caller can surface them directly.
#[derive(Debug, Error)]
pub enum OpsError {
    /// A working buffer could not be allocated.
    #[error("memory allocation failed during {context} ({requested} bytes)")]
    ResourceExhausted {
        /// What was being allocated.
        context: String,
        /// Size of the failed request in bytes.
        requested: usize,
    },

    /// The FFT backend was not built in.
    #[error("{operation} requires the `fft` feature, which is not built in")]
    DependencyMissing {
        /// The operation that needs the backend.
        operation: String,
    },

    /// The FFT backend failed to plan or execute a transform.
    #[error("FFT backend failure during {context}: {reason}")]
    DependencyFailure {
        /// What the backend was asked to do.
        context: String,
        /// The underlying failure.
        reason: String,
    },

    /// A pixel read or write failed.
    #[error("pixel cache failure during {context}: {reason}")]
    CacheFailure {
        /// The access that failed.
        context: String,
        /// The underlying failure.
        reason: String,
    },

    /// Source images have incompatible shapes.
    #[error("shape mismatch in {context}: {a_width}x{a_height} vs {b_width}x{b_height}")]
    ShapeError {
        /// The operation that received the mismatched pair.
        context: String,
        /// First image width.
        a_width: u32,
        /// First image height.
        a_height: u32,
        /// Second image width.
        b_width: u32,
        /// Second image height.
        b_height: u32,
    },

    /// A kernel or image does not fit the operation's model.
    #[error("invalid model: {reason}")]
    ImageModelError {
        /// Why the input was rejected.
        reason: String,
    },
}

impl OpsError {
    /// Creates an [`OpsError::ResourceExhausted`] error.
    #[inline]
    pub fn resource_exhausted(context: impl Into<String>, requested: usize) -> Self {
        Self::ResourceExhausted {
            context: context.into(),
            requested,
        }
    }

    /// Creates an [`OpsError::DependencyMissing`] error.
    #[inline]
    pub fn dependency_missing(operation: impl Into<String>) -> Self {
        Self::DependencyMissing {
            operation: operation.into(),
        }
    }

    /// Creates an [`OpsError::DependencyFailure`] error.
    #[inline]
    pub fn dependency_failure(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DependencyFailure {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`OpsError::CacheFailure`] error.
    #[inline]
    pub fn cache_failure(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CacheFailure {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`OpsError::ShapeError`] error.
    #[inline]
    pub fn shape_error(context: impl Into<String>, a: (u32, u32), b: (u32, u32)) -> Self {
        Self::ShapeError {
            context: context.into(),
            a_width: a.0,
            a_height: a.1,
            b_width: b.0,
            b_height: b.1,
        }
    }

    /// Creates an [`OpsError::ImageModelError`] error.
    #[inline]
    pub fn image_model(reason: impl Into<String>) -> Self {
        Self::ImageModelError {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error came from the FFT backend.
    #[inline]
    pub fn is_dependency_error(&self) -> bool {
        matches!(
            self,
            Self::DependencyMissing { .. } | Self::DependencyFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_message() {
        let err = OpsError::shape_error("inverse Fourier transform", (4, 4), (6, 6));
        let msg = err.to_string();
        assert!(msg.contains("4x4"));
        assert!(msg.contains("6x6"));
        assert!(msg.contains("inverse Fourier transform"));
    }

    #[test]
    fn test_dependency_predicates() {
        assert!(OpsError::dependency_missing("forward Fourier transform").is_dependency_error());
        assert!(OpsError::dependency_failure("row FFT", "length mismatch").is_dependency_error());
        assert!(!OpsError::image_model("empty kernel").is_dependency_error());
    }
}
