use fire_particles_core::FieldError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code passed across the FFI boundary
/// - `msg()` - Returns the error message for diagnostics
pub(crate) trait FireParticlesError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireParticlesErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireParticlesError`: an error code plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireParticlesError {
    code: FireParticlesErrorCode,
    msg: String,
}

impl DefaultFireParticlesError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireParticlesErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireParticlesErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for a caller-provided buffer that cannot hold the frame.
    ///
    /// # Arguments
    /// * `buffer_name` - Which output buffer was short (e.g., `"positions"`)
    /// * `required` - Number of floats needed
    /// * `provided` - Number of floats the caller passed
    pub fn buffer_too_small(buffer_name: &str, required: usize, provided: usize) -> Self {
        Self {
            code: FireParticlesErrorCode::BufferTooSmall,
            msg: format!(
                "Buffer '{buffer_name}' holds {provided} floats but the frame needs {required}"
            ),
        }
    }
}

impl From<FieldError> for DefaultFireParticlesError {
    fn from(error: FieldError) -> Self {
        let code = match error {
            FieldError::InvalidParticleCount(_) => FireParticlesErrorCode::InvalidParticleCount,
            FieldError::InvalidFireIntensity(_)
            | FieldError::InvalidWindSpeed(_)
            | FieldError::InvalidHorizontalLimit(_)
            | FieldError::IndexOutOfBounds { .. } => FireParticlesErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FireParticlesError for DefaultFireParticlesError {
    fn code(&self) -> FireParticlesErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by fire particle functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireParticlesErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Particle count must be at least 1.
    InvalidParticleCount = 3,

    /// Invalid parameter passed to function (negative or non-finite rate, bad index).
    InvalidParameter = 4,

    /// Output buffer passed by the caller is shorter than the frame.
    BufferTooSmall = 5,
}

impl From<DefaultFireParticlesError> for FireParticlesErrorCode {
    fn from(error: DefaultFireParticlesError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so returned pointers stay valid until the next error.
    static LAST_ERROR: RefCell<(Option<CString>, FireParticlesErrorCode)> = const { RefCell::new((None, FireParticlesErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireParticlesErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireParticlesErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```cpp
/// FireParticlesInstance* fire = nullptr;
/// FireParticlesErrorCode err = fire_particles_new(settings, &fire);
/// if (err != FireParticlesErrorCode::Ok) {
///     const char* error = fire_particles_get_last_error();
///     if (error) {
///         printf("Fire particles creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_particles_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `FireParticlesErrorCode::Ok` (0) if no error has occurred on this thread.
#[no_mangle]
pub extern "C" fn fire_particles_get_last_error_code() -> FireParticlesErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_mapping() {
        let err: DefaultFireParticlesError = FieldError::InvalidParticleCount(0).into();
        assert_eq!(err.code(), FireParticlesErrorCode::InvalidParticleCount);
        assert_eq!(err.msg(), "Particle count must be at least 1, got 0");

        let err: DefaultFireParticlesError = FieldError::InvalidWindSpeed(-2.0).into();
        assert_eq!(err.code(), FireParticlesErrorCode::InvalidParameter);
    }

    #[test]
    fn test_buffer_too_small_message() {
        let err = DefaultFireParticlesError::buffer_too_small("sizes", 10, 4);
        assert_eq!(err.code(), FireParticlesErrorCode::BufferTooSmall);
        assert!(err.msg().contains("sizes"));
    }
}
