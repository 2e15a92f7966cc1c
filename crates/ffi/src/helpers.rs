use crate::error::{
    with_last_error_mut, DefaultFireParticlesError, FireParticlesError, FireParticlesErrorCode,
};
use crate::instance::FireParticlesInstance;
use fire_particles_core::ParticleField;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FireParticlesError` trait.
pub(crate) fn set_last_error(error: &impl FireParticlesError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireParticlesErrorCode::Ok;
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireParticlesError) -> FireParticlesErrorCode {
    tracing::debug!("FFI call failed: {}", error.msg());
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, or clear the last error on success.
pub(crate) fn track_result<T, E: FireParticlesError>(
    result: Result<T, E>,
) -> Result<T, FireParticlesErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Run an FFI body and turn its result into an error code.
pub(crate) fn handle_ffi_result_error<F>(body: F) -> FireParticlesErrorCode
where
    F: FnOnce() -> Result<(), DefaultFireParticlesError>,
{
    match track_result(body()) {
        Ok(()) => FireParticlesErrorCode::Ok,
        Err(code) => code,
    }
}

/// Borrow an instance from a raw pointer, rejecting null.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const FireParticlesInstance,
) -> Result<&'a FireParticlesInstance, DefaultFireParticlesError> {
    // SAFETY: callers of the extern functions guarantee `ptr` is null or came
    // from `fire_particles_new` and has not been destroyed.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireParticlesError::null_pointer("ptr"))
}

/// Run `func` with shared access to the field.
pub(crate) fn with_field<F, T>(
    instance: &FireParticlesInstance,
    func: F,
) -> Result<T, DefaultFireParticlesError>
where
    F: FnOnce(&ParticleField) -> T,
{
    let field = instance
        .field
        .read()
        .map_err(|_| DefaultFireParticlesError::lock_poisoned("RwLock"))?;
    Ok(func(&field))
}

/// Run `func` with exclusive access to the field.
pub(crate) fn with_field_mut<F, T>(
    instance: &FireParticlesInstance,
    func: F,
) -> Result<T, DefaultFireParticlesError>
where
    F: FnOnce(&mut ParticleField) -> T,
{
    let mut field = instance
        .field
        .write()
        .map_err(|_| DefaultFireParticlesError::lock_poisoned("RwLock"))?;
    Ok(func(&mut field))
}
