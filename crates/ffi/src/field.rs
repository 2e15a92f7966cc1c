use crate::error::{DefaultFireParticlesError, FireParticlesErrorCode};
use crate::helpers::{
    handle_ffi_result_error, instance_from_ptr, track_error, with_field, with_field_mut,
};
use crate::instance::FireParticlesInstance;

/// Advance the field by one frame.
///
/// Thread-safe: acquires the `RwLock` write lock.
///
/// Returns
/// - `FireParticlesErrorCode::Ok` on success
/// - `FireParticlesErrorCode::NullPointer` if `ptr` is null
/// - `FireParticlesErrorCode::LockPoisoned` if the internal lock is poisoned
#[no_mangle]
pub extern "C" fn fire_particles_step(ptr: *const FireParticlesInstance) -> FireParticlesErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_field_mut(instance, fire_particles_core::ParticleField::step)
    })
}

/// Change the particle count. A different count discards every particle and
/// allocates a fresh set; the next copied frame reports all buffers dirty.
///
/// Returns `InvalidParticleCount` for 0; the field is left unchanged.
#[no_mangle]
pub extern "C" fn fire_particles_set_particle_count(
    ptr: *const FireParticlesInstance,
    particle_count: usize,
) -> FireParticlesErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_field_mut(instance, |field| field.set_particle_count(particle_count))??;
        Ok(())
    })
}

/// Set the upward drift scale. Returns `InvalidParameter` for negative or non-finite values.
#[no_mangle]
pub extern "C" fn fire_particles_set_fire_intensity(
    ptr: *const FireParticlesInstance,
    fire_intensity: f32,
) -> FireParticlesErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_field_mut(instance, |field| field.set_fire_intensity(fire_intensity))??;
        Ok(())
    })
}

/// Set the horizontal drift scale. Returns `InvalidParameter` for negative or non-finite values.
#[no_mangle]
pub extern "C" fn fire_particles_set_wind_speed(
    ptr: *const FireParticlesInstance,
    wind_speed: f32,
) -> FireParticlesErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_field_mut(instance, |field| field.set_wind_speed(wind_speed))??;
        Ok(())
    })
}

/// Number of particles currently in the field.
///
/// Size the host buffers as `3 * len` floats for positions and colors and
/// `len` floats for sizes.
///
/// # Safety
/// `out_len` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn fire_particles_get_len(
    ptr: *const FireParticlesInstance,
    out_len: *mut usize,
) -> FireParticlesErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFireParticlesError::null_pointer("out_len"));
    }
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let len = with_field(instance, fire_particles_core::ParticleField::len)?;
        unsafe {
            *out_len = len;
        }
        Ok(())
    })
}

/// Buffer generation; changes whenever the particle set was reallocated.
///
/// Hosts that keep GPU buffers should recreate them when this changes.
///
/// # Safety
/// `out_generation` must be a valid, non-null pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn fire_particles_get_generation(
    ptr: *const FireParticlesInstance,
    out_generation: *mut u64,
) -> FireParticlesErrorCode {
    if out_generation.is_null() {
        return track_error(&DefaultFireParticlesError::null_pointer("out_generation"));
    }
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let generation = with_field(instance, fire_particles_core::ParticleField::generation)?;
        unsafe {
            *out_generation = generation;
        }
        Ok(())
    })
}
