use fire_particles_core::DirtyFlags;
use std::slice;

use crate::error::{DefaultFireParticlesError, FireParticlesErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error};
use crate::instance::FireParticlesInstance;

/// C-compatible dirty flags: which buffers changed since the last copy.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FireParticlesDirtyFlags {
    pub position: bool,
    pub color: bool,
    pub size: bool,
}

impl From<DirtyFlags> for FireParticlesDirtyFlags {
    fn from(flags: DirtyFlags) -> Self {
        Self {
            position: flags.position,
            color: flags.color,
            size: flags.size,
        }
    }
}

/// Copy the current frame into host-owned buffers and acknowledge the upload.
///
/// The copy happens under the write lock so a concurrent step or resize can
/// never produce buffers of mismatched length. After a successful copy the
/// field's dirty flags are cleared; the flags as they were before the copy
/// are written to `out_dirty`.
///
/// Buffer lengths are counted in floats:
/// - `positions_len` and `colors_len` must be at least `3 * len`
/// - `sizes_len` must be at least `len`
///
/// Returns
/// - `FireParticlesErrorCode::Ok` on success
/// - `FireParticlesErrorCode::NullPointer` if any pointer is null
/// - `FireParticlesErrorCode::BufferTooSmall` if any buffer is too short (nothing is copied)
/// - `FireParticlesErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be null or a live pointer returned by `fire_particles_new`.
/// - Each buffer pointer must be valid for writes of its stated length.
/// - `out_dirty` must be a valid, non-null pointer to writable memory.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// fire_particles_get_len(fire, &len);
/// std::vector<float> positions(len * 3), colors(len * 3), sizes(len);
/// FireParticlesDirtyFlags dirty;
/// fire_particles_copy_frame(fire, positions.data(), positions.size(),
///                           colors.data(), colors.size(),
///                           sizes.data(), sizes.size(), &dirty);
/// if (dirty.position) { upload(positions); }
/// ```
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn fire_particles_copy_frame(
    ptr: *const FireParticlesInstance,
    positions: *mut f32,
    positions_len: usize,
    colors: *mut f32,
    colors_len: usize,
    sizes: *mut f32,
    sizes_len: usize,
    out_dirty: *mut FireParticlesDirtyFlags,
) -> FireParticlesErrorCode {
    for (name, is_null) in [
        ("positions", positions.is_null()),
        ("colors", colors.is_null()),
        ("sizes", sizes.is_null()),
        ("out_dirty", out_dirty.is_null()),
    ] {
        if is_null {
            return track_error(&DefaultFireParticlesError::null_pointer(name));
        }
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let mut field = instance
            .field
            .write()
            .map_err(|_| DefaultFireParticlesError::lock_poisoned("RwLock"))?;

        let view = field.view();
        for (name, required, provided) in [
            ("positions", view.positions.len(), positions_len),
            ("colors", view.colors.len(), colors_len),
            ("sizes", view.sizes.len(), sizes_len),
        ] {
            if provided < required {
                return Err(DefaultFireParticlesError::buffer_too_small(
                    name, required, provided,
                ));
            }
        }

        // SAFETY: pointers are non-null and the caller guarantees each is
        // valid for its stated length, which we checked covers the frame.
        unsafe {
            slice::from_raw_parts_mut(positions, view.positions.len())
                .copy_from_slice(view.positions);
            slice::from_raw_parts_mut(colors, view.colors.len()).copy_from_slice(view.colors);
            slice::from_raw_parts_mut(sizes, view.sizes.len()).copy_from_slice(view.sizes);
            *out_dirty = view.dirty.into();
        }

        field.mark_uploaded();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{fire_particles_get_len, fire_particles_set_particle_count, fire_particles_step};
    use crate::instance::{
        fire_particles_default_settings, fire_particles_destroy, fire_particles_new_seeded,
        FireParticlesSettings,
    };
    use std::ptr;

    fn create(count: usize) -> *mut FireParticlesInstance {
        let mut instance = ptr::null_mut();
        let settings = FireParticlesSettings {
            particle_count: count,
            ..fire_particles_default_settings()
        };
        let code = unsafe { fire_particles_new_seeded(settings, 17, &mut instance) };
        assert_eq!(code, FireParticlesErrorCode::Ok);
        instance
    }

    fn copy(
        instance: *mut FireParticlesInstance,
        positions: &mut [f32],
        colors: &mut [f32],
        sizes: &mut [f32],
        dirty: &mut FireParticlesDirtyFlags,
    ) -> FireParticlesErrorCode {
        unsafe {
            fire_particles_copy_frame(
                instance,
                positions.as_mut_ptr(),
                positions.len(),
                colors.as_mut_ptr(),
                colors.len(),
                sizes.as_mut_ptr(),
                sizes.len(),
                dirty,
            )
        }
    }

    #[test]
    fn test_step_and_copy_frame() {
        let instance = create(8);
        let mut len = 0usize;
        assert_eq!(
            unsafe { fire_particles_get_len(instance, &mut len) },
            FireParticlesErrorCode::Ok
        );
        assert_eq!(len, 8);

        let mut positions = vec![f32::NAN; len * 3];
        let mut colors = vec![f32::NAN; len * 3];
        let mut sizes = vec![f32::NAN; len];
        let mut dirty = FireParticlesDirtyFlags::default();

        assert_eq!(fire_particles_step(instance), FireParticlesErrorCode::Ok);
        assert_eq!(
            copy(instance, &mut positions, &mut colors, &mut sizes, &mut dirty),
            FireParticlesErrorCode::Ok
        );
        assert!(dirty.position && dirty.color && dirty.size);
        assert!(positions.chunks_exact(3).all(|p| (0.0..=5.0).contains(&p[1])));
        assert!(colors.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(sizes.iter().all(|s| (0.0..2.0).contains(s)));

        // Nothing changed since the last copy
        assert_eq!(
            copy(instance, &mut positions, &mut colors, &mut sizes, &mut dirty),
            FireParticlesErrorCode::Ok
        );
        assert_eq!(dirty, FireParticlesDirtyFlags::default());

        unsafe { fire_particles_destroy(instance) };
    }

    #[test]
    fn test_copy_rejects_short_buffers() {
        let instance = create(4);
        fire_particles_set_particle_count(instance, 6);

        // Sized for the old count
        let mut positions = vec![0.0; 12];
        let mut colors = vec![0.0; 18];
        let mut sizes = vec![0.0; 6];
        let mut dirty = FireParticlesDirtyFlags::default();
        assert_eq!(
            copy(instance, &mut positions, &mut colors, &mut sizes, &mut dirty),
            FireParticlesErrorCode::BufferTooSmall
        );
        assert!(positions.iter().all(|&p| p == 0.0));

        unsafe { fire_particles_destroy(instance) };
    }

    #[test]
    fn test_null_instance() {
        assert_eq!(
            fire_particles_step(ptr::null()),
            FireParticlesErrorCode::NullPointer
        );
        let mut positions = [0.0; 3];
        let mut colors = [0.0; 3];
        let mut sizes = [0.0; 1];
        let mut dirty = FireParticlesDirtyFlags::default();
        assert_eq!(
            copy(
                ptr::null_mut(),
                &mut positions,
                &mut colors,
                &mut sizes,
                &mut dirty
            ),
            FireParticlesErrorCode::NullPointer
        );
    }
}
