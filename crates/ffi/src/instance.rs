use fire_particles_core::{FieldConfig, ParticleField, RespawnHeight};
use std::ptr;
use std::sync::RwLock;

use crate::error::{DefaultFireParticlesError, FireParticlesErrorCode};
use crate::helpers::{track_error, track_result};

/// C-compatible field settings.
///
/// Mirrors the core `FieldConfig`:
/// - `respawn_at_ground`: recycled particles restart at y = 0 instead of a random height
/// - `horizontal_limit`: clamp for |x| and |z|; `0` disables clamping
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParticlesSettings {
    pub particle_count: usize,
    pub fire_intensity: f32,
    pub wind_speed: f32,
    pub respawn_at_ground: bool,
    pub horizontal_limit: f32,
}

impl From<FireParticlesSettings> for FieldConfig {
    fn from(settings: FireParticlesSettings) -> Self {
        FieldConfig {
            particle_count: settings.particle_count,
            fire_intensity: settings.fire_intensity,
            wind_speed: settings.wind_speed,
            respawn_height: if settings.respawn_at_ground {
                RespawnHeight::Ground
            } else {
                RespawnHeight::Uniform
            },
            // Anything other than exactly 0 goes through validation
            horizontal_limit: if settings.horizontal_limit == 0.0 {
                None
            } else {
                Some(settings.horizontal_limit)
            },
        }
    }
}

impl From<FieldConfig> for FireParticlesSettings {
    fn from(config: FieldConfig) -> Self {
        FireParticlesSettings {
            particle_count: config.particle_count,
            fire_intensity: config.fire_intensity,
            wind_speed: config.wind_speed,
            respawn_at_ground: config.respawn_height == RespawnHeight::Ground,
            horizontal_limit: config.horizontal_limit.unwrap_or(0.0),
        }
    }
}

/// The fire particle context handed to host engines.
///
/// # Thread Safety
/// The field is protected by an `RwLock`:
/// - **Multiple concurrent readers** (length and frame copies): `.read()` lock
/// - **Exclusive writer** (step and configuration changes): `.write()` lock
///
/// A typical host calls `fire_particles_step` then `fire_particles_copy_frame`
/// once per rendered frame from the same thread.
///
/// ## Unreal Engine Example
/// ```cpp
/// FireParticlesInstance* Fire = nullptr;
///
/// void AFireActor::BeginPlay() {
///     FireParticlesSettings Settings = fire_particles_default_settings();
///     if (fire_particles_new(Settings, &Fire) != FireParticlesErrorCode::Ok) {
///         UE_LOG(LogTemp, Error, TEXT("%hs"), fire_particles_get_last_error());
///     }
/// }
///
/// void AFireActor::Tick(float DeltaTime) {
///     fire_particles_step(Fire);
///     FireParticlesDirtyFlags Dirty;
///     fire_particles_copy_frame(Fire, Positions.GetData(), Positions.Num(),
///                               Colors.GetData(), Colors.Num(),
///                               Sizes.GetData(), Sizes.Num(), &Dirty);
/// }
///
/// void AFireActor::EndPlay(const EEndPlayReason::Type Reason) {
///     fire_particles_destroy(Fire);
///     Fire = nullptr;
/// }
/// ```
pub struct FireParticlesInstance {
    pub(crate) field: RwLock<ParticleField>,
}

impl FireParticlesInstance {
    /// Creates a new instance; `seed` fixes the random stream when present.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParticleCount` or `InvalidParameter` when the settings fail validation.
    pub(crate) fn new(
        settings: FireParticlesSettings,
        seed: Option<u64>,
    ) -> Result<Box<Self>, DefaultFireParticlesError> {
        let config = FieldConfig::from(settings);
        let field = match seed {
            Some(seed) => ParticleField::with_seed(config, seed)?,
            None => ParticleField::new(config)?,
        };

        Ok(Box::new(Self {
            field: RwLock::new(field),
        }))
    }
}

/// Settings matching the classic effect: 5000 particles, intensity 50, wind 20.
#[no_mangle]
pub extern "C" fn fire_particles_default_settings() -> FireParticlesSettings {
    FieldConfig::default().into()
}

unsafe fn store_new_instance(
    result: Result<Box<FireParticlesInstance>, DefaultFireParticlesError>,
    out_instance: *mut *mut FireParticlesInstance,
) -> FireParticlesErrorCode {
    match track_result(result) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireParticlesErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a new fire particle field and return it via out-parameter.
///
/// Returns
/// - `FireParticlesErrorCode::Ok` (0) - success, `out_instance` contains valid pointer
/// - `FireParticlesErrorCode::NullPointer` - `out_instance` is null
/// - `FireParticlesErrorCode::InvalidParticleCount` - `particle_count` is 0
/// - `FireParticlesErrorCode::InvalidParameter` - negative or non-finite rate or limit
///
/// Call `fire_particles_get_last_error()` for a human-readable description.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `fire_particles_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fire_particles_new(
    settings: FireParticlesSettings,
    out_instance: *mut *mut FireParticlesInstance,
) -> FireParticlesErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireParticlesError::null_pointer("out_instance"));
    }
    unsafe { store_new_instance(FireParticlesInstance::new(settings, None), out_instance) }
}

/// Same as `fire_particles_new` but with a fixed random seed, for replays and tests.
///
/// # Safety
///
/// Same contract as `fire_particles_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_particles_new_seeded(
    settings: FireParticlesSettings,
    seed: u64,
    out_instance: *mut *mut FireParticlesInstance,
) -> FireParticlesErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireParticlesError::null_pointer("out_instance"));
    }
    unsafe {
        store_new_instance(
            FireParticlesInstance::new(settings, Some(seed)),
            out_instance,
        )
    }
}

/// Destroys an instance previously created by `fire_particles_new`.
///
/// If `ptr` is null, this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_particles_new` or `fire_particles_new_seeded`.
/// - The pointer MUST NOT be used after this call.
#[no_mangle]
pub unsafe extern "C" fn fire_particles_destroy(ptr: *mut FireParticlesInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer came from `Box::into_raw` in `store_new_instance`
    // and has not been freed, per the contract above.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
