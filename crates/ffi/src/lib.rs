//! C ABI for the fire particle field.
//!
//! Lets a host engine (Unreal, Godot, a C++ renderer) own the frame loop:
//! create an instance, call `fire_particles_step` once per frame, then
//! `fire_particles_copy_frame` into its own vertex buffers. Every fallible
//! call returns a `FireParticlesErrorCode`; details are available from
//! `fire_particles_get_last_error` on the same thread.

mod error;
mod field;
mod frame;
mod helpers;
mod instance;

pub use error::{
    fire_particles_get_last_error, fire_particles_get_last_error_code, FireParticlesErrorCode,
};
pub use field::{
    fire_particles_get_generation, fire_particles_get_len, fire_particles_set_fire_intensity,
    fire_particles_set_particle_count, fire_particles_set_wind_speed, fire_particles_step,
};
pub use frame::{fire_particles_copy_frame, FireParticlesDirtyFlags};
pub use instance::{
    fire_particles_default_settings, fire_particles_destroy, fire_particles_new,
    fire_particles_new_seeded, FireParticlesInstance, FireParticlesSettings,
};
