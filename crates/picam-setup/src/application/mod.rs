//! Application layer: one module per use case.
//!
//! Use cases hold the orchestration logic and define the collaborator traits
//! they drive; the infrastructure layer supplies the real adapters (file
//! store, apt, systemctl, usermod, chmod) and tests supply recording mocks.

pub mod doctor;
pub mod enable_camera;
pub mod install;
pub mod set_config;
