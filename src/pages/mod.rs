// src/pages/mod.rs
//
// One panel per controller, all mounted into #app-container.  Pages own the
// DOM and re-render from their controller's getters whenever it reports a
// change.

pub mod metadata;
pub mod schedule;
pub mod status;

pub use metadata::mount_metadata;
pub use schedule::mount_schedule;
pub use status::mount_status;
