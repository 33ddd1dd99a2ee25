//! Capability traits
//!
//! These traits define the interface between the panel logic and the
//! collaborators it does not own: the presentation layer and the
//! acquisition layer's run flag.

pub mod observer;
pub mod run_flag;

pub use observer::{PowerObserver, SetpointObserver};
pub use run_flag::{RunFlag, RunFlagBusy};
