//! Acquisition run flag

/// The run flag could not be locked in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunFlagBusy;

/// Shared boolean that gates periodic acquisition work
///
/// Owned by the acquisition layer and guarded by its own lock. Writers
/// must not block: if the lock is contended the write is reported as
/// [`RunFlagBusy`] and the caller retries later.
pub trait RunFlag {
    /// Try to set the flag
    fn try_set(&mut self, running: bool) -> Result<(), RunFlagBusy>;
}
