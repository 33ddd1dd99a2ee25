//! Level-triggered notification flags
//!
//! Producers (edge handlers, button tasks, the setpoint controller) set
//! named flags; a single consumer polls and clears them. Setting a flag
//! that is already set is a no-op, and several conditions may be pending
//! at once.

use core::ops::{BitOr, BitOrAssign};

use portable_atomic::{AtomicU32, Ordering};

/// A set of notification flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags(u32);

impl Flags {
    /// Nothing pending
    pub const NONE: Flags = Flags(0);
    /// Displayed state changed and should be redrawn
    pub const UI_REFRESH_REQUESTED: Flags = Flags(1 << 0);
    /// New measurements are available (or should be fetched after wake)
    pub const DATA_READY: Flags = Flags(1 << 1);
    /// The user asked to confirm the pending setpoint
    pub const CONFIRM_REQUESTED: Flags = Flags(1 << 2);
    /// The user asked to switch between fine and coarse steps
    pub const STEP_TOGGLE_REQUESTED: Flags = Flags(1 << 3);
    /// The decoder committed at least one detent
    pub const ROTATION_UPDATE: Flags = Flags(1 << 4);

    /// Every defined flag
    pub const ALL: Flags = Flags(0b1_1111);

    /// Raw bit representation
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, dropping undefined ones
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Flags(bits & Self::ALL.0)
    }

    /// True if no flag is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set here
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any flag in `other` is also set here
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

/// Shared, lock-free flag register
///
/// Safe to set from interrupt context. `const`-constructible so it can
/// live in a `static`.
pub struct EventFlags {
    bits: AtomicU32,
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFlags {
    /// Create an empty flag register
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
        }
    }

    /// Raise flags (OR-combine)
    pub fn set(&self, flags: Flags) {
        self.bits.fetch_or(flags.0, Ordering::AcqRel);
    }

    /// Clear flags without observing them
    pub fn clear(&self, flags: Flags) {
        self.bits.fetch_and(!flags.0, Ordering::AcqRel);
    }

    /// Consume the flags in `mask` that are currently set
    ///
    /// The returned set is cleared atomically; flags outside `mask` are
    /// left untouched for other consumers.
    pub fn take(&self, mask: Flags) -> Flags {
        let prev = self.bits.fetch_and(!mask.0, Ordering::AcqRel);
        Flags(prev & mask.0)
    }

    /// Look at the pending flags without clearing them
    pub fn peek(&self) -> Flags {
        Flags(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_idempotent() {
        let flags = EventFlags::new();
        flags.set(Flags::CONFIRM_REQUESTED);
        flags.set(Flags::CONFIRM_REQUESTED);
        assert_eq!(flags.peek(), Flags::CONFIRM_REQUESTED);
    }

    #[test]
    fn test_flags_combine() {
        let flags = EventFlags::new();
        flags.set(Flags::ROTATION_UPDATE | Flags::UI_REFRESH_REQUESTED);
        assert!(flags.peek().contains(Flags::ROTATION_UPDATE));
        assert!(flags.peek().contains(Flags::UI_REFRESH_REQUESTED));
        assert!(!flags.peek().intersects(Flags::DATA_READY));
    }

    #[test]
    fn test_take_clears_only_mask() {
        let flags = EventFlags::new();
        flags.set(Flags::ROTATION_UPDATE | Flags::STEP_TOGGLE_REQUESTED);

        let taken = flags.take(Flags::ROTATION_UPDATE | Flags::CONFIRM_REQUESTED);
        assert_eq!(taken, Flags::ROTATION_UPDATE);

        // Untouched flag stays pending for its own consumer
        assert_eq!(flags.peek(), Flags::STEP_TOGGLE_REQUESTED);

        // Second take observes nothing
        assert!(flags.take(Flags::ROTATION_UPDATE).is_empty());
    }

    #[test]
    fn test_clear() {
        let flags = EventFlags::new();
        flags.set(Flags::ALL);
        flags.clear(Flags::DATA_READY);
        assert!(!flags.peek().contains(Flags::DATA_READY));
        assert!(flags.peek().contains(Flags::CONFIRM_REQUESTED));
    }

    #[test]
    fn test_from_bits_truncate() {
        assert_eq!(Flags::from_bits_truncate(0xFFFF_FFFF), Flags::ALL);
        assert_eq!(Flags::from_bits_truncate(1 << 2), Flags::CONFIRM_REQUESTED);
    }
}
