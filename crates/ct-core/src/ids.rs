use core::fmt;
use core::num::NonZeroU32;

/// Index of a signal slot inside an initialised block system.
///
/// Stored as index+1 so `Option<SignalId>` stays the size of a `u32`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(NonZeroU32);

impl SignalId {
    /// Create a `SignalId` from a 0-based slot index.
    ///
    /// Returns `None` only for `u32::MAX`, which has no successor.
    pub fn from_index(index: usize) -> Option<Self> {
        let raw = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(raw).map(Self)
    }

    /// Recover the 0-based slot index.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalId({})", self.index())
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_id_round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            let id = SignalId::from_index(i).unwrap();
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn signal_id_rejects_overflow() {
        assert!(SignalId::from_index(u32::MAX as usize).is_none());
    }

    #[test]
    fn option_signal_id_is_small() {
        assert_eq!(
            core::mem::size_of::<SignalId>(),
            core::mem::size_of::<Option<SignalId>>()
        );
    }
}
