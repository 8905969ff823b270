//! Status indication trait

/// Conditions the storage core reports to the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageSignal {
    /// New-page count reached the near-full threshold
    NearlyFull,
    /// A byte write was not acknowledged in time
    WriteFailure,
}

/// Receiver for storage conditions (typically a status LED)
///
/// The log raises a signal and carries on; implementations must not
/// expect the log to halt or retry.
pub trait StatusSignal {
    /// Report a condition
    fn signal(&mut self, signal: StorageSignal);
}

/// Discards every signal
impl StatusSignal for () {
    fn signal(&mut self, _signal: StorageSignal) {}
}

impl<T: StatusSignal + ?Sized> StatusSignal for &mut T {
    fn signal(&mut self, signal: StorageSignal) {
        T::signal(self, signal)
    }
}
