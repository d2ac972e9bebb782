//! Coalescing "something changed" signal between mutators and the notifier.
//!
//! Producers (request handlers, the refresh loop) call [`ChangeSignal::notify`];
//! the single consumer (the notifier loop) calls [`ChangeSignal::take`]. Any
//! number of notifications between two takes collapse into one pending set.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Kind of mutation that raised the signal. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A foreign rate changed during a refresh.
    RateChanged,
    /// A `set` batch changed at least one balance.
    BalanceSet,
    /// A `modify` batch was applied.
    BalanceModified,
}

impl ChangeKind {
    const ALL: [Self; 3] = [Self::RateChanged, Self::BalanceSet, Self::BalanceModified];

    const fn bit(self) -> u8 {
        match self {
            Self::RateChanged => 0b001,
            Self::BalanceSet => 0b010,
            Self::BalanceModified => 0b100,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::RateChanged => "rate_changed",
            Self::BalanceSet => "balance_set",
            Self::BalanceModified => "balance_modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of change kinds drained in one take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSet(u8);

impl ChangeSet {
    /// Returns true if `kind` happened since the previous take.
    #[must_use]
    pub const fn contains(self, kind: ChangeKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if no change is recorded.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Recorded kinds in a fixed order.
    pub fn kinds(self) -> impl Iterator<Item = ChangeKind> {
        ChangeKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

/// Bounded, deduplicating change signal. Safe for many producers and one consumer.
#[derive(Debug, Default)]
pub struct ChangeSignal {
    pending: AtomicU8,
}

impl ChangeSignal {
    /// Creates a signal with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
        }
    }

    /// Records that a change of `kind` happened.
    pub fn notify(&self, kind: ChangeKind) {
        self.pending.fetch_or(kind.bit(), Ordering::AcqRel);
    }

    /// Returns true if a change is waiting to be drained.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire) != 0
    }

    /// Drains the pending indication, if any.
    pub fn take(&self) -> Option<ChangeSet> {
        let bits = self.pending.swap(0, Ordering::AcqRel);
        (bits != 0).then_some(ChangeSet(bits))
    }
}
