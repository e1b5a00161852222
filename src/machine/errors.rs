//! Error taxonomy and the error coordinator's latched signal.

use thiserror::Error;

use crate::Cents;
use crate::hardware::{ConfigError, DispenseFault};
use crate::model::{ButtonIndex, MachineStatus};

/// Top-level error returned by [`VendingMachine::apply`](super::VendingMachine::apply).
///
/// None of these are fatal: the machine latches the message into the error
/// signal and keeps accepting events.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("insufficient funds for {product}: costs {cost}, inserted {available}")]
    InsufficientFunds {
        product: String,
        cost: Cents,
        available: Cents,
    },

    #[error("invalid selection {button}: machine has {buttons} buttons")]
    InvalidSelection {
        button: ButtonIndex,
        buttons: usize,
    },

    #[error("dispense failed: {0}")]
    Dispense(#[from] DispenseFault),

    #[error("machine out of order")]
    MachineOutOfOrder,

    #[error("configuration rejected: {0}")]
    Configuration(#[from] ConfigError),
}

/// The latched error flag plus its message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSignal {
    pub active: bool,
    pub message: String,
}

/// Aggregates failures from every coordinator into one observable signal.
///
/// Last writer wins; there is no queue. The signal clears only when new
/// funds are accepted, never by time passing or by a later successful
/// dispense.
#[derive(Debug, Default)]
pub struct ErrorCoordinator {
    signal: ErrorSignal,
}

impl ErrorCoordinator {
    pub const OUT_OF_ORDER_MESSAGE: &'static str = "machine out of order";

    /// Latch the signal with a new message, replacing any previous one.
    pub fn report(&mut self, message: impl Into<String>) {
        self.signal = ErrorSignal {
            active: true,
            message: message.into(),
        };
    }

    /// New funds were accepted: drop the latched signal.
    pub fn clear_on_funds(&mut self) {
        self.signal = ErrorSignal::default();
    }

    /// Transitioning to out-of-order latches a fixed message. Returning to
    /// active does not clear it; only new funds do.
    pub fn on_machine_status_changed(&mut self, status: MachineStatus) {
        if status == MachineStatus::OutOfOrder {
            self.report(Self::OUT_OF_ORDER_MESSAGE);
        }
    }

    pub fn signal(&self) -> (bool, &str) {
        (self.signal.active, &self.signal.message)
    }
}
