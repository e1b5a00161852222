//! The vending machine engine.
//!
//! Turns hardware events (coin accepted, button pressed, out-of-order
//! signal) into purchase transactions: validating funds, releasing the
//! product, making change from the coin racks and settling receptacle
//! coins into storage. One mediator dispatches events directly to the
//! coordinators; there are no subscriber lists.

use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::Cents;
use crate::hardware::{Delivered, Hardware};
use crate::model::{
    ButtonIndex, Event, MachineStatus, PaymentMethod, RackIndex, SelectionEvent,
};

mod payment;
pub use payment::PaymentCoordinator;

mod selection;
pub use selection::SelectionCoordinator;

mod errors;
pub use errors::{ErrorCoordinator, ErrorSignal, MachineError};

use crate::hardware::ConfigError;

/// Where the orchestrator is within the purchase protocol.
///
/// The whole sequence runs to completion inside one event, so between
/// events the phase is always `Idle` or `Blocked`; the intermediate states
/// exist to keep the protocol explicit and observable in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Selected,
    Validated,
    Dispensed,
    Settled,
    /// Machine is out of order; selection events are refused at entry.
    Blocked,
}

/// The vending machine: hardware inventory plus the payment, selection and
/// error coordinators, mediated by one event-application loop.
#[derive(Debug)]
pub struct VendingMachine {
    hardware: Hardware,
    payment: PaymentCoordinator,
    selection: SelectionCoordinator,
    errors: ErrorCoordinator,
    status: MachineStatus,
    phase: Phase,
}

/// Public API
impl VendingMachine {
    /// Build a machine with the given geometry. One coin rack per kind, in
    /// the order given (not value order), and one product rack per selection
    /// button.
    pub fn new(
        coin_kinds: &[Cents],
        button_count: usize,
        coin_rack_capacity: usize,
        product_rack_capacity: usize,
        receptacle_capacity: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            hardware: Hardware::new(
                coin_kinds,
                button_count,
                coin_rack_capacity,
                product_rack_capacity,
                receptacle_capacity,
            )?,
            payment: PaymentCoordinator::default(),
            selection: SelectionCoordinator::new(button_count),
            errors: ErrorCoordinator::default(),
            status: MachineStatus::Active,
            phase: Phase::Idle,
        })
    }

    /// Run the machine over an event stream, one event fully processed
    /// before the next. Failed events latch the error signal but never stop
    /// the machine.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Event> + Unpin) {
        while let Some(event) = stream.next().await {
            let _ = self.apply(event);
        }
    }

    /// Apply a single event on top of the current machine state.
    ///
    /// Every error is also latched into the error signal, so callers that
    /// drop the result still leave the machine observably consistent.
    pub fn apply(&mut self, event: Event) -> Result<(), MachineError> {
        let result = match event {
            Event::CoinAccepted { value } => {
                let result = self.apply_coin(value);
                Self::log_result("coin", &result);
                result
            }
            Event::ElectronicPayment { source, amount } => {
                let result = self.apply_electronic(source, amount);
                Self::log_result("electronic payment", &result);
                result
            }
            Event::ButtonPressed { button } => {
                let result = self.apply_button(button);
                Self::log_result("button press", &result);
                result
            }
            Event::OutOfOrderChanged { out_of_order } => {
                let result = self.apply_status_change(out_of_order);
                Self::log_result("status change", &result);
                result
            }
            Event::Configure { products } => {
                let result = self
                    .selection
                    .configure(products)
                    .map_err(MachineError::from);
                Self::log_result("configure", &result);
                result
            }
            Event::LoadCoins { counts } => {
                let result = self
                    .hardware
                    .load_coins(&counts)
                    .map_err(MachineError::from);
                Self::log_result("load coins", &result);
                result
            }
            Event::LoadProducts { counts } => {
                let result = self
                    .hardware
                    .load_products(&counts)
                    .map_err(MachineError::from);
                Self::log_result("load products", &result);
                result
            }
        };

        if let Err(e) = &result {
            self.errors.report(e.to_string());
        }
        result
    }

    // Query surface

    /// Funds credited since the last settlement or out-of-order reset.
    pub fn funds_inserted(&self) -> Cents {
        self.payment.funds_available()
    }

    pub fn selected_button(&self) -> Option<ButtonIndex> {
        self.selection.last_selection().map(|s| s.button)
    }

    pub fn selected_product_name(&self) -> Option<&str> {
        self.selection.last_selection().map(|s| s.product_name.as_str())
    }

    pub fn selected_product_cost(&self) -> Option<Cents> {
        self.selection.last_selection().map(|s| s.product_cost)
    }

    pub fn is_out_of_order(&self) -> bool {
        self.status == MachineStatus::OutOfOrder
    }

    /// The latched error flag and message.
    pub fn error_signal(&self) -> (bool, &str) {
        self.errors.signal()
    }

    pub fn coins_remaining_in_rack(&self, rack: RackIndex) -> Option<usize> {
        self.hardware.coins_in_rack(rack)
    }

    pub fn products_remaining_in_rack(&self, rack: RackIndex) -> Option<usize> {
        self.hardware.products_in_rack(rack)
    }

    pub fn coin_rack_count(&self) -> usize {
        self.hardware.coin_racks().len()
    }

    pub fn button_count(&self) -> usize {
        self.selection.button_count()
    }

    /// Contents of the delivery chute, in release order.
    pub fn delivered(&self) -> &[Delivered] {
        self.hardware.chute()
    }

    /// Scoop everything out of the delivery chute.
    pub fn take_delivered(&mut self) -> Vec<Delivered> {
        self.hardware.take_chute()
    }
}

/// Private API
impl VendingMachine {
    /// Small helper to log `apply` results
    fn log_result(event_kind: &str, result: &Result<(), MachineError>) {
        match result {
            Ok(()) => info!("{event_kind} applied"),
            Err(e) => info!(reason = %e, "{event_kind} refused"),
        }
    }

    /// A coin passed the validator. Unconfigured denominations and a full
    /// receptacle both reject the coin to the return slot with no credit.
    fn apply_coin(&mut self, value: Cents) -> Result<(), MachineError> {
        if self.hardware.rack_for_kind(value).is_none() {
            warn!(coin = %value, "unrecognized coin rejected");
            self.hardware.return_coin(value);
            return Ok(());
        }
        if !self.hardware.accept_coin(value) {
            warn!(coin = %value, "receptacle full, coin rejected");
            self.hardware.return_coin(value);
            return Ok(());
        }
        self.accept_funds(PaymentMethod::Cash(value));
        Ok(())
    }

    fn apply_electronic(&mut self, source: String, amount: Cents) -> Result<(), MachineError> {
        self.accept_funds(PaymentMethod::Electronic { source, amount });
        Ok(())
    }

    /// Accepted funds always clear the latched error, whatever latched it.
    fn accept_funds(&mut self, method: PaymentMethod) {
        self.payment.accept_funds(&method);
        self.errors.clear_on_funds();
    }

    /// A selection button was pressed: run the purchase protocol.
    ///
    /// The out-of-order check happens here, before any coordinator sees the
    /// press; an in-flight sequence is never interrupted because the whole
    /// sequence completes within one event.
    fn apply_button(&mut self, button: ButtonIndex) -> Result<(), MachineError> {
        if self.phase == Phase::Blocked {
            return Err(MachineError::MachineOutOfOrder);
        }

        let event = self.selection.on_button_pressed(button)?;
        self.purchase(&event)
    }

    /// Drive validate -> release product -> dispense change -> settle.
    fn purchase(&mut self, event: &SelectionEvent) -> Result<(), MachineError> {
        self.phase = Phase::Selected;

        if let Err(e) = self.payment.on_selection(event) {
            // Insufficient funds: credit stays, user can add coins and retry.
            self.phase = Phase::Idle;
            return Err(e);
        }
        if !self.payment.is_valid_transaction() {
            self.phase = Phase::Idle;
            return Ok(());
        }
        self.phase = Phase::Validated;

        // Product rack index equals button index (1:1 mapping).
        if let Err(fault) = self.hardware.release_product(event.button) {
            // No partial charge: funds stay credited, nothing is settled.
            self.phase = Phase::Idle;
            return Err(fault.into());
        }
        self.phase = Phase::Dispensed;

        // Both settlement steps run unconditionally once the product is out,
        // even when change-making leaves residual credit.
        let residual = self.payment.dispense_change(&mut self.hardware);
        self.payment.store_coins(&mut self.hardware);
        self.phase = Phase::Settled;

        info!(
            button = event.button,
            product = %event.product_name,
            cost = %event.product_cost,
            %residual,
            "purchase settled"
        );
        self.phase = Phase::Idle;
        Ok(())
    }

    /// The hardware out-of-order indicator flipped.
    fn apply_status_change(&mut self, out_of_order: bool) -> Result<(), MachineError> {
        let status = if out_of_order {
            MachineStatus::OutOfOrder
        } else {
            MachineStatus::Active
        };
        if status == self.status {
            return Ok(());
        }

        self.status = status;
        self.errors.on_machine_status_changed(status);
        match status {
            MachineStatus::OutOfOrder => {
                // The live transaction is abandoned: funds and selection
                // reset, receptacle coins stay where they are.
                self.phase = Phase::Blocked;
                self.payment.reset();
                self.selection.reset();
                warn!("machine out of order");
            }
            MachineStatus::Active => {
                self.phase = Phase::Idle;
                info!("machine back in service");
            }
        }
        Ok(())
    }
}
