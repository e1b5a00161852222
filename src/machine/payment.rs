//! Payment coordinator: running balance, transaction validation and the
//! change-making algorithm.

use tracing::{info, warn};

use crate::Cents;
use crate::hardware::Hardware;
use crate::model::{ButtonIndex, PaymentMethod, SelectionEvent};

use super::errors::MachineError;

/// Owns the funds/selection/change state of the current transaction.
///
/// All mutation goes through the methods here; the orchestrator and the
/// query surface only read.
#[derive(Debug, Default)]
pub struct PaymentCoordinator {
    funds_available: Cents,
    selected: Option<ButtonIndex>,
    product_cost: Option<Cents>,
    change_owed: Cents,
}

impl PaymentCoordinator {
    pub fn funds_available(&self) -> Cents {
        self.funds_available
    }

    pub fn change_owed(&self) -> Cents {
        self.change_owed
    }

    /// Credit a payment toward the current transaction.
    pub fn accept_funds(&mut self, method: &PaymentMethod) {
        let amount = method.amount();
        self.funds_available += amount;
        match method {
            PaymentMethod::Cash(value) => {
                info!(coin = %value, funds = %self.funds_available, "coin accepted");
            }
            PaymentMethod::Electronic { source, .. } => {
                info!(source, %amount, funds = %self.funds_available, "electronic payment accepted");
            }
        }
    }

    /// Record a selection and compute the change owed.
    ///
    /// With insufficient funds nothing is recorded: the user keeps their
    /// credit and can add more coins and press again.
    pub fn on_selection(&mut self, selection: &SelectionEvent) -> Result<(), MachineError> {
        let Some(change) = self.funds_available.checked_sub(selection.product_cost) else {
            return Err(MachineError::InsufficientFunds {
                product: selection.product_name.clone(),
                cost: selection.product_cost,
                available: self.funds_available,
            });
        };
        self.selected = Some(selection.button);
        self.product_cost = Some(selection.product_cost);
        self.change_owed = change;
        Ok(())
    }

    /// True iff the recorded selection is covered by the available funds.
    pub fn is_valid_transaction(&self) -> bool {
        self.product_cost
            .is_some_and(|cost| self.funds_available >= cost)
    }

    /// Make change from the coin racks, largest usable denomination first.
    ///
    /// Greedy and denomination-exact: each round picks the largest kind
    /// whose value fits in the remaining owed amount and whose rack still
    /// holds a coin, releases exactly one, and repeats. When no kind fits
    /// the loop stops and the remainder stays on the balance as credit for
    /// the next transaction. This can miss exact solutions a full
    /// coin-change search would find; the residual-credit fallback is the
    /// accepted outcome. Returns the residual.
    pub fn dispense_change(&mut self, hardware: &mut Hardware) -> Cents {
        while !self.change_owed.is_zero() {
            let best = hardware
                .coin_racks()
                .iter()
                .enumerate()
                .filter(|(_, rack)| rack.count() > 0 && rack.kind() <= self.change_owed)
                .max_by_key(|(_, rack)| rack.kind())
                .map(|(rack, _)| rack);

            let Some(rack) = best else {
                break;
            };

            match hardware.release_coin(rack) {
                Ok(kind) => self.change_owed -= kind,
                Err(fault) => {
                    // Chute full or a rack fault mid-sequence; remainder
                    // stays owed and turns into credit below.
                    warn!(rack, %fault, "coin release failed during change");
                    break;
                }
            }
        }

        let residual = self.change_owed;
        if !residual.is_zero() {
            warn!(%residual, "racks could not cover change, residual kept as credit");
        }
        self.funds_available = residual;
        self.change_owed = Cents::ZERO;
        self.selected = None;
        self.product_cost = None;
        residual
    }

    /// Sweep receptacle coins into racks/storage. Runs unconditionally at
    /// settlement, even when change-making left residual credit.
    pub fn store_coins(&self, hardware: &mut Hardware) {
        hardware.move_receptacle_to_storage();
    }

    /// Machine went out of order: the transaction is abandoned wholesale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
