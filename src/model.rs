//! Core domain types for the vending machine engine.

use crate::Cents;

/// Index of a coin or product rack within the machine.
pub type RackIndex = usize;

/// Index of a selection button; maps 1:1 to a product rack.
pub type ButtonIndex = usize;

/// A hardware or configuration event delivered to the machine.
///
/// Events are processed one at a time and to completion; there is never more
/// than one in-flight transaction.
#[derive(Debug, Clone)]
pub enum Event {
    /// The coin validator accepted a coin of the given denomination.
    CoinAccepted { value: Cents },
    /// A cashless payment source credited the given amount.
    ElectronicPayment { source: String, amount: Cents },
    /// The user pressed a selection button.
    ButtonPressed { button: ButtonIndex },
    /// The out-of-order indicator changed state.
    OutOfOrderChanged { out_of_order: bool },
    /// Replace the product catalog, one entry per selection button.
    Configure { products: Vec<ProductKind> },
    /// Load coin racks with the given counts, one entry per rack.
    LoadCoins { counts: Vec<usize> },
    /// Load product racks with the given counts, one entry per rack.
    LoadProducts { counts: Vec<usize> },
}

/// How funds entered the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// A physical coin of the given denomination, now in the receptacle.
    Cash(Cents),
    /// Credit from a cashless source; nothing enters the receptacle.
    Electronic { source: String, amount: Cents },
}

impl PaymentMethod {
    /// The amount this payment credits toward the transaction.
    pub fn amount(&self) -> Cents {
        match self {
            PaymentMethod::Cash(value) => *value,
            PaymentMethod::Electronic { amount, .. } => *amount,
        }
    }
}

/// A product slot: name and price, one per selection button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductKind {
    pub name: String,
    pub cost: Cents,
}

impl ProductKind {
    pub fn new(name: impl Into<String>, cost: Cents) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

impl Default for ProductKind {
    /// Unconfigured slots carry a blank name and a 1 cent price.
    fn default() -> Self {
        Self {
            name: " ".to_string(),
            cost: Cents::new(1),
        }
    }
}

/// Whether the machine is accepting transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineStatus {
    #[default]
    Active,
    OutOfOrder,
}

/// A normalized selection, republished by the selection coordinator once the
/// button index has been validated against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub button: ButtonIndex,
    pub product_name: String,
    pub product_cost: Cents,
}
