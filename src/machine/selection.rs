//! Selection coordinator: the button-to-product catalog and the last-known
//! selection snapshot.

use crate::hardware::ConfigError;
use crate::model::{ButtonIndex, ProductKind, SelectionEvent};

use super::errors::MachineError;

/// Maps selection buttons to product slots, fixed-size from construction.
///
/// Slots start blank (name `" "`, cost 1 cent) until a `Configure` event
/// replaces the catalog.
#[derive(Debug)]
pub struct SelectionCoordinator {
    catalog: Vec<ProductKind>,
    last: Option<SelectionEvent>,
}

impl SelectionCoordinator {
    pub fn new(button_count: usize) -> Self {
        Self {
            catalog: (0..button_count).map(|_| ProductKind::default()).collect(),
            last: None,
        }
    }

    pub fn button_count(&self) -> usize {
        self.catalog.len()
    }

    /// Replace the whole catalog, one product per button.
    pub fn configure(&mut self, products: Vec<ProductKind>) -> Result<(), ConfigError> {
        if products.len() != self.catalog.len() {
            return Err(ConfigError::WrongLength {
                expected: self.catalog.len(),
                actual: products.len(),
            });
        }
        for (i, product) in products.iter().enumerate() {
            if product.name.is_empty() {
                return Err(ConfigError::EmptyProductName(i));
            }
            if product.cost.is_zero() {
                return Err(ConfigError::ZeroProductCost(i));
            }
        }
        self.catalog = products;
        Ok(())
    }

    /// Validate a button press and republish it as a selection event.
    ///
    /// An out-of-range index produces no event and leaves the snapshot
    /// untouched.
    pub fn on_button_pressed(
        &mut self,
        button: ButtonIndex,
    ) -> Result<SelectionEvent, MachineError> {
        let Some(product) = self.catalog.get(button) else {
            return Err(MachineError::InvalidSelection {
                button,
                buttons: self.catalog.len(),
            });
        };
        let event = SelectionEvent {
            button,
            product_name: product.name.clone(),
            product_cost: product.cost,
        };
        self.last = Some(event.clone());
        Ok(event)
    }

    /// Last published selection, for read-only display queries.
    pub fn last_selection(&self) -> Option<&SelectionEvent> {
        self.last.as_ref()
    }

    /// Machine went out of order: the pending selection is abandoned.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
