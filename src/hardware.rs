//! Physical inventory state behind the engine: coin racks, product racks,
//! the transient coin receptacle, the overflow storage bin and the delivery
//! chute.
//!
//! The engine never reaches into these structures directly; it goes through
//! the accessors and release commands here, so rack counts are only ever
//! mutated in one place.

use thiserror::Error;

use crate::Cents;
use crate::model::RackIndex;

/// Invalid machine geometry or load command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("coin kind at index {0} must be positive")]
    ZeroCoinKind(RackIndex),

    #[error("duplicate coin kind {1} at index {0}")]
    DuplicateCoinKind(RackIndex, Cents),

    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("expected {expected} entries, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("rack {rack}: count {count} exceeds capacity {capacity}")]
    OverCapacity {
        rack: RackIndex,
        count: usize,
        capacity: usize,
    },

    #[error("product {0} has an empty name")]
    EmptyProductName(usize),

    #[error("product {0} has zero cost")]
    ZeroProductCost(usize),
}

/// A physical release command that could not be carried out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispenseFault {
    #[error("coin rack {0} is empty")]
    CoinRackEmpty(RackIndex),

    #[error("product rack {0} is empty")]
    ProductRackEmpty(RackIndex),

    #[error("no rack at index {0}")]
    NoSuchRack(RackIndex),

    #[error("delivery chute is full")]
    ChuteFull,
}

/// A bounded stack of coins of one denomination.
#[derive(Debug)]
pub struct CoinRack {
    kind: Cents,
    count: usize,
    capacity: usize,
}

impl CoinRack {
    pub fn kind(&self) -> Cents {
        self.kind
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// A bounded stack of products of one kind.
#[derive(Debug)]
pub struct ProductRack {
    count: usize,
    capacity: usize,
}

/// Something physically delivered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    Coin(Cents),
    Product(RackIndex),
}

/// The machine's inventory hardware, fixed at construction time.
///
/// One coin rack per configured denomination (in configuration order, not
/// value order) and one product rack per selection button.
#[derive(Debug)]
pub struct Hardware {
    coin_racks: Vec<CoinRack>,
    product_racks: Vec<ProductRack>,
    receptacle: Vec<Cents>,
    receptacle_capacity: usize,
    storage_bin: Vec<Cents>,
    chute: Vec<Delivered>,
    chute_capacity: usize,
}

impl Hardware {
    /// Build the hardware arrangement. Coin kinds must be pairwise distinct
    /// and positive; every count and capacity must be positive.
    pub fn new(
        coin_kinds: &[Cents],
        button_count: usize,
        coin_rack_capacity: usize,
        product_rack_capacity: usize,
        receptacle_capacity: usize,
    ) -> Result<Self, ConfigError> {
        for (i, kind) in coin_kinds.iter().enumerate() {
            if kind.is_zero() {
                return Err(ConfigError::ZeroCoinKind(i));
            }
            if coin_kinds[..i].contains(kind) {
                return Err(ConfigError::DuplicateCoinKind(i, *kind));
            }
        }
        if coin_kinds.is_empty() {
            return Err(ConfigError::NonPositive("coin kind count"));
        }
        if button_count == 0 {
            return Err(ConfigError::NonPositive("selection button count"));
        }
        if coin_rack_capacity == 0 {
            return Err(ConfigError::NonPositive("coin rack capacity"));
        }
        if product_rack_capacity == 0 {
            return Err(ConfigError::NonPositive("product rack capacity"));
        }
        if receptacle_capacity == 0 {
            return Err(ConfigError::NonPositive("receptacle capacity"));
        }

        Ok(Self {
            coin_racks: coin_kinds
                .iter()
                .map(|&kind| CoinRack {
                    kind,
                    count: 0,
                    capacity: coin_rack_capacity,
                })
                .collect(),
            product_racks: (0..button_count)
                .map(|_| ProductRack {
                    count: 0,
                    capacity: product_rack_capacity,
                })
                .collect(),
            receptacle: Vec::new(),
            receptacle_capacity,
            storage_bin: Vec::new(),
            chute: Vec::new(),
            chute_capacity: receptacle_capacity,
        })
    }

    pub fn coin_racks(&self) -> &[CoinRack] {
        &self.coin_racks
    }

    pub fn button_count(&self) -> usize {
        self.product_racks.len()
    }

    /// The rack index for a denomination, if it is one this machine takes.
    pub fn rack_for_kind(&self, value: Cents) -> Option<RackIndex> {
        self.coin_racks.iter().position(|rack| rack.kind == value)
    }

    pub fn coins_in_rack(&self, rack: RackIndex) -> Option<usize> {
        self.coin_racks.get(rack).map(|r| r.count)
    }

    pub fn products_in_rack(&self, rack: RackIndex) -> Option<usize> {
        self.product_racks.get(rack).map(|r| r.count)
    }

    pub fn coins_in_receptacle(&self) -> usize {
        self.receptacle.len()
    }

    pub fn coins_in_storage_bin(&self) -> usize {
        self.storage_bin.len()
    }

    /// Drop an accepted coin into the receptacle. Returns `false` when the
    /// receptacle has no room, in which case the coin was not taken.
    pub fn accept_coin(&mut self, value: Cents) -> bool {
        if self.receptacle.len() >= self.receptacle_capacity {
            return false;
        }
        self.receptacle.push(value);
        true
    }

    /// Release one coin from the given rack into the delivery chute.
    pub fn release_coin(&mut self, rack: RackIndex) -> Result<Cents, DispenseFault> {
        if self.chute.len() >= self.chute_capacity {
            return Err(DispenseFault::ChuteFull);
        }
        let rack_state = self
            .coin_racks
            .get_mut(rack)
            .ok_or(DispenseFault::NoSuchRack(rack))?;
        if rack_state.count == 0 {
            return Err(DispenseFault::CoinRackEmpty(rack));
        }
        rack_state.count -= 1;
        let kind = rack_state.kind;
        self.chute.push(Delivered::Coin(kind));
        Ok(kind)
    }

    /// Release one product from the given rack into the delivery chute.
    pub fn release_product(&mut self, rack: RackIndex) -> Result<(), DispenseFault> {
        if self.chute.len() >= self.chute_capacity {
            return Err(DispenseFault::ChuteFull);
        }
        let rack_state = self
            .product_racks
            .get_mut(rack)
            .ok_or(DispenseFault::NoSuchRack(rack))?;
        if rack_state.count == 0 {
            return Err(DispenseFault::ProductRackEmpty(rack));
        }
        rack_state.count -= 1;
        self.chute.push(Delivered::Product(rack));
        Ok(())
    }

    /// Drop a rejected coin straight into the delivery chute, bypassing the
    /// receptacle. Best effort: with the chute full the coin is lost to the
    /// return slot, which the engine only logs.
    pub fn return_coin(&mut self, value: Cents) {
        if self.chute.len() < self.chute_capacity {
            self.chute.push(Delivered::Coin(value));
        }
    }

    /// Sweep the receptacle into permanent storage: each coin goes to its
    /// denomination's rack while below capacity, otherwise to the storage
    /// bin. The receptacle is empty afterwards.
    pub fn move_receptacle_to_storage(&mut self) {
        for coin in std::mem::take(&mut self.receptacle) {
            match self
                .coin_racks
                .iter_mut()
                .find(|rack| rack.kind == coin && rack.count < rack.capacity)
            {
                Some(rack) => rack.count += 1,
                None => self.storage_bin.push(coin),
            }
        }
    }

    /// Set every coin rack's count, one entry per rack.
    pub fn load_coins(&mut self, counts: &[usize]) -> Result<(), ConfigError> {
        if counts.len() != self.coin_racks.len() {
            return Err(ConfigError::WrongLength {
                expected: self.coin_racks.len(),
                actual: counts.len(),
            });
        }
        for (rack, &count) in counts.iter().enumerate() {
            let capacity = self.coin_racks[rack].capacity;
            if count > capacity {
                return Err(ConfigError::OverCapacity {
                    rack,
                    count,
                    capacity,
                });
            }
        }
        for (rack_state, &count) in self.coin_racks.iter_mut().zip(counts) {
            rack_state.count = count;
        }
        Ok(())
    }

    /// Set every product rack's count, one entry per rack.
    pub fn load_products(&mut self, counts: &[usize]) -> Result<(), ConfigError> {
        if counts.len() != self.product_racks.len() {
            return Err(ConfigError::WrongLength {
                expected: self.product_racks.len(),
                actual: counts.len(),
            });
        }
        for (rack, &count) in counts.iter().enumerate() {
            let capacity = self.product_racks[rack].capacity;
            if count > capacity {
                return Err(ConfigError::OverCapacity {
                    rack,
                    count,
                    capacity,
                });
            }
        }
        for (rack_state, &count) in self.product_racks.iter_mut().zip(counts) {
            rack_state.count = count;
        }
        Ok(())
    }

    /// Everything currently sitting in the delivery chute.
    pub fn chute(&self) -> &[Delivered] {
        &self.chute
    }

    /// Empty the delivery chute, as a user scooping out its contents.
    pub fn take_chute(&mut self) -> Vec<Delivered> {
        std::mem::take(&mut self.chute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(values: &[u64]) -> Vec<Cents> {
        values.iter().map(|&v| Cents::new(v)).collect()
    }

    fn standard() -> Hardware {
        Hardware::new(&kinds(&[5, 10, 25, 100]), 3, 10, 10, 20).unwrap()
    }

    #[test]
    fn new_builds_one_rack_per_kind_and_button() {
        let hw = standard();
        assert_eq!(hw.coin_racks().len(), 4);
        assert_eq!(hw.button_count(), 3);
        assert_eq!(hw.coins_in_rack(0), Some(0));
        assert_eq!(hw.products_in_rack(2), Some(0));
    }

    #[test]
    fn new_rejects_zero_coin_kind() {
        let err = Hardware::new(&kinds(&[5, 0]), 1, 10, 10, 10).unwrap_err();
        assert_eq!(err, ConfigError::ZeroCoinKind(1));
    }

    #[test]
    fn new_rejects_duplicate_coin_kind() {
        let err = Hardware::new(&kinds(&[5, 10, 5]), 1, 10, 10, 10).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateCoinKind(2, Cents::new(5)));
    }

    #[test]
    fn new_rejects_non_positive_geometry() {
        assert!(Hardware::new(&[], 1, 10, 10, 10).is_err());
        assert!(Hardware::new(&kinds(&[5]), 0, 10, 10, 10).is_err());
        assert!(Hardware::new(&kinds(&[5]), 1, 0, 10, 10).is_err());
        assert!(Hardware::new(&kinds(&[5]), 1, 10, 0, 10).is_err());
        assert!(Hardware::new(&kinds(&[5]), 1, 10, 10, 0).is_err());
    }

    #[test]
    fn rack_for_kind_uses_configuration_order() {
        let hw = standard();
        assert_eq!(hw.rack_for_kind(Cents::new(25)), Some(2));
        assert_eq!(hw.rack_for_kind(Cents::new(7)), None);
    }

    #[test]
    fn load_coins_sets_counts() {
        let mut hw = standard();
        hw.load_coins(&[1, 2, 3, 4]).unwrap();
        assert_eq!(hw.coins_in_rack(0), Some(1));
        assert_eq!(hw.coins_in_rack(3), Some(4));
    }

    #[test]
    fn load_coins_rejects_wrong_length() {
        let mut hw = standard();
        let err = hw.load_coins(&[1, 2]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongLength {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn load_coins_rejects_over_capacity() {
        let mut hw = standard();
        let err = hw.load_coins(&[1, 2, 3, 11]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OverCapacity {
                rack: 3,
                count: 11,
                capacity: 10
            }
        );
        // nothing was loaded
        assert_eq!(hw.coins_in_rack(0), Some(0));
    }

    #[test]
    fn release_coin_decrements_rack_and_fills_chute() {
        let mut hw = standard();
        hw.load_coins(&[0, 0, 2, 0]).unwrap();

        let kind = hw.release_coin(2).unwrap();
        assert_eq!(kind, Cents::new(25));
        assert_eq!(hw.coins_in_rack(2), Some(1));
        assert_eq!(hw.chute(), &[Delivered::Coin(Cents::new(25))]);
    }

    #[test]
    fn release_coin_from_empty_rack_fails() {
        let mut hw = standard();
        assert_eq!(hw.release_coin(0), Err(DispenseFault::CoinRackEmpty(0)));
        assert_eq!(hw.release_coin(9), Err(DispenseFault::NoSuchRack(9)));
    }

    #[test]
    fn release_product_decrements_rack() {
        let mut hw = standard();
        hw.load_products(&[1, 0, 0]).unwrap();

        hw.release_product(0).unwrap();
        assert_eq!(hw.products_in_rack(0), Some(0));
        assert_eq!(hw.chute(), &[Delivered::Product(0)]);

        assert_eq!(
            hw.release_product(0),
            Err(DispenseFault::ProductRackEmpty(0))
        );
    }

    #[test]
    fn accept_coin_respects_receptacle_capacity() {
        let mut hw = Hardware::new(&kinds(&[5]), 1, 10, 10, 2).unwrap();
        assert!(hw.accept_coin(Cents::new(5)));
        assert!(hw.accept_coin(Cents::new(5)));
        assert!(!hw.accept_coin(Cents::new(5)));
        assert_eq!(hw.coins_in_receptacle(), 2);
    }

    #[test]
    fn store_moves_receptacle_into_racks() {
        let mut hw = standard();
        hw.accept_coin(Cents::new(25));
        hw.accept_coin(Cents::new(10));

        hw.move_receptacle_to_storage();
        assert_eq!(hw.coins_in_receptacle(), 0);
        assert_eq!(hw.coins_in_rack(1), Some(1));
        assert_eq!(hw.coins_in_rack(2), Some(1));
        assert_eq!(hw.coins_in_storage_bin(), 0);
    }

    #[test]
    fn store_overflows_full_rack_to_bin() {
        let mut hw = Hardware::new(&kinds(&[5]), 1, 1, 10, 10).unwrap();
        hw.load_coins(&[1]).unwrap();
        hw.accept_coin(Cents::new(5));

        hw.move_receptacle_to_storage();
        assert_eq!(hw.coins_in_rack(0), Some(1));
        assert_eq!(hw.coins_in_storage_bin(), 1);
        assert_eq!(hw.coins_in_receptacle(), 0);
    }

    #[test]
    fn take_chute_empties_it() {
        let mut hw = standard();
        hw.load_products(&[1, 0, 0]).unwrap();
        hw.release_product(0).unwrap();

        let delivered = hw.take_chute();
        assert_eq!(delivered, vec![Delivered::Product(0)]);
        assert!(hw.chute().is_empty());
    }
}
