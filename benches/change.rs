use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vend_eng::{Cents, Event, ProductKind, VendingMachine};

const KINDS: [Cents; 4] = [
    Cents::new(5),
    Cents::new(10),
    Cents::new(25),
    Cents::new(100),
];

fn machine(coin_rack_capacity: usize, receptacle_capacity: usize) -> VendingMachine {
    let mut m = VendingMachine::new(&KINDS, 3, coin_rack_capacity, 10, receptacle_capacity)
        .expect("bench geometry is valid");
    m.apply(Event::Configure {
        products: vec![
            ProductKind::new("Cola", Cents::new(250)),
            ProductKind::new("Chips", Cents::new(180)),
            ProductKind::new("Candy", Cents::new(65)),
        ],
    })
    .expect("configure");
    m
}

/// Generates repeating purchase cycles that keep the machine stocked.
///
/// Pattern per cycle: refill racks, insert 1.00 + 0.25, press the candy
/// button (0.65), taking 0.60 of change each round.
struct PurchaseGenerator {
    cycles: u32,
    current_cycle: u32,
    current_step: u32,
}

impl PurchaseGenerator {
    fn new(cycles: u32) -> Self {
        Self {
            cycles,
            current_cycle: 0,
            current_step: 0,
        }
    }
}

impl Iterator for PurchaseGenerator {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cycle >= self.cycles {
            return None;
        }

        let event = match self.current_step {
            0 => Event::LoadCoins {
                counts: vec![10, 10, 10, 10],
            },
            1 => Event::LoadProducts {
                counts: vec![10, 10, 10],
            },
            2 => Event::CoinAccepted {
                value: Cents::new(100),
            },
            3 => Event::CoinAccepted {
                value: Cents::new(25),
            },
            _ => Event::ButtonPressed { button: 2 },
        };

        self.current_step += 1;
        if self.current_step > 4 {
            self.current_step = 0;
            self.current_cycle += 1;
        }

        Some(event)
    }
}

fn bench_purchase_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("purchase_cycles");

    for cycles in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(cycles), &cycles, |b, &cycles| {
            b.iter(|| {
                let mut m = machine(10, 50);
                for event in PurchaseGenerator::new(cycles) {
                    let _ = black_box(m.apply(event));
                }
                m
            });
        });
    }

    group.finish();
}

fn bench_deep_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_change");

    // Change paid entirely in nickels: one release per 5 cents owed.
    for nickels in [1_000usize, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(nickels), &nickels, |b, &nickels| {
            b.iter(|| {
                let mut m = machine(nickels, 2 * nickels);
                m.apply(Event::LoadCoins {
                    counts: vec![nickels, 0, 0, 0],
                })
                .expect("load");
                m.apply(Event::LoadProducts {
                    counts: vec![10, 10, 10],
                })
                .expect("load");
                m.apply(Event::ElectronicPayment {
                    source: "bench".to_string(),
                    amount: Cents::new(5 * nickels as u64 + 65),
                })
                .expect("payment");
                let _ = black_box(m.apply(Event::ButtonPressed { button: 2 }));
                m
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_purchase_cycles, bench_deep_change);
criterion_main!(benches);
