pub mod cents;
pub mod hardware;
pub mod machine;
pub mod model;
pub mod script;

pub use cents::Cents;
pub use machine::{MachineError, VendingMachine};
pub use model::{Event, PaymentMethod, ProductKind};
