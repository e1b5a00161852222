use std::env;

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use vend_eng::script::{read_events, write_report};
use vend_eng::{Cents, VendingMachine};

/// Demo geometry: nickel/dime/quarter/dollar racks, three selection buttons.
const COIN_KINDS: [Cents; 4] = [
    Cents::new(5),
    Cents::new(10),
    Cents::new(25),
    Cents::new(100),
];
const BUTTON_COUNT: usize = 3;
const COIN_RACK_CAPACITY: usize = 20;
const PRODUCT_RACK_CAPACITY: usize = 10;
const RECEPTACLE_CAPACITY: usize = 50;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).expect("usage: vend-eng <script.csv>");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let mut machine = VendingMachine::new(
        &COIN_KINDS,
        BUTTON_COUNT,
        COIN_RACK_CAPACITY,
        PRODUCT_RACK_CAPACITY,
        RECEPTACLE_CAPACITY,
    )
    .expect("demo geometry is valid");

    let (event_sender, event_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_events(&path) {
            match result {
                Ok(event) => {
                    event_sender.send(event).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    machine.run(ReceiverStream::new(event_receiver)).await;

    write_report(&machine);
}
