//! Demo binary for Mailroom
//!
//! Loads configuration (`config/default.*`, `MAILROOM_*` variables, `.env`),
//! then exercises the broker and the router once and logs what happened.

use std::process::ExitCode;
use std::sync::Arc;

use futures::future::join_all;
use mailroom::config::{Settings, load_config};
use mailroom::router::{ControlMessage, Message};
use mailroom::utils::logging;
use mailroom::{Broker, DynamicRouter};
use tracing::{error, info};

const TOPIC: &str = "news";
const PUBLISHERS: usize = 4;
const MESSAGES_PER_PUBLISHER: usize = 10;

#[tokio::main]
async fn main() -> ExitCode {
    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Demo failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            return Err(format!("failed to load configuration: {e}").into());
        }
    };
    logging::init(&config.logging.level);

    run(config).await
}

async fn run(config: Settings) -> Result<(), Box<dyn std::error::Error>> {
    run_broker(&config).await?;
    run_router(&config).await?;
    Ok(())
}

async fn run_broker(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let broker = Arc::new(Broker::from_settings(&config.broker));
    broker.create_topic(TOPIC);
    let alice = broker.subscribe(TOPIC, "alice")?;
    let bob = broker.subscribe(TOPIC, "bob")?;

    let publishers = (0..PUBLISHERS).map(|p| {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move {
            let mut delivered = 0;
            for m in 0..MESSAGES_PER_PUBLISHER {
                delivered += broker.publish(TOPIC, &format!("publisher {p} message {m}"));
            }
            delivered
        })
    });

    let mut delivered = 0;
    for result in join_all(publishers).await {
        delivered += result?;
    }
    info!(
        topic = TOPIC,
        subscribers = broker.subscriber_count(TOPIC),
        delivered,
        "publishers finished"
    );

    let pulled = alice.pull();
    info!(subscriber = alice.name(), pulled = pulled.len(), "pulled messages");

    broker.unsubscribe(TOPIC, "bob")?;
    broker.publish(TOPIC, "after bob left");
    info!(
        subscriber = bob.name(),
        buffered = bob.pull().len(),
        "unsubscribed handle drained"
    );

    broker.delete_topic(TOPIC);
    Ok(())
}

async fn run_router(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let router = DynamicRouter::from_settings(&config.router);
    router.handle_control_message(&ControlMessage::add("orders", "/orders"));

    router
        .handle_message(&Message::new("orders", "order #1"))
        .await?;
    router
        .handle_message(&Message::new("refunds", "refund #1"))
        .await?;

    if let Some(queue) = router.find_queue("/orders") {
        let content = queue.dequeue().await?;
        info!(queue = queue.name(), %content, "routed message received");
    }
    let content = router.unknown_queue().dequeue().await?;
    info!(queue = router.unknown_queue().name(), %content, "unrouted message received");

    Ok(())
}
