use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Events emitted by catalog writes. Consumers today are log-only; the
/// channel exists so downstream integrations (cache busting, sitemap
/// regeneration) can attach without touching the services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SectionCreated(i32),
    BrandCreated(i32),
    CategoryCreated(i32),
    CollectionCreated(i32),
    TypeCreated(i32),
    ColorCreated(i32),

    ProductCreated(i32),
    ProductUpdated(i32),
    ProductDeleted(i32),

    /// A product image was inserted or had its role reassigned.
    ImageRoleAssigned {
        product_id: i32,
        image_id: i32,
        role: String,
    },

    /// Products were relabeled under a fresh color-variation token.
    VariationsGrouped {
        color_group: String,
        product_ids: Vec<i32>,
    },
    VariationsUngrouped {
        product_ids: Vec<i32>,
    },
}

/// Cloneable handle for publishing events onto the processing channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Publish an event, logging instead of failing the caller when the
    /// channel is closed. Write paths must not fail because of telemetry.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event dropped: {}", e);
        }
    }
}

/// Background event processor. Runs until the channel closes.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "catalog event");
    }
    info!("Event channel closed; processor exiting");
}
