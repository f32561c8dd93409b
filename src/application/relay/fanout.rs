//! # Broadcast Fanout
//!
//! Delivers formatted lines to every configured (connection, channel)
//! destination. Connections that are not currently live are skipped;
//! they may legitimately be offline.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::config::Destination;
use crate::domain::traits::ChatOutlet;

/// Registry of named outbound connections, populated at startup and
/// read-only afterwards.
#[derive(Default)]
pub struct ConnectionPool {
    outlets: HashMap<String, Arc<dyn ChatOutlet>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, outlet: Arc<dyn ChatOutlet>) {
        self.outlets.insert(name.to_string(), outlet);
    }

    pub fn is_live(&self, name: &str) -> bool {
        self.outlets.get(name).map(|o| o.is_live()).unwrap_or(false)
    }

    pub async fn deliver(&self, name: &str, channel: &str, text: &str) -> Result<(), String> {
        match self.outlets.get(name) {
            Some(outlet) => outlet.deliver(channel, text).await,
            None => Err(format!("unknown connection '{name}'")),
        }
    }
}

/// Fans one announcement out to all configured destinations.
pub struct Broadcaster {
    destinations: Vec<Destination>,
    pool: Arc<ConnectionPool>,
}

impl Broadcaster {
    pub fn new(destinations: Vec<Destination>, pool: Arc<ConnectionPool>) -> Self {
        Self { destinations, pool }
    }

    /// Unescape markup entities and deliver the line everywhere it is
    /// configured to go. Deliveries are awaited in order, so each
    /// destination sees announcements in classification order.
    pub async fn announce(&self, text: &str) {
        let text = unescape_entities(text);

        for dest in &self.destinations {
            if !self.pool.is_live(&dest.connection) {
                continue;
            }
            if let Err(e) = self
                .pool
                .deliver(&dest.connection, &dest.channel, &text)
                .await
            {
                tracing::warn!(
                    "Failed to deliver announcement to {}/{}: {}",
                    dest.connection,
                    dest.channel,
                    e
                );
            }
        }
    }
}

/// The upstream escapes angle brackets and ampersands in status text.
/// Ampersands go last so `&amp;lt;` does not double-unescape.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
