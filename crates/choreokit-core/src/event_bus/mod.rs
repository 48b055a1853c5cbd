//! # Event Bus Module
//!
//! Explicit notification mechanism for document observers.
//!
//! Components register callbacks for the categories they care about and are
//! invoked at the mutation points of the document, history, and orchestrator.
//! There is no global instance: the bus is constructed alongside the document
//! and handed to whoever needs to observe it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use choreokit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::History]),
//!     |event| println!("history moved: {}", event),
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
