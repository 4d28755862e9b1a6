//! # Event Bus Module
//!
//! Publish/subscribe between the engine and its host:
//! - The designer publishes save, asset and export outcomes
//! - Hosts subscribe to turn `Notification` events into toasts
//! - Async consumers poll a `broadcast::Receiver`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use designkit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = std::sync::Arc::new(EventBus::new());
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Notification]),
//!     |event| {
//!         if let AppEvent::Notification(n) = event {
//!             println!("{}: {}", n.level, n.message);
//!         }
//!     },
//! );
//!
//! bus.publish(AppEvent::success("Design saved")).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
