//! # DesignKit Core
//!
//! Core types and utilities shared by the DesignKit crates:
//! millimeter/pixel conversion and box geometry, the error taxonomy,
//! and the per-session event bus.

pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{AssetError, Error, ExportError, PersistenceError, Result, ValidationError};

pub use event_bus::{
    AppEvent, AssetEvent, DocumentEvent, EventBus, EventBusConfig, EventCategory, EventFilter,
    ExportEvent, Notification, NotificationLevel, SaveEvent, SaveTrigger, SubscriptionId,
};

pub use units::{
    clamp, mm_to_px, mm_to_px_at, normalize_rotation, pt_to_px, px_to_mm, rotate_point, round_px,
    Bounds, MeasurementSystem, PX_PER_MM,
};
