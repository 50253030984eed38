//! Order lifecycle and pricing core for a package-forwarding service:
//! purchases from Shein, Amazon and AliExpress, consolidated in a Brazilian
//! locker and shipped on to customers in Venezuela.
//!
//! Callers use [`service::OrderService`]. Storage, time and id generation are
//! injected through [`storage::KeyValueStore`], [`infra::Clock`] and
//! [`infra::IdGenerator`].

pub mod config;
pub mod domain;
pub mod event_sourcing;
pub mod infra;
pub mod metrics;
pub mod repository;
pub mod service;
pub mod storage;
pub mod telemetry;

pub use domain::order::{
    calculate_cost_breakdown, calculate_revenue_breakdown, generate_tracking_events,
    simulate_order_progress, CostBreakdown, NewOrder, Order, OrderError, OrderStatus,
    RevenueBreakdown, ShippingAddress, TrackingEvent,
};
pub use service::{OrderService, Quote, RevenueSummary, TickReport};
