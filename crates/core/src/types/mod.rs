//! Core types for La Comanda.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod price;
pub mod product;
pub mod schedule;
pub mod status;

pub use customer::{Address, CustomerData, OrderType, PaymentMethod, ValidationError};
pub use price::Price;
pub use product::Product;
pub use schedule::{OrderingSchedule, ScheduleError};
pub use status::{AdminStatus, Observation, StatusTracker, StatusView};
