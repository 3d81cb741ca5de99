//! La Comanda Core - Shared domain library.
//!
//! This crate provides the domain model used across all La Comanda components:
//! - `storefront` - Public ordering site and admin status endpoints
//! - `cli` - Command-line client for operators
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Every operation here is a deterministic function of
//! its inputs, which keeps the storefront handlers thin and the rules testable.
//!
//! # Modules
//!
//! - [`types`] - Prices, products, customer data, admin status, ordering hours
//! - [`catalog`] - The static product list
//! - [`cart`] - Cart state and its single transition function
//! - [`pricing`] - Delivery fee schedule and order totals
//! - [`message`] - Customer-facing order message for the messaging channel
//! - [`print`] - Serializable order snapshot used by print tickets
//! - [`ticket`] - Receipt rendering of a print snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod message;
pub mod pricing;
pub mod print;
pub mod ticket;
pub mod types;

pub use cart::{CartAction, CartItem, CartState};
pub use pricing::{DeliveryFees, Quote};
pub use print::{PrintData, PrintDataError};
pub use ticket::Ticket;
pub use types::*;
