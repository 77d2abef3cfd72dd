//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services. Handlers
//! translate requests into service calls and domain results into the `shared`
//! DTOs; they hold no business rules of their own.

pub mod rest;
