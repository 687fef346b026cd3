//! Shopcore - Storefront security core and payment webhook pipeline.
//!
//! This crate implements the storefront's cookie/session/CSRF security
//! primitives and the verification pipeline for payment provider webhooks
//! (NovaPay and Meridian).

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
