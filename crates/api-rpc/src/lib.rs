//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 trigger surface for Paysweep: the "run now"
//! sweep trigger and the manual single-order correction.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::RpcServer;
