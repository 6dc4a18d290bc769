//! HTTP request handlers for the REST API.

pub mod frame;
pub mod message;
pub mod persona;
pub mod session;
pub mod wallet;
