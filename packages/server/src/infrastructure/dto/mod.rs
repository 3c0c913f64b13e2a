//! Data transfer objects for the wire format.

pub mod websocket;
