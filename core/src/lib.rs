//! Typed client for the Nature Remo cloud API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` performs the
//! round trip; `Remo` wires the three steps together for callers that just
//! want a typed result.
//!
//! # Design
//! - `RemoClient` is stateless: it holds only the versioned base URL and the
//!   bearer token.
//! - Each endpoint is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit.
//! - POST parameters are form-encoded; lists are comma-joined and infrared
//!   messages are embedded as JSON text.
//! - Any non-2xx status becomes `ApiError::HttpError` carrying status and body.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod remo;
pub mod transport;
pub mod types;

pub use client::RemoClient;
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remo::Remo;
pub use transport::{Transport, UreqTransport};
pub use types::{
    AirCon, AirConModes, AirConParams, AirConRange, AirConRangeMode, AirConSettings, Appliance,
    ApplianceModel, ApplianceModelAndParam, Device, DeviceCore, InfraredSignal, NewAppliance,
    NewestEvents, SensorValue, Signal, User,
};
