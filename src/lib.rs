#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! lacus-client: a blocking client for Lacus web-capture instances.
//!
//! ```no_run
//! use lacus_client::{CaptureSettings, CaptureStatus, InstanceConfig, LacusClient};
//!
//! # fn main() -> lacus_client::Result<()> {
//! let client = LacusClient::new(InstanceConfig::new("http://127.0.0.1:7100"))?;
//! let uuid = client.enqueue(&CaptureSettings::for_url("circl.lu"))?;
//! if client.get_capture_status(&uuid)? == CaptureStatus::Done {
//!     let capture = client.get_capture(&uuid)?;
//!     println!("{} bytes of HTML", capture.html.map_or(0, |h| h.len()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod capture;

pub use api::{InstanceConfig, LacusClient, LacusError, Result};
pub use capture::{
    CaptureResponse, CaptureResponseJson, CaptureSettings, CaptureStatus, CaptureStatusReport,
};
