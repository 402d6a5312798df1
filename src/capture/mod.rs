/// Capture domain types: settings, status, results.
pub mod result;
pub mod settings;
pub mod status;

pub use result::{ArtifactDecodeError, CaptureResponse, CaptureResponseJson};
pub use settings::{
    Browser, CaptureSettings, CookieSetting, Geolocation, HeaderSetting, HttpCredentials,
    ProxySetting, Viewport,
};
pub use status::{CaptureStatus, CaptureStatusReport};
