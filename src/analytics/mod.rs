//! Redirect analytics
//!
//! Every resolved redirect can be reported to a Measurement Protocol
//! collector. Reporting is optional, runs in a detached task after the
//! response is produced, and never affects the redirect itself.

pub mod identity;
pub mod ip_extractor;
pub mod models;
pub mod reporter;

pub use ip_extractor::extract_client_ip;
pub use models::{AnalyticsEvent, EventParams, VisitContext};
pub use reporter::{AnalyticsReporter, DeliveryError, EventSink, MeasurementProtocolSink};
