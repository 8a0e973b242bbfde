//! Data models for redirect analytics

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::identity;
use crate::models::{DeviceClass, Resolution};

pub const REDIRECT_EVENT: &str = "redirect_event";
pub const REDIRECT_EVENT_NOT_FOUND: &str = "redirect_event_not_found";

/// Marks every redirect as an engaged visit
const ENGAGEMENT_TIME_MSEC: u64 = 1;

/// Request details the event needs, copied out of the request
#[derive(Debug, Clone)]
pub struct VisitContext {
    pub client_ip: IpAddr,
    pub user_agent: String,
    /// Full request URL
    pub page_location: String,
    pub page_path: String,
}

/// Parameters attached to a redirect event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParams {
    pub redirect_group: String,
    pub device_type: DeviceClass,
    pub user_agent: String,
    pub destination_url: String,
    pub page_location: String,
    pub page_path: String,
    pub ip_override: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_group: Option<String>,
}

/// One redirect, ready to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub client_id: String,
    pub session_id: i64,
    pub params: EventParams,
    /// Sent at the top level of the payload for geo attribution
    pub ip_override: Option<String>,
}

/// Event name reported for a resolution
pub fn event_name(resolution: &Resolution) -> &'static str {
    if resolution.fallback_used() {
        REDIRECT_EVENT_NOT_FOUND
    } else {
        REDIRECT_EVENT
    }
}

impl AnalyticsEvent {
    pub fn for_redirect(resolution: &Resolution, visit: &VisitContext) -> Self {
        let name = event_name(resolution);
        let client_ip = visit.client_ip.to_string();

        Self {
            name,
            client_id: identity::client_id(visit.client_ip, &visit.user_agent),
            session_id: identity::session_id(),
            params: EventParams {
                redirect_group: resolution.group.clone(),
                device_type: resolution.device,
                user_agent: visit.user_agent.clone(),
                destination_url: resolution.destination.clone(),
                page_location: visit.page_location.clone(),
                page_path: visit.page_path.clone(),
                ip_override: client_ip.clone(),
                requested_group: resolution.requested_group.clone(),
            },
            ip_override: Some(client_ip),
        }
    }

    /// Measurement Protocol request body for this event
    pub fn payload(&self) -> MeasurementPayload<'_> {
        MeasurementPayload {
            client_id: &self.client_id,
            events: vec![PayloadEvent {
                name: self.name,
                params: PayloadParams {
                    event: &self.params,
                    session_id: self.session_id,
                    engagement_time_msec: ENGAGEMENT_TIME_MSEC,
                },
            }],
            ip_override: self.ip_override.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeasurementPayload<'a> {
    pub client_id: &'a str,
    pub events: Vec<PayloadEvent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_override: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct PayloadEvent<'a> {
    pub name: &'a str,
    pub params: PayloadParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct PayloadParams<'a> {
    #[serde(flatten)]
    pub event: &'a EventParams,
    pub session_id: i64,
    pub engagement_time_msec: u64,
}
