use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::device::DeviceClass;
use crate::redirect::error::ConfigurationError;

/// Group that serves empty paths and unknown groups
pub const ROOT_GROUP: &str = "root";

/// Destinations for a single redirect group, keyed by device class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ios: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<String>,
}

impl GroupTargets {
    /// Configured URL for exactly this class; blank strings count as missing.
    pub fn get(&self, device: DeviceClass) -> Option<&str> {
        let url = match device {
            DeviceClass::Android => self.android.as_deref(),
            DeviceClass::Ios => self.ios.as_deref(),
            DeviceClass::Pc => self.pc.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    /// URL for the class, falling back to the `pc` entry.
    pub fn destination_for(&self, device: DeviceClass) -> Option<&str> {
        self.get(device).or_else(|| self.get(DeviceClass::Pc))
    }
}

/// The JSON redirect table: group name to per-device destinations.
///
/// Groups are kept as raw JSON and only decoded when looked up, so a
/// malformed entry fails the requests that touch it and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedirectConfig {
    pub groups: HashMap<String, Value>,
}

/// Outcome of resolving one request against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub destination: String,
    /// Group whose entry produced the destination
    pub group: String,
    pub device: DeviceClass,
    /// Originally requested group, present only when it fell back to root
    pub requested_group: Option<String>,
}

impl Resolution {
    pub fn fallback_used(&self) -> bool {
        self.requested_group.is_some()
    }
}

impl RedirectConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Decode one group. `None` when the group is absent.
    pub fn group(&self, name: &str) -> Option<Result<GroupTargets, ConfigurationError>> {
        let raw = self.groups.get(name)?;
        Some(
            GroupTargets::deserialize(raw).map_err(|source| ConfigurationError::InvalidGroup {
                group: name.to_string(),
                source,
            }),
        )
    }

    /// Groups whose entry is not a `{device: url}` object, sorted.
    pub fn malformed(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .groups
            .keys()
            .map(String::as_str)
            .filter(|name| matches!(self.group(name), Some(Err(_))))
            .collect();
        names.sort_unstable();
        names
    }

    /// Every (group, device class) pair of a well-formed group that has no
    /// destination, sorted by group.
    pub fn unresolvable(&self) -> Vec<(&str, DeviceClass)> {
        let mut missing: Vec<(&str, DeviceClass)> = self
            .groups
            .keys()
            .filter_map(|name| match self.group(name) {
                Some(Ok(targets)) => Some((name.as_str(), targets)),
                _ => None,
            })
            .flat_map(|(name, targets)| {
                [DeviceClass::Android, DeviceClass::Ios, DeviceClass::Pc]
                    .into_iter()
                    .filter(move |device| targets.destination_for(*device).is_none())
                    .map(move |device| (name, device))
            })
            .collect();
        missing.sort_by(|a, b| a.0.cmp(b.0).then(a.1.as_str().cmp(b.1.as_str())));
        missing
    }

    /// Resolve a path segment and User-Agent to a destination.
    pub fn resolve(
        &self,
        path_segment: &str,
        user_agent: &str,
    ) -> Result<Resolution, ConfigurationError> {
        let requested = if path_segment.is_empty() {
            ROOT_GROUP
        } else {
            path_segment
        };

        let (group_name, requested_group) = if self.contains(requested) {
            (requested, None)
        } else {
            tracing::warn!(
                redirect_group = %requested,
                "unknown redirect group, falling back to '{ROOT_GROUP}'"
            );
            (ROOT_GROUP, Some(requested.to_string()))
        };

        let targets = self
            .group(group_name)
            .ok_or(ConfigurationError::MissingRoot)??;

        let device = DeviceClass::from_user_agent(user_agent);

        let destination = targets.destination_for(device).ok_or_else(|| {
            ConfigurationError::NoDestination {
                group: group_name.to_string(),
            }
        })?;

        Ok(Resolution {
            destination: destination.to_string(),
            group: group_name.to_string(),
            device,
            requested_group,
        })
    }
}
