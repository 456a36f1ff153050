//! Entity state: the current value reported for an entity.

use serde::{Deserialize, Serialize};

/// Current state of an entity.
///
/// Binary and availability states get their own variants; anything else
/// (`"21.5"`, `"heat"`, `"playing"`) is kept verbatim in [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
    Other(String),
}

impl EntityState {
    /// Whether the entity is reachable (anything but [`Unavailable`](Self::Unavailable)).
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Whether the state carries no usable value (`unavailable` or `unknown`).
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Unavailable | Self::Unknown)
    }

    /// Text form of the state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
            Self::Unavailable => "unavailable",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for EntityState {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "on" => Self::On,
            "off" => Self::Off,
            "unknown" | "" => Self::Unknown,
            "unavailable" => Self::Unavailable,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for EntityState {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<EntityState> for String {
    fn from(state: EntityState) -> Self {
        match state {
            EntityState::Other(value) => value,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_available_when_state_is_on() {
        assert!(EntityState::On.is_available());
    }

    #[test]
    fn should_report_unavailable_when_state_is_unavailable() {
        assert!(!EntityState::Unavailable.is_available());
    }

    #[test]
    fn should_treat_unknown_and_unavailable_as_degraded() {
        assert!(EntityState::Unknown.is_degraded());
        assert!(EntityState::Unavailable.is_degraded());
        assert!(!EntityState::Off.is_degraded());
        assert!(!EntityState::Other("21.5".to_string()).is_degraded());
    }

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(EntityState::default(), EntityState::Unknown);
    }

    #[test]
    fn should_parse_known_states_case_insensitively() {
        assert_eq!(EntityState::from("ON"), EntityState::On);
        assert_eq!(EntityState::from("Unavailable"), EntityState::Unavailable);
    }

    #[test]
    fn should_keep_free_form_values() {
        assert_eq!(
            EntityState::from("heat"),
            EntityState::Other("heat".to_string())
        );
        assert_eq!(EntityState::from("21.5").to_string(), "21.5");
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let state = EntityState::On;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"on\"");
        let parsed: EntityState = serde_json::from_str("\"playing\"").unwrap();
        assert_eq!(parsed, EntityState::Other("playing".to_string()));
    }
}
