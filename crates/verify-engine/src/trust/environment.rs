//! Hub Environments
//!
//! Each deployment environment of the hub has its own SSO location,
//! metadata location and trust stores. A relying party picks one
//! environment and may override individual trust-anchor settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_MIN_REFRESH_DELAY_MS: u64 = 60_000;
const DEFAULT_MAX_REFRESH_DELAY_MS: u64 = 600_000;
const DEFAULT_TRUST_ANCHOR_MIN_REFRESH_DELAY_MS: u64 = 60_000;
const DEFAULT_TRUST_ANCHOR_MAX_REFRESH_DELAY_MS: u64 = 3_600_000;

/// A deployment environment of the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HubEnvironment {
    Production,
    Integration,
    ComplianceTool,
}

/// Trust store names for one environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustStores {
    pub metadata: &'static str,
    pub hub: &'static str,
    pub idp: &'static str,
}

const PRODUCTION_STORES: TrustStores = TrustStores {
    metadata: "prod_metadata_truststore.ts",
    hub: "prod_hub_truststore.ts",
    idp: "prod_idp_truststore.ts",
};

const TEST_STORES: TrustStores = TrustStores {
    metadata: "test_metadata_truststore.ts",
    hub: "test_hub_truststore.ts",
    idp: "test_idp_truststore.ts",
};

impl HubEnvironment {
    pub const ALL: [HubEnvironment; 3] = [
        HubEnvironment::Production,
        HubEnvironment::Integration,
        HubEnvironment::ComplianceTool,
    ];

    /// Configuration name of the environment
    pub fn name(&self) -> &'static str {
        match self {
            HubEnvironment::Production => "PRODUCTION",
            HubEnvironment::Integration => "INTEGRATION",
            HubEnvironment::ComplianceTool => "COMPLIANCE_TOOL",
        }
    }

    /// Where users are sent to sign in
    pub fn sso_location(&self) -> &'static str {
        match self {
            HubEnvironment::Production => "https://www.signin.service.gov.uk/SAML2/SSO",
            HubEnvironment::Integration => {
                "https://www.integration.signin.service.gov.uk/SAML2/SSO"
            }
            HubEnvironment::ComplianceTool => {
                "https://compliance-tool-reference.ida.digital.cabinet-office.gov.uk/SAML2/SSO"
            }
        }
    }

    /// Federation metadata location
    pub fn metadata_uri(&self) -> &'static str {
        match self {
            HubEnvironment::Production => {
                "https://www.signin.service.gov.uk/SAML2/metadata/federation"
            }
            HubEnvironment::Integration => {
                "https://www.integration.signin.service.gov.uk/SAML2/metadata/federation"
            }
            HubEnvironment::ComplianceTool => {
                "https://compliance-tool-reference.ida.digital.cabinet-office.gov.uk/SAML2/metadata/federation"
            }
        }
    }

    /// No environment publishes a default trust anchor
    pub fn trust_anchor_uri(&self) -> Option<&'static str> {
        None
    }

    pub fn trust_stores(&self) -> TrustStores {
        match self {
            HubEnvironment::Production => PRODUCTION_STORES,
            HubEnvironment::Integration | HubEnvironment::ComplianceTool => TEST_STORES,
        }
    }
}

impl Default for HubEnvironment {
    fn default() -> Self {
        HubEnvironment::ComplianceTool
    }
}

impl std::fmt::Display for HubEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for HubEnvironment {
    type Err = ConfigError;

    /// Names are matched exactly, upper case only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HubEnvironment::ALL
            .into_iter()
            .find(|env| env.name() == s)
            .ok_or_else(|| ConfigError::UnknownEnvironment(s.to_string()))
    }
}

impl TryFrom<String> for HubEnvironment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HubEnvironment> for String {
    fn from(env: HubEnvironment) -> Self {
        env.name().to_string()
    }
}

/// Explicit trust-anchor settings that take precedence over the
/// environment defaults
///
/// Every field but `enabled` may be omitted from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustAnchorOverride {
    pub trust_anchor_uri: Option<String>,
    pub metadata_source_uri: Option<String>,
    pub trust_store: Option<String>,
    pub min_refresh_delay: Option<u64>,
    pub max_refresh_delay: Option<u64>,
    pub trust_anchor_min_refresh_delay: Option<u64>,
    pub trust_anchor_max_refresh_delay: Option<u64>,
    pub hub_connector_entity_id: Option<String>,
    pub enabled: bool,
}

/// How often metadata and the trust anchor may be refetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDelays {
    pub metadata_min: Duration,
    pub metadata_max: Duration,
    pub trust_anchor_min: Duration,
    pub trust_anchor_max: Duration,
}

impl RefreshDelays {
    /// Both windows have `min <= max`
    pub fn is_ordered(&self) -> bool {
        self.metadata_min <= self.metadata_max && self.trust_anchor_min <= self.trust_anchor_max
    }
}

impl Default for RefreshDelays {
    fn default() -> Self {
        Self {
            metadata_min: Duration::from_millis(DEFAULT_MIN_REFRESH_DELAY_MS),
            metadata_max: Duration::from_millis(DEFAULT_MAX_REFRESH_DELAY_MS),
            trust_anchor_min: Duration::from_millis(DEFAULT_TRUST_ANCHOR_MIN_REFRESH_DELAY_MS),
            trust_anchor_max: Duration::from_millis(DEFAULT_TRUST_ANCHOR_MAX_REFRESH_DELAY_MS),
        }
    }
}

/// Trust context after applying overrides to the environment defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrustAnchor {
    pub environment: HubEnvironment,
    pub sso_location: String,
    pub metadata_source_uri: String,
    pub trust_anchor_uri: Option<String>,
    pub trust_store: String,
    pub hub_trust_store: String,
    pub idp_trust_store: String,
    pub refresh: RefreshDelays,
    pub hub_connector_entity_id: Option<String>,
    pub enabled: bool,
}

/// Resolve the trust context for `environment`
///
/// For every field the explicit override wins, then the environment
/// default applies.
pub fn resolve_trust_anchor(
    overrides: Option<&TrustAnchorOverride>,
    environment: HubEnvironment,
) -> ResolvedTrustAnchor {
    let empty = TrustAnchorOverride::default();
    let o = overrides.unwrap_or(&empty);
    let stores = environment.trust_stores();
    let defaults = RefreshDelays::default();
    let millis = |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);

    ResolvedTrustAnchor {
        environment,
        sso_location: environment.sso_location().to_string(),
        metadata_source_uri: o
            .metadata_source_uri
            .clone()
            .unwrap_or_else(|| environment.metadata_uri().to_string()),
        trust_anchor_uri: o
            .trust_anchor_uri
            .clone()
            .or_else(|| environment.trust_anchor_uri().map(str::to_string)),
        trust_store: o
            .trust_store
            .clone()
            .unwrap_or_else(|| stores.metadata.to_string()),
        hub_trust_store: stores.hub.to_string(),
        idp_trust_store: stores.idp.to_string(),
        refresh: RefreshDelays {
            metadata_min: millis(o.min_refresh_delay, defaults.metadata_min),
            metadata_max: millis(o.max_refresh_delay, defaults.metadata_max),
            trust_anchor_min: millis(o.trust_anchor_min_refresh_delay, defaults.trust_anchor_min),
            trust_anchor_max: millis(o.trust_anchor_max_refresh_delay, defaults.trust_anchor_max),
        },
        hub_connector_entity_id: o.hub_connector_entity_id.clone(),
        enabled: o.enabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("PRODUCTION".parse::<HubEnvironment>().unwrap(), HubEnvironment::Production);
        assert_eq!(
            "COMPLIANCE_TOOL".parse::<HubEnvironment>().unwrap(),
            HubEnvironment::ComplianceTool
        );
        assert!(matches!(
            "production".parse::<HubEnvironment>(),
            Err(ConfigError::UnknownEnvironment(name)) if name == "production"
        ));
    }

    #[test]
    fn test_serde_uses_environment_names() {
        let json = serde_json::to_string(&HubEnvironment::Integration).unwrap();
        assert_eq!(json, "\"INTEGRATION\"");
        assert!(serde_json::from_str::<HubEnvironment>("\"STAGING\"").is_err());
    }

    #[test]
    fn test_environment_defaults_apply_without_override() {
        let resolved = resolve_trust_anchor(None, HubEnvironment::Integration);

        assert_eq!(
            resolved.metadata_source_uri,
            "https://www.integration.signin.service.gov.uk/SAML2/metadata/federation"
        );
        assert_eq!(resolved.trust_store, "test_metadata_truststore.ts");
        assert_eq!(resolved.trust_anchor_uri, None);
        assert_eq!(resolved.refresh, RefreshDelays::default());
        assert!(!resolved.enabled);
    }

    #[test]
    fn test_override_wins_field_by_field() {
        let overrides = TrustAnchorOverride {
            trust_anchor_uri: Some("https://anchor.example/".into()),
            max_refresh_delay: Some(1_000),
            enabled: true,
            ..Default::default()
        };
        let resolved = resolve_trust_anchor(Some(&overrides), HubEnvironment::Production);

        assert_eq!(resolved.trust_anchor_uri.as_deref(), Some("https://anchor.example/"));
        assert_eq!(
            resolved.metadata_source_uri,
            "https://www.signin.service.gov.uk/SAML2/metadata/federation"
        );
        assert_eq!(resolved.trust_store, "prod_metadata_truststore.ts");
        assert_eq!(resolved.refresh.metadata_max, Duration::from_millis(1_000));
        assert_eq!(resolved.refresh.metadata_min, Duration::from_millis(60_000));
        assert!(!resolved.refresh.is_ordered());
        assert!(resolved.enabled);
    }

    #[test]
    fn test_override_requires_enabled() {
        let missing = serde_json::from_str::<TrustAnchorOverride>(
            r#"{ "trustAnchorUri": "https://anchor.example/" }"#,
        );
        assert!(missing.is_err());

        let minimal: TrustAnchorOverride = serde_json::from_str(r#"{ "enabled": false }"#).unwrap();
        assert_eq!(minimal, TrustAnchorOverride::default());
    }

    #[test]
    fn test_production_uses_production_stores() {
        assert_eq!(HubEnvironment::Production.trust_stores().hub, "prod_hub_truststore.ts");
        assert_eq!(HubEnvironment::ComplianceTool.trust_stores().idp, "test_idp_truststore.ts");
    }
}
