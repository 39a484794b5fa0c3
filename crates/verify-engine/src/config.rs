//! Engine configuration
//!
//! Loaded from `VERIFY_*` environment variables or a JSON document.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use verify_bridge::handlers::{BearerSubjectValidator, TrustStoreSignatureVerifier};
use verify_bridge::{bootstrap, CapabilitiesBuilder, SignerRole, TrustMaterial};
use verify_core::{AssuranceLevel, PublicKey};

use crate::core::AssertionTranslationEngine;
use crate::error::ConfigError;
use crate::observability::LoggingConfig;
use crate::trust::{resolve_trust_anchor, HubEnvironment, ResolvedTrustAnchor, TrustAnchorOverride, TrustRegistry};

/// Largest accepted clock skew allowance: one day
pub const MAX_CLOCK_SKEW_SECONDS: i64 = 86_400;

/// A trusted signing key, public half only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedKeyConfig {
    pub kid: String,
    /// Base64 of the 32-byte Ed25519 public key
    pub public_key: String,
}

/// Trusted keys per signer role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustKeysConfig {
    pub idp: Vec<TrustedKeyConfig>,
    pub hub: Vec<TrustedKeyConfig>,
}

/// Subject confirmation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// Allowed disagreement between our clock and the issuer's
    pub clock_skew_seconds: i64,
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hub_environment: HubEnvironment,
    pub trust_anchor: Option<TrustAnchorOverride>,
    pub trust_keys: TrustKeysConfig,
    pub subject: SubjectConfig,
    pub logging: LoggingConfig,
    pub minimum_level: AssuranceLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hub_environment: HubEnvironment::default(),
            trust_anchor: None,
            trust_keys: TrustKeysConfig::default(),
            subject: SubjectConfig::default(),
            logging: LoggingConfig::default(),
            minimum_level: AssuranceLevel::Level2,
        }
    }
}

fn parse_key_list(raw: &str) -> Result<Vec<TrustedKeyConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (kid, public_key) = entry.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
                name: "trusted key list",
                reason: format!("expected kid=base64, got '{}'", entry),
            })?;
            Ok(TrustedKeyConfig {
                kid: kid.trim().to_string(),
                public_key: public_key.trim().to_string(),
            })
        })
        .collect()
}

fn decode_key(key: &TrustedKeyConfig) -> Result<PublicKey, ConfigError> {
    let bytes = STANDARD.decode(&key.public_key).map_err(|e| ConfigError::InvalidKey {
        kid: key.kid.clone(),
        reason: format!("Invalid base64 encoding: {}", e),
    })?;
    PublicKey::from_slice(&key.kid, &bytes).map_err(|e| ConfigError::InvalidKey {
        kid: key.kid.clone(),
        reason: e.to_string(),
    })
}

impl EngineConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup, with defaults for unset variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup("VERIFY_HUB_ENVIRONMENT") {
            config.hub_environment = env.parse()?;
        }

        if let Some(level) = lookup("VERIFY_LOG_LEVEL") {
            config.logging.level = level;
        }

        let metadata_uri = lookup("VERIFY_METADATA_URI");
        let trust_anchor_uri = lookup("VERIFY_TRUST_ANCHOR_URI");
        let trust_store = lookup("VERIFY_TRUST_STORE");
        if metadata_uri.is_some() || trust_anchor_uri.is_some() || trust_store.is_some() {
            config.trust_anchor = Some(TrustAnchorOverride {
                metadata_source_uri: metadata_uri,
                trust_anchor_uri,
                trust_store,
                enabled: true,
                ..Default::default()
            });
        }

        if let Some(skew) = lookup("VERIFY_CLOCK_SKEW_SECONDS") {
            config.subject.clock_skew_seconds =
                skew.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "VERIFY_CLOCK_SKEW_SECONDS",
                    reason: format!("'{}' is not a whole number of seconds", skew),
                })?;
        }

        if let Some(level) = lookup("VERIFY_MINIMUM_LEVEL") {
            config.minimum_level = level.parse().map_err(|reason| ConfigError::InvalidValue {
                name: "VERIFY_MINIMUM_LEVEL",
                reason,
            })?;
        }

        if let Some(keys) = lookup("VERIFY_IDP_SIGNING_KEYS") {
            config.trust_keys.idp = parse_key_list(&keys)?;
        }
        if let Some(keys) = lookup("VERIFY_HUB_SIGNING_KEYS") {
            config.trust_keys.hub = parse_key_list(&keys)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never work
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subject.clock_skew_seconds < 0 {
            return Err(ConfigError::InvalidValue {
                name: "clock_skew_seconds",
                reason: "must not be negative".into(),
            });
        }
        if self.subject.clock_skew_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "clock_skew_seconds",
                reason: format!("must not exceed {MAX_CLOCK_SKEW_SECONDS}"),
            });
        }
        if !self.resolved_trust_anchor().refresh.is_ordered() {
            return Err(ConfigError::InvalidValue {
                name: "trust_anchor",
                reason: "minimum refresh delay exceeds maximum".into(),
            });
        }
        Ok(())
    }

    /// Trust context for the configured environment
    pub fn resolved_trust_anchor(&self) -> ResolvedTrustAnchor {
        resolve_trust_anchor(self.trust_anchor.as_ref(), self.hub_environment)
    }

    /// Decode the configured keys into trust material
    pub fn trust_material(&self) -> Result<TrustMaterial, ConfigError> {
        let mut material = TrustMaterial::new();
        for (role, keys) in [
            (SignerRole::Idp, &self.trust_keys.idp),
            (SignerRole::Hub, &self.trust_keys.hub),
        ] {
            for key in keys {
                material = material.with_key(role, decode_key(key)?);
            }
        }
        Ok(material)
    }

    /// Subject validator with the configured clock skew
    ///
    /// The skew is clamped to `0..=MAX_CLOCK_SKEW_SECONDS` for configs that
    /// were built in code and never validated.
    pub fn subject_validator(&self) -> BearerSubjectValidator {
        let skew = self.subject.clock_skew_seconds.clamp(0, MAX_CLOCK_SKEW_SECONDS);
        BearerSubjectValidator::new().with_clock_skew(chrono::Duration::seconds(skew))
    }

    /// Wire an engine from this configuration
    ///
    /// The returned registry is the engine's live trust source; replacing its
    /// material takes effect for the next signature check.
    pub fn build_engine(&self) -> Result<(AssertionTranslationEngine, Arc<TrustRegistry>), ConfigError> {
        let registry = Arc::new(TrustRegistry::new(self.trust_material()?));

        let capabilities = CapabilitiesBuilder::new(bootstrap())
            .with_signature_verifier(TrustStoreSignatureVerifier::new(Arc::clone(&registry)))
            .with_subject_validator(self.subject_validator())
            .build()?;

        Ok((AssertionTranslationEngine::new(capabilities), registry))
    }
}
