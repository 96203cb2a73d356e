//! Stable identifier for the active configuration
//!
//! Every report batch is tagged with a fingerprint of the configuration
//! that produced it so the collector can detect configuration drift. An
//! operator-assigned `version` string always wins; otherwise the
//! fingerprint is a content hash over the full configuration structure.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::Config;

/// Compute the fingerprint for a loaded configuration.
///
/// The content hash goes through `serde_json::Value`, whose object keys are
/// kept sorted, so semantically identical configs always hash identically
/// regardless of incidental field order.
pub fn fingerprint(config: &Config) -> String {
    if let Some(version) = &config.version {
        return version.clone();
    }

    let canonical = serde_json::to_value(config)
        .unwrap_or(Value::Null)
        .to_string();

    hex::encode(Sha256::digest(canonical.as_bytes()))
}
