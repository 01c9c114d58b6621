// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! Format before encoding: `return_to|timestamp_hex|signature_hex`, where the
//! signature is HMAC-SHA256 over `return_to|timestamp_hex`. The whole string
//! is base64url encoded so it survives the round trip through Strava.

use crate::error::AppError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// How long a consent round trip may take.
pub const STATE_MAX_AGE_SECS: i64 = 10 * 60;

/// Why a state parameter was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("state key rejected")]
    Key,
    #[error("state is not valid base64url")]
    Encoding,
    #[error("state is malformed")]
    Malformed,
    #[error("state signature mismatch")]
    Signature,
    #[error("state expired")]
    Expired,
}

/// Sign `return_to` together with the issue time.
pub fn sign_state(
    key: &[u8],
    return_to: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let payload = format!("{}|{:x}", return_to, issued_at.timestamp_millis());
    let mac = mac_for(key, &payload)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    let signature = hex::encode(mac.finalize().into_bytes());
    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Check signature and age; returns the `return_to` URL.
pub fn verify_state(key: &[u8], state: &str, now: DateTime<Utc>) -> Result<String, StateError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(state)
        .map_err(|_| StateError::Encoding)?;
    let decoded = String::from_utf8(bytes).map_err(|_| StateError::Encoding)?;

    // return_to may itself contain '|', so split from the right.
    let mut parts = decoded.rsplitn(3, '|');
    let (Some(signature_hex), Some(timestamp_hex), Some(return_to)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(StateError::Malformed);
    };

    let signature = hex::decode(signature_hex).map_err(|_| StateError::Malformed)?;
    let payload = format!("{}|{}", return_to, timestamp_hex);
    mac_for(key, &payload)
        .map_err(|_| StateError::Key)?
        .verify_slice(&signature)
        .map_err(|_| StateError::Signature)?;

    let issued_ms = i64::from_str_radix(timestamp_hex, 16).map_err(|_| StateError::Malformed)?;
    let issued_at = DateTime::from_timestamp_millis(issued_ms).ok_or(StateError::Malformed)?;
    if now - issued_at > Duration::seconds(STATE_MAX_AGE_SECS) || issued_at > now {
        return Err(StateError::Expired);
    }

    Ok(return_to.to_string())
}

fn mac_for(key: &[u8], payload: &str) -> Result<HmacSha256, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(payload.as_bytes());
    Ok(mac)
}
