use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use thiserror::Error;
use waypoint_defence_arena::SaveState;

const SAVE_DOMAIN: &str = "wd";
const SAVE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded save payload.
pub(crate) const SAVE_HEADER: &str = "wd:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a save into a single-line string suitable for copying around.
pub(crate) fn encode(state: &SaveState) -> Result<String, SaveTransferError> {
    let json = serde_json::to_vec(state).map_err(SaveTransferError::Serialize)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!("{SAVE_HEADER}{FIELD_DELIMITER}{encoded}"))
}

/// Decodes a save from its string representation.
pub(crate) fn decode(value: &str) -> Result<SaveState, SaveTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SaveTransferError::EmptyPayload);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let domain = parts.next().ok_or(SaveTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SaveTransferError::MissingVersion)?;
    let payload = parts.next().ok_or(SaveTransferError::MissingPayload)?;

    if domain != SAVE_DOMAIN {
        return Err(SaveTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SAVE_VERSION {
        return Err(SaveTransferError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SaveTransferError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(SaveTransferError::InvalidPayload)
}

/// Errors that can occur while moving saves in and out of text form.
#[derive(Debug, Error)]
pub(crate) enum SaveTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("save code was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded save.
    #[error("save code is missing the prefix")]
    MissingPrefix,
    /// The encoded save did not contain a version segment.
    #[error("save code is missing the version")]
    MissingVersion,
    /// The encoded save did not include the payload segment.
    #[error("save code is missing the payload")]
    MissingPayload,
    /// The encoded save used an unexpected prefix segment.
    #[error("save prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded save used an unsupported version identifier.
    #[error("save version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode save payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse save payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The save could not be serialised.
    #[error("could not serialise save: {0}")]
    Serialize(#[source] serde_json::Error),
}
