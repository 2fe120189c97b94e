//! API version negotiation & per-request version lookup.
//!
//! A fresh connection knows nothing about the broker on the other side.
//! The negotiator probes `ApiVersions` with our candidate versions in
//! descending order; the first one the broker accepts yields the
//! `api_key -> {min, max}` table every later request is dispatched
//! through.

use std::collections::HashMap;

use crate::{
    error::{Error, KafkaCode, Result},
    network::BrokerConnection,
    protocol::{api_versions, api_versions::response::ApiKeyRange, ApiVersionsResponse,
        ApiVersionsRequest},
};

/// The inclusive version range a broker supports for one API key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VersionRange {
    pub min: i16,
    pub max: i16,
}

/// The negotiated version table for one broker.
///
/// Holds one [`VersionRange`] per API key and resolves the concrete wire
/// version to use for a request: the highest version this client
/// implements that falls inside the broker's range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestLookup {
    ranges: HashMap<i16, VersionRange>,
}

impl RequestLookup {
    pub fn new(api_keys: Vec<ApiKeyRange>) -> Self {
        let ranges = api_keys
            .into_iter()
            .map(|key| {
                (
                    key.api_key,
                    VersionRange {
                        min: key.min_version,
                        max: key.max_version,
                    },
                )
            })
            .collect();
        Self { ranges }
    }

    /// Pick the highest version out of `implemented` that the broker
    /// accepts for `api_key`.
    ///
    /// Fails with [`Error::UnsupportedVersion`] when the broker does not
    /// announce the API at all, or announces it only in versions this
    /// client does not implement. That error is fatal for the request;
    /// retrying cannot change the outcome.
    pub fn version_for(&self, api_key: i16, implemented: &[i16]) -> Result<i16> {
        let range = self
            .ranges
            .get(&api_key)
            .ok_or(Error::UnsupportedVersion(api_key))?;

        implemented
            .iter()
            .copied()
            .filter(|v| *v >= range.min && *v <= range.max)
            .max()
            .ok_or(Error::UnsupportedVersion(api_key))
    }

    /// Whether `version_for` would succeed for this API.
    pub fn supports(&self, api_key: i16, implemented: &[i16]) -> bool {
        self.version_for(api_key, implemented).is_ok()
    }
}

/// Probe the broker for its supported API versions.
///
/// Candidates are tried highest first. A candidate answered with
/// `UNSUPPORTED_VERSION` falls through to the next lower one; any other
/// broker error is fatal. Running out of candidates means the broker
/// speaks no `ApiVersions` dialect we know.
pub async fn negotiate<T: BrokerConnection>(
    conn: &T,
    correlation_id: i32,
    client_id: &str,
) -> Result<RequestLookup> {
    for &candidate in api_versions::VERSIONS {
        tracing::debug!("Probing ApiVersions v{}", candidate);
        let request = ApiVersionsRequest::new(candidate, correlation_id, client_id);

        let response = tokio::time::timeout(conn.connection_timeout(), conn.send_request(&request))
            .await
            .map_err(|_| Error::IoError(std::io::ErrorKind::TimedOut))??;
        let response = ApiVersionsResponse::parse(response.freeze(), candidate)?;

        match response.error_code {
            KafkaCode::None => {
                tracing::debug!(
                    "Negotiated ApiVersions v{}, {} keys",
                    candidate,
                    response.api_keys.len()
                );
                return Ok(RequestLookup::new(response.api_keys));
            }
            KafkaCode::UnsupportedVersion => continue,
            code => return Err(Error::KafkaError(code)),
        }
    }

    Err(Error::ApiVersionsNotSupported)
}

#[cfg(test)]
mod test {
    use super::*;

    fn lookup(ranges: &[(i16, i16, i16)]) -> RequestLookup {
        RequestLookup::new(
            ranges
                .iter()
                .map(|&(api_key, min_version, max_version)| ApiKeyRange {
                    api_key,
                    min_version,
                    max_version,
                })
                .collect(),
        )
    }

    #[test]
    fn picks_highest_implemented_in_range() {
        let lookup1 = lookup(&[(1, 0, 11)]);
        assert_eq!(lookup1.version_for(1, &[11, 4]), Ok(11));

        let lookup2 = lookup(&[(1, 0, 7)]);
        assert_eq!(lookup2.version_for(1, &[11, 4]), Ok(4));
    }

    #[test]
    fn respects_broker_minimum() {
        let lookup = lookup(&[(1, 6, 11)]);
        assert_eq!(
            lookup.version_for(1, &[4]),
            Err(Error::UnsupportedVersion(1))
        );
    }

    #[test]
    fn unknown_api_key_is_unsupported() {
        let lookup = lookup(&[(0, 0, 8)]);
        assert_eq!(
            lookup.version_for(42, &[1, 0]),
            Err(Error::UnsupportedVersion(42))
        );
        assert!(!lookup.supports(42, &[1, 0]));
        assert!(lookup.supports(0, &[3]));
    }
}
