//! OAuth2 client-credentials access-token issuer (component F).
//!
//! Mints a short-lived bearer token for an already-`REGISTERED` NF instance.
//! The NRF only vouches for identity here; scope enforcement for the actual
//! service call is left to the producer NF, per spec §4.6.

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use nrf_api_models::{AccessTokenReq, AccessTokenRsp, NfStatus};
use rand::RngCore;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::store::SharedProfileStore;

const DEFAULT_TOKEN_LIFETIME_SECS: u32 = 3600;

#[derive(Debug, Serialize)]
struct Claims {
    sub: Uuid,
    iss: String,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
}

/// Mints HS256 bearer tokens for the `POST /oauth2/token` endpoint.
pub struct TokenIssuer {
    store: SharedProfileStore,
    encoding_key: EncodingKey,
    issuer: String,
    lifetime_secs: u32,
}

impl TokenIssuer {
    /// Construct an issuer backed by `store`. When `signing_secret` is
    /// `None`, a random 32-byte key is generated for this process only; every
    /// token minted before a restart stays verifiable, but tokens don't
    /// survive a redeploy, so a production config should always set one.
    #[must_use]
    pub fn new(
        store: SharedProfileStore,
        signing_secret: Option<&[u8]>,
        issuer: impl Into<String>,
        lifetime_secs: Option<u32>,
    ) -> Self {
        let secret = signing_secret.map_or_else(
            || {
                warn!("no oauth2 signing key configured; using an ephemeral key for this process only");
                let mut bytes = vec![0u8; 32];
                rand::rng().fill_bytes(&mut bytes);
                bytes
            },
            <[u8]>::to_vec,
        );
        Self {
            store,
            encoding_key: EncodingKey::from_secret(&secret),
            issuer: issuer.into(),
            lifetime_secs: lifetime_secs.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
        }
    }

    /// Validate and mint a token for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an unsupported `grant_type` or a
    /// caller whose profile is not `REGISTERED`, [`CoreError::NotFound`] if
    /// `nfInstanceId` has no registered profile, and
    /// [`CoreError::SystemFailure`] if signing the token fails.
    pub async fn issue(&self, request: &AccessTokenReq) -> CoreResult<AccessTokenRsp> {
        if request.grant_type != "client_credentials" {
            return Err(CoreError::Validation {
                detail: format!("unsupported grant_type '{}'", request.grant_type),
            });
        }

        let profile = self
            .store
            .get_one(request.nf_instance_id)
            .await
            .ok_or(CoreError::NotFound {
                resource: "nf_instance",
                id: request.nf_instance_id.to_string(),
            })?;
        if profile.nf_status != NfStatus::Registered {
            return Err(CoreError::Validation {
                detail: "nfInstanceId is not REGISTERED".to_string(),
            });
        }

        let now = Utc::now();
        let claims = Claims {
            sub: profile.nf_instance_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ChronoDuration::seconds(i64::from(self.lifetime_secs))).timestamp(),
            scope: request.scope.clone(),
        };
        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| CoreError::SystemFailure { source: Box::new(err) })?;

        Ok(AccessTokenRsp {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.lifetime_secs,
            scope: request.scope.clone(),
        })
    }
}
