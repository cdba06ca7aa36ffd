#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the NRF public API.
//!
//! These types mirror the REST shapes described in the NRF's external
//! interfaces: NF profile registration, discovery, subscription and the
//! OAuth2 token endpoint. Kept dependency-free of any domain crate so both
//! the server and any future client share one definition of the wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RFC9457-compatible problem document surfaced on validation/runtime errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    /// URI reference identifying the problem type.
    pub kind: String,
    /// Short, human-readable summary of the issue.
    pub title: String,
    /// HTTP status code associated with the error.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Detailed diagnostic message when available.
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Parameters that failed validation, if applicable.
    pub invalid_params: Option<Vec<ProblemInvalidParam>>,
}

/// Invalid parameter pointer surfaced alongside a [`ProblemDetails`] payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemInvalidParam {
    /// JSON Pointer to the offending field.
    pub pointer: String,
    /// Human-readable description of the validation failure.
    pub message: String,
}

/// Registration status of an [`NfProfile`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NfStatus {
    /// Actively discoverable and eligible for notifications.
    Registered,
    /// Registered but temporarily withdrawn from service.
    Suspended,
    /// Present in the store but excluded from discovery results.
    Undiscoverable,
}

/// Public Land Mobile Network identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlmnId {
    /// Mobile Country Code, three digits.
    pub mcc: String,
    /// Mobile Network Code, two or three digits.
    pub mnc: String,
}

/// Single Network Slice Selection Assistance Information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SNssai {
    /// Slice/Service Type.
    pub sst: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slice Differentiator, six hex digits when present.
    pub sd: Option<String>,
}

/// One reachable endpoint exposed by an [`NfService`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpEndPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// IPv4 address of the endpoint, when applicable.
    pub ipv4_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// IPv6 address of the endpoint, when applicable.
    pub ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Listening port, when the service does not use the scheme default.
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Transport protocol, e.g. `"TCP"`.
    pub transport: Option<String>,
}

/// API version advertised by an [`NfService`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NfServiceVersion {
    /// Version segment carried in the request URI, e.g. `"v1"`.
    pub api_version_in_uri: String,
    /// Full semantic version of the service API.
    pub api_full_version: String,
}

/// One service exposed by a registered NF instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NfService {
    /// Identifier for this service instance, unique within the NF profile.
    pub service_instance_id: String,
    /// Service name, e.g. `"nsmf-pdusession"`.
    pub service_name: String,
    /// URI scheme used to reach the service (`"http"` or `"https"`).
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Path prefix prepended to the service's API routes, if any.
    pub api_prefix: Option<String>,
    /// Reachable endpoints for this service; at least one is required.
    pub ip_end_points: Vec<IpEndPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// API versions advertised by this service.
    pub versions: Option<Vec<NfServiceVersion>>,
}

/// SUPI range matched by identity-bearing NF types (AUSF, PCF, UDM).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupiRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Regular expression matched against a candidate SUPI.
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Inclusive lower bound of the range, compared lexicographically.
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Inclusive upper bound of the range, compared lexicographically.
    pub end: Option<String>,
}

/// DNN entry nested under an [`SNssaiSmfInfoItem`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnnSmfInfoItem {
    /// Data Network Name, or `"*"` to match any DNN.
    pub dnn: String,
}

/// One slice served by an SMF, with its associated DNNs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SNssaiSmfInfoItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slice identifier served by this entry.
    pub s_nssai: Option<SNssai>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// DNNs reachable under the above slice.
    pub dnn_smf_info_list: Option<Vec<DnnSmfInfoItem>>,
}

/// Per-type info block for an SMF profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmfInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slices and DNNs served by this SMF.
    pub s_nssai_smf_info_list: Option<Vec<SNssaiSmfInfoItem>>,
}

/// Per-type info block for an AUSF profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AusfInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// SUPI ranges this AUSF instance can authenticate.
    pub supi_ranges: Option<Vec<SupiRange>>,
}

/// Per-type info block for a PCF profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PcfInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// SUPI ranges this PCF instance serves policy for.
    pub supi_ranges: Option<Vec<SupiRange>>,
}

/// Per-type info block for a UDM profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UdmInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// SUPI ranges this UDM instance owns subscriber data for.
    pub supi_ranges: Option<Vec<SupiRange>>,
}

/// Globally Unique AMF Identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Guami {
    /// PLMN the AMF set belongs to.
    pub plmn_id: PlmnId,
    /// AMF identifier within the PLMN (region + set + pointer).
    pub amf_id: String,
}

/// Per-type info block for an AMF profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AmfInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// GUAMIs served by this AMF instance.
    pub guami_list: Option<Vec<Guami>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// AMF region identifier; empty is treated as wildcard by the filter.
    pub amf_region_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// AMF set identifier; empty is treated as wildcard by the filter.
    pub amf_set_id: Option<String>,
}

/// Polymorphic per-NF-type info block carried by an [`NfProfile`].
///
/// The upstream 3GPP schema represents this as five mutually-exclusive
/// optional fields (`smfInfo`, `amfInfo`, ...); this tagged union collapses
/// them into one field so the filter evaluator dispatches on a single tag
/// instead of testing five `Option`s for `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "nfInfoType", rename_all = "UPPERCASE")]
pub enum NfInfo {
    /// SMF-specific reachability info.
    Smf(SmfInfo),
    /// AMF-specific reachability info.
    Amf(AmfInfo),
    /// AUSF-specific reachability info.
    Ausf(AusfInfo),
    /// PCF-specific reachability info.
    Pcf(PcfInfo),
    /// UDM-specific reachability info.
    Udm(UdmInfo),
}

/// The central entity of the repository: a registered NF instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NfProfile {
    /// Identity assigned at first registration; immutable thereafter.
    pub nf_instance_id: Uuid,
    /// NF type, e.g. `"AMF"`, `"SMF"`, `"AUSF"`; open-ended per 3GPP Rel-16+.
    pub nf_type: String,
    /// Current registration status.
    pub nf_status: NfStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Services exposed by this NF instance.
    pub nf_services: Option<Vec<NfService>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// PLMNs this instance serves; defaulted by the registry when absent.
    pub plmn_list: Option<Vec<PlmnId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slices this instance is explicitly configured for.
    pub s_nssais: Option<Vec<SNssai>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Slices this instance allows when no per-type override applies.
    pub allowed_nssais: Option<Vec<SNssai>>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    /// Per-NF-type reachability info, see [`NfInfo`].
    pub info: Option<NfInfo>,
    /// Seconds between expected heartbeats; drives `expire_at` computation.
    pub heart_beat_timer: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Absolute expiry computed by the registry; `None` when expiry is off.
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Timestamp of first registration.
    pub created_at: Option<DateTime<Utc>>,
}

/// Filter describing which profile changes a subscriber wants to hear about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscrCond {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Match profiles of this NF type only.
    pub nf_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Match only the profile with this instance id.
    pub nf_instance_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Match profiles exposing a service with this name.
    pub service_name: Option<String>,
}

/// A subscription to NF lifecycle notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NrfSubscriptionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Assigned by the registry on creation; absent on create requests.
    pub subscription_id: Option<Uuid>,
    /// Destination URI for event notifications.
    pub nf_status_notification_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Subscriber's own NF type, recorded for metrics labeling only.
    pub req_nf_type: Option<String>,
    /// Filter selecting which profile changes to deliver.
    pub subscr_cond: SubscrCond,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Absolute expiry for the subscription, if bounded.
    pub validity_time: Option<DateTime<Utc>>,
}

/// Lifecycle event kind delivered to subscribers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEventType {
    /// An NF instance registered for the first time.
    Registered,
    /// An NF instance's profile was replaced or patched.
    ProfileChanged,
    /// An NF instance was deregistered or its profile expired.
    Deregistered,
}

/// Body POSTed to a subscriber's `nfStatusNotificationUri`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// The kind of lifecycle change that occurred.
    pub event: NotificationEventType,
    /// Location URI of the NF instance the event concerns.
    pub nf_instance_uri: String,
}

/// One entry in a [`UriList`] listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UriListItem {
    /// Absolute URI to the referenced resource.
    pub href: String,
}

/// Wrapper matching the coarse `{item: {href}}` listing shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UriListLink {
    /// The linked resource.
    pub item: UriListItem,
}

/// Coarse per-NF-type listing returned by `GetNFInstances`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UriList {
    /// Ordered list of links, one per matching NF instance.
    pub link: Vec<UriListLink>,
}

/// Response body for a successful discovery query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Seconds the caller may cache this result for.
    pub validity_period: u32,
    /// Profiles that matched the discovery query.
    pub nf_instances: Vec<NfProfile>,
}

/// Request body for `POST /oauth2/token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenReq {
    /// Must be `"client_credentials"`.
    pub grant_type: String,
    /// Caller's own NF instance id; must be `REGISTERED` to mint a token.
    pub nf_instance_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Requested scope; recorded but not enforced by the NRF.
    pub scope: Option<String>,
}

/// Response body for a successful token mint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRsp {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Token lifetime in seconds from the moment of issuance.
    pub expires_in: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Scope echoed back from the request, if any.
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nf_info_tag_round_trips() {
        let info = NfInfo::Amf(AmfInfo {
            guami_list: Some(vec![Guami {
                plmn_id: PlmnId {
                    mcc: "001".into(),
                    mnc: "01".into(),
                },
                amf_id: "ABCDEF".into(),
            }]),
            amf_region_id: Some("01".into()),
            amf_set_id: None,
        });
        let json = serde_json::to_string(&info).expect("serialize");
        assert!(json.contains("\"nfInfoType\":\"AMF\""));
        let round_tripped: NfInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round_tripped, info);
    }

    #[test]
    fn nf_status_uses_screaming_snake_case() {
        let json = serde_json::to_string(&NfStatus::Undiscoverable).expect("serialize");
        assert_eq!(json, "\"UNDISCOVERABLE\"");
    }

    #[test]
    fn notification_event_type_uses_screaming_snake_case() {
        let json = serde_json::to_string(&NotificationEventType::ProfileChanged).expect("serialize");
        assert_eq!(json, "\"PROFILE_CHANGED\"");
    }

    #[test]
    fn profile_serializes_flattened_info() {
        let profile = NfProfile {
            nf_instance_id: Uuid::nil(),
            nf_type: "SMF".into(),
            nf_status: NfStatus::Registered,
            nf_services: None,
            plmn_list: None,
            s_nssais: None,
            allowed_nssais: None,
            info: Some(NfInfo::Smf(SmfInfo::default())),
            heart_beat_timer: 30,
            expire_at: None,
            created_at: None,
        };
        let json = serde_json::to_value(&profile).expect("serialize");
        assert_eq!(json["nfInfoType"], "SMF");
        assert!(json.get("info").is_none());
    }
}
