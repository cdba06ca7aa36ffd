//! Per-NF-type discovery filter evaluation.
//!
//! `matches` is a pure function: given a candidate profile and a query, does
//! the profile satisfy it? Matching rules differ by NF type because each
//! type advertises different routing info (an SMF's slices and DNNs, an
//! AMF's GUAMIs, ...). Only fields the caller actually set participate —
//! an unset field never excludes a profile.

use nrf_api_models::{Guami, NfInfo, NfProfile, PlmnId, SNssai};
use regex::Regex;

/// Optional filter fields for a discovery query. Fields arrive from an HTTP
/// query string, so SNssai/PLMN/GUAMI values are carried as raw JSON text
/// and parsed lazily — a malformed blob yields a non-match rather than a
/// parse error.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryQuery {
    /// Candidate must expose at least one of these service names.
    pub service_names: Option<Vec<String>>,
    /// Candidate must serve at least one of these slices (raw JSON `SNssai`).
    pub s_nssais: Option<Vec<String>>,
    /// Candidate's matched slice must serve this DNN, or `"*"`.
    pub dnn: Option<String>,
    /// Candidate's per-type SUPI ranges must contain this SUPI.
    pub supi: Option<String>,
    /// Candidate must serve at least one of these PLMNs (raw JSON `PlmnId`).
    pub target_plmn_list: Option<Vec<String>>,
    /// Candidate AMF must serve at least one of these GUAMIs (raw JSON).
    pub guami: Option<Vec<String>>,
    /// Candidate AMF region id must equal this, unless the profile's is unset.
    pub amf_region_id: Option<String>,
    /// Candidate AMF set id must equal this, unless the profile's is unset.
    pub amf_set_id: Option<String>,
}

/// Decide whether `profile` satisfies `query`, per its NF type's rules.
#[must_use]
pub fn matches(profile: &NfProfile, query: &DiscoveryQuery) -> bool {
    match profile.nf_type.as_str() {
        "SMF" => matches_smf(profile, query),
        "AUSF" | "PCF" | "UDM" => matches_supi_gated(profile, query),
        "AMF" => matches_amf(profile, query),
        "NSSF" => true,
        _ => true,
    }
}

fn matches_smf(profile: &NfProfile, query: &DiscoveryQuery) -> bool {
    if let Some(service_names) = &query.service_names
        && !service_names.is_empty()
    {
        let exposed = profile
            .nf_services
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|service| service.service_name.as_str())
            .collect::<Vec<_>>();
        if !service_names.iter().any(|name| exposed.contains(&name.as_str())) {
            return false;
        }
    }

    let smf_info = match &profile.info {
        Some(NfInfo::Smf(info)) => Some(info),
        _ => None,
    };

    if let Some(raw_snssais) = &query.s_nssais
        && !raw_snssais.is_empty()
    {
        let requested: Vec<SNssai> = match raw_snssais
            .iter()
            .map(|raw| serde_json::from_str::<SNssai>(raw))
            .collect::<Result<_, _>>()
        {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        let matched = if let Some(info) = smf_info.filter(|info| info.s_nssai_smf_info_list.is_some()) {
            info.s_nssai_smf_info_list
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter_map(|entry| entry.s_nssai.as_ref())
                .any(|candidate| requested.contains(candidate))
        } else {
            profile
                .allowed_nssais
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|candidate| requested.contains(candidate))
        };
        if !matched {
            return false;
        }
    }

    if let Some(dnn) = &query.dnn {
        // Matched against every sNssaiSmfInfoList entry, not just the one(s)
        // that satisfied the s-nssais filter above: a profile can list a dnn
        // under a different slice than the one the requester asked for, and
        // the NRF has no way to tell that apart from a legitimate multi-slice
        // deployment without a slice/dnn pairing in the query itself.
        let Some(info) = smf_info else { return false };
        let dnn_matched = info
            .s_nssai_smf_info_list
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|entry| entry.dnn_smf_info_list.as_deref())
            .flatten()
            .any(|entry| entry.dnn == *dnn || entry.dnn == "*");
        if !dnn_matched {
            return false;
        }
    }

    true
}

fn matches_supi_gated(profile: &NfProfile, query: &DiscoveryQuery) -> bool {
    let Some(supi) = &query.supi else { return true };
    let supi_ranges = match &profile.info {
        Some(NfInfo::Ausf(info)) => info.supi_ranges.as_deref(),
        Some(NfInfo::Pcf(info)) => info.supi_ranges.as_deref(),
        Some(NfInfo::Udm(info)) => info.supi_ranges.as_deref(),
        _ => None,
    };
    match supi_ranges {
        Some(ranges) if !ranges.is_empty() => matches_supi_range(supi, ranges),
        _ => true,
    }
}

/// Decide whether `supi` falls within any of `ranges`, per each entry's
/// `pattern` (regex) or `[start, end]` lexicographic bound.
#[must_use]
pub fn matches_supi_range(supi: &str, ranges: &[nrf_api_models::SupiRange]) -> bool {
    ranges.iter().any(|range| {
        if let Some(pattern) = &range.pattern {
            if let Ok(regex) = Regex::new(pattern) {
                return regex.is_match(supi);
            }
            return false;
        }
        match (&range.start, &range.end) {
            (Some(start), Some(end)) => start.as_str() <= supi && supi <= end.as_str(),
            _ => false,
        }
    })
}

fn matches_amf(profile: &NfProfile, query: &DiscoveryQuery) -> bool {
    if let Some(raw_plmns) = &query.target_plmn_list
        && !raw_plmns.is_empty()
    {
        let requested: Vec<PlmnId> = match raw_plmns
            .iter()
            .map(|raw| serde_json::from_str::<PlmnId>(raw))
            .collect::<Result<_, _>>()
        {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        let served = profile.plmn_list.as_deref().unwrap_or_default();
        if !requested.iter().any(|plmn| served.contains(plmn)) {
            return false;
        }
    }

    let Some(NfInfo::Amf(amf_info)) = &profile.info else {
        return true;
    };

    if let Some(raw_guamis) = &query.guami
        && !raw_guamis.is_empty()
    {
        let requested: Vec<Guami> = match raw_guamis
            .iter()
            .map(|raw| serde_json::from_str::<Guami>(raw))
            .collect::<Result<_, _>>()
        {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        let served = amf_info.guami_list.as_deref().unwrap_or_default();
        if !requested.iter().any(|guami| served.contains(guami)) {
            return false;
        }
    }

    if let Some(region_id) = &query.amf_region_id
        && let Some(profile_region) = amf_info.amf_region_id.as_deref().filter(|r| !r.is_empty())
        && profile_region != region_id
    {
        return false;
    }

    if let Some(set_id) = &query.amf_set_id
        && let Some(profile_set) = amf_info.amf_set_id.as_deref().filter(|s| !s.is_empty())
        && profile_set != set_id
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_api_models::{
        AmfInfo, DnnSmfInfoItem, NfService, NfStatus, SNssaiSmfInfoItem, SmfInfo, SupiRange,
    };
    use uuid::Uuid;

    fn base_profile(nf_type: &str) -> NfProfile {
        NfProfile {
            nf_instance_id: Uuid::new_v4(),
            nf_type: nf_type.into(),
            nf_status: NfStatus::Registered,
            nf_services: None,
            plmn_list: None,
            s_nssais: None,
            allowed_nssais: None,
            info: None,
            heart_beat_timer: 30,
            expire_at: None,
            created_at: None,
        }
    }

    #[test]
    fn smf_matches_on_service_name_and_dnn() {
        let mut profile = base_profile("SMF");
        profile.nf_services = Some(vec![NfService {
            service_instance_id: "svc1".into(),
            service_name: "nsmf-pdusession".into(),
            scheme: "https".into(),
            api_prefix: None,
            ip_end_points: vec![],
            versions: None,
        }]);
        profile.info = Some(NfInfo::Smf(SmfInfo {
            s_nssai_smf_info_list: Some(vec![SNssaiSmfInfoItem {
                s_nssai: Some(SNssai { sst: 1, sd: Some("010203".into()) }),
                dnn_smf_info_list: Some(vec![DnnSmfInfoItem { dnn: "internet".into() }]),
            }]),
        }));

        let query = DiscoveryQuery {
            service_names: Some(vec!["nsmf-pdusession".into()]),
            dnn: Some("internet".into()),
            ..Default::default()
        };
        assert!(matches(&profile, &query));

        let miss = DiscoveryQuery {
            dnn: Some("ims".into()),
            ..Default::default()
        };
        assert!(!matches(&profile, &miss));
    }

    #[test]
    fn ausf_matches_supi_against_ranges() {
        let mut profile = base_profile("AUSF");
        profile.info = Some(NfInfo::Ausf(nrf_api_models::AusfInfo {
            supi_ranges: Some(vec![SupiRange {
                pattern: None,
                start: Some("imsi-001010000000001".into()),
                end: Some("imsi-001010000000099".into()),
            }]),
        }));

        let query = DiscoveryQuery {
            supi: Some("imsi-001010000000050".into()),
            ..Default::default()
        };
        assert!(matches(&profile, &query));

        let miss = DiscoveryQuery {
            supi: Some("imsi-999990000000050".into()),
            ..Default::default()
        };
        assert!(!matches(&profile, &miss));
    }

    #[test]
    fn amf_matches_on_plmn_and_treats_empty_region_as_wildcard() {
        let mut profile = base_profile("AMF");
        profile.plmn_list = Some(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }]);
        profile.info = Some(NfInfo::Amf(AmfInfo {
            guami_list: None,
            amf_region_id: None,
            amf_set_id: None,
        }));

        let query = DiscoveryQuery {
            target_plmn_list: Some(vec![
                serde_json::to_string(&PlmnId { mcc: "001".into(), mnc: "01".into() }).unwrap(),
            ]),
            amf_region_id: Some("02".into()),
            ..Default::default()
        };
        assert!(matches(&profile, &query));
    }

    #[test]
    fn nssf_always_matches() {
        let profile = base_profile("NSSF");
        assert!(matches(&profile, &DiscoveryQuery::default()));
    }

    #[test]
    fn malformed_json_blob_is_a_non_match_not_a_crash() {
        let mut profile = base_profile("AMF");
        profile.plmn_list = Some(vec![PlmnId { mcc: "001".into(), mnc: "01".into() }]);
        let query = DiscoveryQuery {
            target_plmn_list: Some(vec!["{not json".into()]),
            ..Default::default()
        };
        assert!(!matches(&profile, &query));
    }
}
