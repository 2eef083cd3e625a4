// src/edgar/resolver.rs
//! Chooses which proxy filing to analyze.
//!
//! Selection is a pure function of the listing and the supplied `now`:
//! keep the proxy forms, prefer those filed inside the lookback window,
//! then take the newest, breaking same-date ties by form rank.
//!
//! Date is the primary key: a DEFM14A loses to any DEF 14A filed later
//! inside the window. This is likely a latent defect (the merger proxy is
//! usually the one that matters) but is kept for compatibility until product
//! owners confirm the intended ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::edgar::models::{FilingCandidate, FilingListRequest, ResolvedFiling};
use crate::edgar::source::FilingLister;
use crate::utils::error::ResolveError;

// --- Constants ---
/// Forms recognized as proxy filings (compared case-insensitively).
pub const PROXY_FORMS: [&str; 4] = ["DEF 14A", "DEFM14A", "PRE 14A", "PREM14A"];
/// How far back a filing still counts as recent.
pub const LOOKBACK_DAYS: i64 = 400;
/// Cap on the number of filings requested from the lister.
pub const LISTING_LIMIT: usize = 200;

const UNRANKED: u8 = 9;

/// Priority of a form; lower is preferred.
pub fn form_rank(form: &str) -> u8 {
    match form.to_uppercase().as_str() {
        "DEFM14A" => 0,
        "DEF 14A" => 1,
        "PREM14A" => 2,
        "PRE 14A" => 3,
        _ => UNRANKED,
    }
}

pub fn is_proxy_form(form: &str) -> bool {
    let upper = form.to_uppercase();
    PROXY_FORMS.contains(&upper.as_str())
}

/// Parses an ISO-8601 date or date-time into naive UTC. Offsets are
/// converted to UTC; a bare date means midnight.
pub fn parse_filing_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn candidate_date(candidate: &FilingCandidate) -> Option<NaiveDateTime> {
    candidate.filing_date.as_deref().and_then(parse_filing_date)
}

/// Descending by date (unparseable dates last), then by preferred form.
fn newest_first(a: &FilingCandidate, b: &FilingCandidate) -> Ordering {
    let key = |c: &FilingCandidate| {
        (
            candidate_date(c).unwrap_or(NaiveDateTime::MIN),
            -i16::from(form_rank(&c.form_type)),
        )
    };
    key(b).cmp(&key(a))
}

/// Picks the filing to analyze from a listing, as of `now`.
pub fn choose_filing(
    identifier: &str,
    candidates: &[FilingCandidate],
    now: DateTime<Utc>,
) -> Result<ResolvedFiling, ResolveError> {
    let proxies: Vec<&FilingCandidate> = candidates
        .iter()
        .filter(|c| is_proxy_form(&c.form_type))
        .collect();
    if proxies.is_empty() {
        return Err(ResolveError::NoProxyFilings(identifier.to_string()));
    }

    let cutoff = now.naive_utc() - Duration::days(LOOKBACK_DAYS);
    // Undated candidates are kept rather than silently dropped
    let recent: Vec<&FilingCandidate> = proxies
        .iter()
        .copied()
        .filter(|c| candidate_date(c).map_or(true, |date| date >= cutoff))
        .collect();

    let mut pool = if recent.is_empty() {
        tracing::debug!("No proxy filings for {} since {}; considering all {}", identifier, cutoff, proxies.len());
        proxies
    } else {
        recent
    };
    pool.sort_by(|a, b| newest_first(a, b));

    let chosen = pool[0];
    if chosen.accession_number.is_empty() {
        return Err(ResolveError::MissingAccession(identifier.to_string()));
    }

    tracing::info!(
        "Selected {} {} filed {:?} for {}",
        chosen.form_type,
        chosen.accession_number,
        chosen.filing_date,
        identifier
    );
    Ok(ResolvedFiling {
        identifier: identifier.to_string(),
        accession_number: chosen.accession_number.clone(),
        filing_date: chosen.filing_date.clone(),
        form_type: Some(chosen.form_type.clone()),
        url: chosen.url.clone(),
    })
}

/// Resolves the filing for `identifier`. An explicit accession number is
/// returned as-is without any lookup.
pub async fn resolve_filing<L>(
    lister: &L,
    identifier: &str,
    accession_number: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ResolvedFiling, ResolveError>
where
    L: FilingLister + ?Sized,
{
    if let Some(accession) = accession_number.filter(|acc| !acc.is_empty()) {
        tracing::debug!("Using caller-supplied accession number {}", accession);
        return Ok(ResolvedFiling {
            identifier: identifier.to_string(),
            accession_number: accession.to_string(),
            filing_date: None,
            form_type: None,
            url: None,
        });
    }

    let request = FilingListRequest {
        identifier: identifier.to_string(),
        form_type: None,
        days: LOOKBACK_DAYS as u32,
        limit: LISTING_LIMIT,
    };
    let candidates = match lister.list_filings(&request).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!("Filing listing failed for {}: {}", identifier, e);
            Vec::new()
        }
    };
    tracing::debug!("Lister returned {} filings for {}", candidates.len(), identifier);

    choose_filing(identifier, &candidates, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EdgarError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    fn candidate(form: &str, accession: &str, date: Option<String>) -> FilingCandidate {
        FilingCandidate {
            form_type: form.to_string(),
            accession_number: accession.to_string(),
            filing_date: date,
            url: None,
        }
    }

    struct StaticLister {
        result: Result<Vec<FilingCandidate>, String>,
        requests: Mutex<Vec<FilingListRequest>>,
    }

    impl StaticLister {
        fn new(result: Result<Vec<FilingCandidate>, String>) -> Self {
            Self { result, requests: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl FilingLister for StaticLister {
        async fn list_filings(&self, request: &FilingListRequest) -> Result<Vec<FilingCandidate>, EdgarError> {
            self.requests.lock().unwrap().push(request.clone());
            self.result.clone().map_err(EdgarError::Upstream)
        }
    }

    #[test]
    fn test_form_ranks() {
        assert_eq!(form_rank("DEFM14A"), 0);
        assert_eq!(form_rank("def 14a"), 1);
        assert_eq!(form_rank("PREM14A"), 2);
        assert_eq!(form_rank("PRE 14A"), 3);
        assert_eq!(form_rank("10-K"), 9);
    }

    #[test]
    fn test_date_parsing() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(parse_filing_date("2024-03-01"), Some(midnight));
        assert_eq!(parse_filing_date("2024-03-01T00:00:00"), Some(midnight));
        assert_eq!(parse_filing_date("2024-03-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_filing_date("2024-03-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_filing_date("March 1st"), None);
        assert_eq!(parse_filing_date(""), None);
    }

    #[test]
    fn test_more_recent_date_beats_form_rank() {
        let candidates = vec![
            candidate("DEFM14A", "merger", Some(days_ago(300))),
            candidate("DEF 14A", "annual", Some(days_ago(10))),
        ];
        let resolved = choose_filing("ACME", &candidates, now()).unwrap();
        assert_eq!(resolved.accession_number, "annual");
        assert_eq!(resolved.form_type.as_deref(), Some("DEF 14A"));
    }

    #[test]
    fn test_form_rank_breaks_same_date_ties() {
        let date = Some(days_ago(20));
        let candidates = vec![
            candidate("PRE 14A", "pre", date.clone()),
            candidate("DEF 14A", "def", date.clone()),
            candidate("PREM14A", "prem", date.clone()),
            candidate("DEFM14A", "defm", date.clone()),
        ];
        assert_eq!(choose_filing("ACME", &candidates, now()).unwrap().accession_number, "defm");
        assert_eq!(choose_filing("ACME", &candidates[..3], now()).unwrap().accession_number, "def");
        assert_eq!(choose_filing("ACME", &candidates[..1], now()).unwrap().accession_number, "pre");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let candidates = vec![
            candidate("DEF 14A", "a", Some(days_ago(40))),
            candidate("DEF 14A", "b", Some(days_ago(40))),
            candidate("PRE 14A", "c", Some(days_ago(60))),
        ];
        let first = choose_filing("ACME", &candidates, now()).unwrap();
        for _ in 0..5 {
            assert_eq!(choose_filing("ACME", &candidates, now()).unwrap(), first);
        }
        // stable sort keeps listing order for full ties
        assert_eq!(first.accession_number, "a");
    }

    #[test]
    fn test_non_proxy_forms_are_ignored() {
        let candidates = vec![
            candidate("10-K", "annual-report", Some(days_ago(1))),
            candidate("def 14a", "proxy", Some(days_ago(90))),
        ];
        let resolved = choose_filing("ACME", &candidates, now()).unwrap();
        assert_eq!(resolved.accession_number, "proxy");
    }

    #[test]
    fn test_no_proxy_filings() {
        let candidates = vec![candidate("10-Q", "q", Some(days_ago(5)))];
        assert_eq!(
            choose_filing("ACME", &candidates, now()).unwrap_err().to_string(),
            "No proxy filings found for ACME."
        );
        assert!(matches!(
            choose_filing("ACME", &[], now()),
            Err(ResolveError::NoProxyFilings(_))
        ));
    }

    #[test]
    fn test_falls_back_to_all_when_none_recent() {
        let candidates = vec![
            candidate("DEF 14A", "old", Some(days_ago(800))),
            candidate("DEF 14A", "older", Some(days_ago(1200))),
        ];
        assert_eq!(choose_filing("ACME", &candidates, now()).unwrap().accession_number, "old");
    }

    #[test]
    fn test_stale_filings_excluded_while_recent_exist() {
        let candidates = vec![
            candidate("DEFM14A", "stale", Some(days_ago(401))),
            candidate("PRE 14A", "fresh", Some(days_ago(399))),
        ];
        assert_eq!(choose_filing("ACME", &candidates, now()).unwrap().accession_number, "fresh");
    }

    #[test]
    fn test_filing_exactly_at_cutoff_is_recent() {
        let at_cutoff = (now() - Duration::days(LOOKBACK_DAYS)).format("%Y-%m-%dT%H:%M:%S").to_string();
        // Were the boundary excluded, only the undated filing would remain recent
        let candidates = vec![
            candidate("DEFM14A", "older", Some(days_ago(LOOKBACK_DAYS + 1))),
            candidate("DEFM14A", "undated", None),
            candidate("PRE 14A", "boundary", Some(at_cutoff)),
        ];
        assert_eq!(choose_filing("ACME", &candidates, now()).unwrap().accession_number, "boundary");
    }

    #[test]
    fn test_whitespace_accession_is_still_an_accession() {
        let candidates = vec![candidate("DEF 14A", " ", Some(days_ago(3)))];
        assert_eq!(choose_filing("ACME", &candidates, now()).unwrap().accession_number, " ");
    }

    #[test]
    fn test_undated_candidates_survive_cutoff_but_sort_last() {
        let candidates = vec![
            candidate("DEFM14A", "undated", None),
            candidate("PRE 14A", "garbled", Some("not a date".into())),
            candidate("DEF 14A", "ancient", Some(days_ago(900))),
        ];
        // Undated ones pass the cutoff, so the ancient one is excluded
        let resolved = choose_filing("ACME", &candidates, now()).unwrap();
        assert_eq!(resolved.accession_number, "undated");
    }

    #[test]
    fn test_missing_accession_on_top_candidate() {
        let candidates = vec![
            candidate("DEF 14A", "", Some(days_ago(3))),
            candidate("DEF 14A", "older", Some(days_ago(30))),
        ];
        assert_eq!(
            choose_filing("ACME", &candidates, now()).unwrap_err(),
            ResolveError::MissingAccession("ACME".into())
        );
    }

    #[tokio::test]
    async fn test_explicit_accession_skips_listing() {
        let lister = StaticLister::new(Ok(Vec::new()));
        let resolved = resolve_filing(&lister, "ACME", Some("0001-23"), now()).await.unwrap();
        assert_eq!(resolved.accession_number, "0001-23");
        assert_eq!(resolved.identifier, "ACME");
        assert!(lister.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_request_shape() {
        let lister = StaticLister::new(Ok(vec![candidate("DEF 14A", "x", Some(days_ago(2)))]));
        resolve_filing(&lister, "ACME", None, now()).await.unwrap();

        let requests = lister.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[FilingListRequest {
                identifier: "ACME".into(),
                form_type: None,
                days: 400,
                limit: 200,
            }]
        );
    }

    #[tokio::test]
    async fn test_listing_failure_reads_as_no_filings() {
        let lister = StaticLister::new(Err("Failed to get recent filings: boom".into()));
        let err = resolve_filing(&lister, "ACME", None, now()).await.unwrap_err();
        assert_eq!(err, ResolveError::NoProxyFilings("ACME".into()));
    }
}
