//! Document status classification
//!
//! Pure functions mapping server-reported counters to an access state.
//! Only `NearLimit` is derived by the client, and it is advisory.

/// Fraction of the view limit at which a document is flagged as near its limit
pub const NEAR_LIMIT_RATIO: f64 = 0.8;

/// Client-derived classification of a document's consumability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessState {
    Active,
    NearLimit,
    LimitReached,
    Expired,
}

impl AccessState {
    /// Badge label, if the state carries one
    pub fn label(self) -> Option<&'static str> {
        match self {
            AccessState::Active => None,
            AccessState::NearLimit => Some("Near limit"),
            AccessState::LimitReached => Some("Limit reached"),
            AccessState::Expired => Some("Expired"),
        }
    }
}

/// Classify a document. First match wins:
/// expired, then limit reached, then near limit, else active.
pub fn classify(
    is_expired: bool,
    is_limit_reached: bool,
    view_count: u32,
    view_limit: Option<u32>,
) -> AccessState {
    if is_expired {
        AccessState::Expired
    } else if is_limit_reached {
        AccessState::LimitReached
    } else if is_near_limit(view_count, view_limit) {
        AccessState::NearLimit
    } else {
        AccessState::Active
    }
}

/// `view_count >= 0.8 * view_limit`, compared exactly
///
/// Cross-multiplied in integers (5 * count >= 4 * limit) so 4 of 5 qualifies
/// without float rounding. A zero limit is treated as no limit.
fn is_near_limit(view_count: u32, view_limit: Option<u32>) -> bool {
    match view_limit {
        Some(limit) if limit > 0 => u64::from(view_count) * 5 >= u64::from(limit) * 4,
        _ => false,
    }
}

/// Whether the download action is rendered at all
///
/// Near-limit documents stay downloadable.
pub fn is_download_eligible(is_expired: bool, is_limit_reached: bool) -> bool {
    !(is_expired || is_limit_reached)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_wins() {
        assert_eq!(classify(true, false, 0, None), AccessState::Expired);
        assert_eq!(classify(true, true, 10, Some(10)), AccessState::Expired);
        assert_eq!(classify(true, false, 9, Some(10)), AccessState::Expired);
        assert!(!is_download_eligible(true, false));
        assert!(!is_download_eligible(true, true));
    }

    #[test]
    fn test_limit_reached() {
        assert_eq!(classify(false, true, 3, Some(3)), AccessState::LimitReached);
        assert_eq!(classify(false, true, 0, None), AccessState::LimitReached);
        assert!(!is_download_eligible(false, true));
    }

    #[test]
    fn test_near_limit_boundary() {
        assert_eq!(classify(false, false, 4, Some(5)), AccessState::NearLimit);
        assert_eq!(classify(false, false, 3, Some(5)), AccessState::Active);
        assert_eq!(classify(false, false, 8, Some(10)), AccessState::NearLimit);
        assert_eq!(classify(false, false, 7, Some(10)), AccessState::Active);
        assert_eq!(classify(false, false, 1, Some(1)), AccessState::NearLimit);
        assert!(is_download_eligible(false, false));
    }

    #[test]
    fn test_near_limit_matches_ratio() {
        for limit in 1..=50u32 {
            for count in 0..=limit {
                let expected = f64::from(count) >= f64::from(limit) * NEAR_LIMIT_RATIO - 1e-9;
                let state = classify(false, false, count, Some(limit));
                assert_eq!(state == AccessState::NearLimit, expected, "count={count} limit={limit}");
            }
        }
    }

    #[test]
    fn test_unlimited_is_active() {
        assert_eq!(classify(false, false, 1_000, None), AccessState::Active);
        assert_eq!(classify(false, false, 5, Some(0)), AccessState::Active);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AccessState::Expired.label(), Some("Expired"));
        assert_eq!(AccessState::LimitReached.label(), Some("Limit reached"));
        assert_eq!(AccessState::NearLimit.label(), Some("Near limit"));
        assert_eq!(AccessState::Active.label(), None);
    }
}
