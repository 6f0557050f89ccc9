//! Treaty eligibility and application order

use chrono::NaiveDate;

use super::Treaty;
use crate::policy::{LineOfBusiness, Policy};

/// Sort treaties into allocation order: oldest first, treaty id breaks ties
pub fn sort_for_allocation(treaties: &mut [Treaty]) {
    treaties.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.treaty_id.cmp(&b.treaty_id))
    });
}

/// Whether a treaty may absorb exposure on `line`
pub fn is_eligible(treaty: &Treaty, line: LineOfBusiness, as_of: Option<NaiveDate>) -> bool {
    treaty.is_active()
        && treaty.covers(line)
        && as_of.map_or(true, |date| treaty.in_force_on(date))
}

/// In-memory treaty catalog, read-only during allocation
#[derive(Debug, Clone, Default)]
pub struct TreatyCatalog {
    treaties: Vec<Treaty>,
}

impl TreatyCatalog {
    pub fn new(treaties: Vec<Treaty>) -> Self {
        Self { treaties }
    }

    pub fn len(&self) -> usize {
        self.treaties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.treaties.is_empty()
    }

    pub fn treaties(&self) -> &[Treaty] {
        &self.treaties
    }

    /// Active treaties covering the line, in allocation order
    pub fn active_for_line(&self, line: LineOfBusiness, as_of: Option<NaiveDate>) -> Vec<Treaty> {
        let mut eligible: Vec<Treaty> = self
            .treaties
            .iter()
            .filter(|t| is_eligible(t, line, as_of))
            .cloned()
            .collect();
        sort_for_allocation(&mut eligible);
        eligible
    }

    /// Treaties the engine should see for this policy
    pub fn eligible_for(&self, policy: &Policy, as_of: Option<NaiveDate>) -> Vec<Treaty> {
        self.active_for_line(policy.line_of_business, as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treaty::{TreatyStatus, TreatyType};
    use chrono::{Duration, Utc};

    fn treaty(id: &str, line: LineOfBusiness, age_days: i64) -> Treaty {
        let mut t = Treaty::new(id, TreatyType::QuotaShare, "R1", 20.0, 1_000.0, &[line]);
        t.created_at = Utc::now() - Duration::days(age_days);
        t
    }

    #[test]
    fn test_filters_status_and_line() {
        let mut expired = treaty("expired", LineOfBusiness::Motor, 5);
        expired.status = TreatyStatus::Expired;

        let catalog = TreatyCatalog::new(vec![
            treaty("motor", LineOfBusiness::Motor, 1),
            treaty("health", LineOfBusiness::Health, 2),
            expired,
        ]);

        let ids: Vec<_> = catalog
            .active_for_line(LineOfBusiness::Motor, None)
            .into_iter()
            .map(|t| t.treaty_id)
            .collect();
        assert_eq!(ids, vec!["motor"]);
    }

    #[test]
    fn test_orders_by_creation_then_id() {
        let b = treaty("b", LineOfBusiness::Life, 3);
        let a = treaty("a", LineOfBusiness::Life, 1);
        let mut c = treaty("c", LineOfBusiness::Life, 3);
        c.created_at = b.created_at;

        let catalog = TreatyCatalog::new(vec![a, c, b]);
        let ids: Vec<_> = catalog
            .active_for_line(LineOfBusiness::Life, None)
            .into_iter()
            .map(|t| t.treaty_id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_effective_dates_only_when_requested() {
        let mut t = treaty("old", LineOfBusiness::Property, 400);
        t.effective_from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        t.effective_to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let catalog = TreatyCatalog::new(vec![t]);

        assert_eq!(catalog.active_for_line(LineOfBusiness::Property, None).len(), 1);
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 1);
        assert!(catalog.active_for_line(LineOfBusiness::Property, as_of).is_empty());
    }
}
