//! A small budgeted, read-only sampling API over a [`RiskDomain`], ported
//! from the `dom_*_query` family's shared `dom_domain_query_meta` envelope.
//! `domain_query.h` itself (the original's shared query-result header) was
//! not present in this port's source material, so [`QueryMeta`] is a minimal
//! reconstruction covering only the fields every `dom_*_query` function
//! actually reads or writes: status, cost charged, and budget remaining.

use crate::budget::Budget;
use crate::domain::RiskDomain;
use crate::types::{InsurancePolicy, RiskExposure, RiskField, RiskProfile, RiskType};

/// Outcome status of one query call, `dom_domain_query_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// The record was found and `budget` had enough remaining.
    Ok,
    /// No record exists under the requested id.
    NotFound,
    /// The budget was exhausted before the record could be charged for.
    BudgetExhausted,
}

/// Envelope returned alongside every query's sampled value,
/// `dom_domain_query_meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryMeta {
    /// Outcome of this query.
    pub status: QueryStatus,
    /// Units of budget this query charged (`0` on refusal).
    pub cost_units: u32,
    /// Units of budget left after this query.
    pub budget_remaining: u32,
}

fn charge(budget: &mut Budget, cost: u32) -> Result<u32, QueryMeta> {
    if budget.consume(cost) {
        Ok(cost)
    } else {
        Err(QueryMeta {
            status: QueryStatus::BudgetExhausted,
            cost_units: 0,
            budget_remaining: budget.remaining(),
        })
    }
}

fn not_found(budget: &Budget) -> QueryMeta {
    QueryMeta {
        status: QueryStatus::NotFound,
        cost_units: 0,
        budget_remaining: budget.remaining(),
    }
}

macro_rules! query_fn {
    ($name:ident, $registry:ident, $ty:ty, $doc:expr) => {
        #[doc = $doc]
        pub fn $name(
            domain: &RiskDomain,
            id: u64,
            budget: &mut Budget,
        ) -> (Option<$ty>, QueryMeta) {
            let cost = domain.policy.cost_base;
            let cost_units = match charge(budget, cost) {
                Ok(cost_units) => cost_units,
                Err(meta) => return (None, meta),
            };
            match domain.$registry.find(id) {
                Some(value) => (
                    Some(*value),
                    QueryMeta {
                        status: QueryStatus::Ok,
                        cost_units,
                        budget_remaining: budget.remaining(),
                    },
                ),
                None => (None, not_found(budget)),
            }
        }
    };
}

query_fn!(query_type, types, RiskType, "Samples one risk type by id.");
query_fn!(query_field, fields, RiskField, "Samples one risk field by id.");
query_fn!(
    query_exposure,
    exposures,
    RiskExposure,
    "Samples one risk exposure by id."
);
query_fn!(
    query_profile,
    profiles,
    RiskProfile,
    "Samples one risk profile by id."
);
query_fn!(
    query_policy,
    policies,
    InsurancePolicy,
    "Samples one insurance policy by id."
);
