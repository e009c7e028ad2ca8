//! Filter types for querying plans.

use super::PlanStatus;

/// Filter options for querying plans.
///
/// The default filter lists the caller's non-template, non-deleted plans of
/// any status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanFilter {
    /// Filter by plan name (case-insensitive partial match on `name_en`)
    pub name_contains: Option<String>,

    /// `Some(true)` lists only templates, `Some(false)` excludes them
    pub is_template: Option<bool>,

    /// `Some(true)` lists only plans shared with every municipality
    pub is_public: Option<bool>,

    /// Filter by plan status
    pub status: Option<PlanStatus>,

    /// Restrict to plans created by this user
    pub owner_id: Option<String>,

    /// Include soft-deleted plans
    pub include_deleted: bool,

    /// List only soft-deleted plans (implies `include_deleted`)
    pub only_deleted: bool,
}

impl PlanFilter {
    /// Filter for the template gallery: every non-deleted template.
    ///
    /// ```rust
    /// use compass_core::models::PlanFilter;
    ///
    /// let filter = PlanFilter::templates();
    /// assert_eq!(filter.is_template, Some(true));
    /// assert!(!filter.include_deleted);
    /// ```
    pub fn templates() -> Self {
        Self {
            is_template: Some(true),
            ..Default::default()
        }
    }
}

impl From<&crate::params::ListPlans> for PlanFilter {
    fn from(params: &crate::params::ListPlans) -> Self {
        Self {
            name_contains: params.name_contains.clone(),
            is_template: Some(params.templates),
            is_public: params.public_only.then_some(true),
            status: params.status,
            owner_id: params.owner.clone(),
            include_deleted: params.deleted,
            only_deleted: params.deleted,
        }
    }
}
