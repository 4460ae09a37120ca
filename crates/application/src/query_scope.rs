//! Row filter decision applied to every data-scoped query.
//!
//! The filter runs once per request. Errors never escape: an unresolvable
//! principal turns into a predicate that matches no row.

use std::collections::BTreeSet;

use vireo_core::{DeptId, UserId};
use vireo_domain::{DataScopeError, PermittedDepartments};

use crate::{DataScopeConfig, ResolvedPrincipal};

/// Query builder seam the row filter writes its predicate into.
///
/// Each method adds exactly one `AND`-ed condition.
pub trait ScopedQuery {
    /// Restricts rows to `dept_id` values in `departments`.
    fn where_department_in(&mut self, departments: &BTreeSet<DeptId>);

    /// Restricts rows to those created by `creator`.
    fn where_creator_is(&mut self, creator: UserId);

    /// Adds an always-false condition.
    fn where_never(&mut self);
}

/// Predicate chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// No condition is added.
    Unrestricted,
    /// `dept_id IN (...)`.
    Departments(BTreeSet<DeptId>),
    /// `creator_id = ?`.
    Owner(UserId),
    /// Always-false condition.
    DenyAll,
}

impl RowFilter {
    /// Writes the predicate into a query. Adds zero or one condition.
    pub fn apply<Q: ScopedQuery + ?Sized>(&self, query: &mut Q) {
        match self {
            Self::Unrestricted => {}
            Self::Departments(departments) => query.where_department_in(departments),
            Self::Owner(creator) => query.where_creator_is(*creator),
            Self::DenyAll => query.where_never(),
        }
    }
}

/// Per-route opt-in and the optional target department of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeRequest {
    enforced: bool,
    override_department: Option<DeptId>,
}

impl ScopeRequest {
    /// Route that did not opt into row filtering.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Route with row filtering and an optional `deptId` parameter.
    #[must_use]
    pub fn enforced(override_department: Option<DeptId>) -> Self {
        Self {
            enforced: true,
            override_department,
        }
    }

    /// Parses a raw `deptId` query parameter.
    ///
    /// Only plain unsigned decimal digits are accepted. Signs, whitespace and
    /// any other content make the parameter absent.
    #[must_use]
    pub fn parse_override(raw: Option<&str>) -> Option<DeptId> {
        raw.filter(|value| !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()))
            .and_then(|value| value.parse::<u64>().ok())
            .and_then(|value| i64::try_from(value).ok())
            .map(DeptId::new)
    }

    /// Returns whether the route opted into row filtering.
    #[must_use]
    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// Returns the requested target department.
    #[must_use]
    pub fn override_department(&self) -> Option<DeptId> {
        self.override_department
    }
}

/// Everything the row filter needs for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataScopeContext {
    principal: Result<ResolvedPrincipal, DataScopeError>,
    request: ScopeRequest,
}

impl DataScopeContext {
    /// Bundles the resolution outcome with the route's scope request.
    #[must_use]
    pub fn new(principal: Result<ResolvedPrincipal, DataScopeError>, request: ScopeRequest) -> Self {
        Self { principal, request }
    }

    /// Returns the resolved principal or the reason it is missing.
    pub fn principal(&self) -> Result<&ResolvedPrincipal, &DataScopeError> {
        self.principal.as_ref()
    }

    /// Returns the route's scope request.
    #[must_use]
    pub fn request(&self) -> &ScopeRequest {
        &self.request
    }
}

/// Runtime row filter decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryScopeFilter {
    super_admin_role: String,
}

impl QueryScopeFilter {
    /// Creates the filter with the configured super-admin role name.
    #[must_use]
    pub fn new(config: &DataScopeConfig) -> Self {
        Self {
            super_admin_role: config.super_admin_role().to_owned(),
        }
    }

    /// Picks the predicate for one request.
    ///
    /// Order of checks: opt-in, super-admin, unrestricted scope, target
    /// department parameter, department set, owner. A target department
    /// inside the permitted set lifts filtering for the request.
    #[must_use]
    pub fn decide(
        &self,
        principal: Result<&ResolvedPrincipal, &DataScopeError>,
        request: &ScopeRequest,
    ) -> RowFilter {
        if !request.is_enforced() {
            return RowFilter::Unrestricted;
        }

        let resolved = match principal {
            Ok(resolved) => resolved,
            Err(error) => {
                tracing::warn!(error = %error, "data scope unresolved, denying all rows");
                return RowFilter::DenyAll;
            }
        };
        let user_id = resolved.principal().user_id();

        if resolved.principal().has_role_named(&self.super_admin_role) {
            tracing::debug!(user_id = %user_id, "super-admin bypasses row filter");
            return RowFilter::Unrestricted;
        }

        let departments = match resolved.resolution().departments() {
            PermittedDepartments::All => return RowFilter::Unrestricted,
            PermittedDepartments::Listed(departments) => departments,
        };

        if let Some(target) = request.override_department() {
            if departments.contains(&target) {
                tracing::debug!(
                    user_id = %user_id,
                    department_id = %target,
                    "permitted target department lifts row filter"
                );
                return RowFilter::Unrestricted;
            }
            return RowFilter::Owner(user_id);
        }

        if departments.is_empty() {
            return RowFilter::Owner(user_id);
        }

        RowFilter::Departments(departments.clone())
    }

    /// Decides the predicate for a request and writes it into `query`.
    pub fn apply_scope<Q: ScopedQuery + ?Sized>(
        &self,
        query: &mut Q,
        context: &DataScopeContext,
    ) -> RowFilter {
        let filter = self.decide(context.principal(), context.request());
        filter.apply(query);
        filter
    }
}

/// Source of the row predicate a repository writes into its statements.
pub trait RowScope: Send + Sync {
    /// Writes the predicate into `query` and returns it, so further
    /// statements of the same request can reuse it without deciding again.
    fn write_into(&self, query: &mut dyn ScopedQuery) -> RowFilter;
}

impl RowScope for RowFilter {
    fn write_into(&self, query: &mut dyn ScopedQuery) -> RowFilter {
        self.apply(query);
        self.clone()
    }
}

/// The request's [`DataScopeContext`] bound to the filter that decides it.
#[derive(Debug, Clone, Copy)]
pub struct RequestScope<'a> {
    filter: &'a QueryScopeFilter,
    context: &'a DataScopeContext,
}

impl<'a> RequestScope<'a> {
    /// Binds a request context to the filter.
    #[must_use]
    pub fn new(filter: &'a QueryScopeFilter, context: &'a DataScopeContext) -> Self {
        Self { filter, context }
    }
}

impl RowScope for RequestScope<'_> {
    fn write_into(&self, query: &mut dyn ScopedQuery) -> RowFilter {
        self.filter.apply_scope(query, self.context)
    }
}
