use std::collections::BTreeSet;

use sqlx::{Postgres, QueryBuilder};
use vireo_application::ScopedQuery;
use vireo_core::{DeptId, UserId};

/// Writes row filter predicates into a statement that already has a
/// `WHERE` clause.
pub(crate) struct PostgresScopedQuery<'b, 'args> {
    builder: &'b mut QueryBuilder<'args, Postgres>,
}

impl<'b, 'args> PostgresScopedQuery<'b, 'args> {
    pub(crate) fn new(builder: &'b mut QueryBuilder<'args, Postgres>) -> Self {
        Self { builder }
    }
}

impl ScopedQuery for PostgresScopedQuery<'_, '_> {
    fn where_department_in(&mut self, departments: &BTreeSet<DeptId>) {
        let ids: Vec<i64> = departments.iter().map(DeptId::as_i64).collect();
        self.builder.push(" AND dept_id = ANY(");
        self.builder.push_bind(ids);
        self.builder.push(")");
    }

    fn where_creator_is(&mut self, creator: UserId) {
        self.builder.push(" AND creator_id = ");
        self.builder.push_bind(creator.as_i64());
    }

    fn where_never(&mut self) {
        self.builder.push(" AND 1 = 0");
    }
}
