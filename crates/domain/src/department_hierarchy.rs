//! In-memory department tree index.
//!
//! Built from the flat, unfiltered department list. Every walk is iterative,
//! tracks visited departments and stops at the configured depth, so malformed
//! parent links (cycles, very deep chains) can never loop or exhaust memory.

use std::collections::{BTreeSet, HashMap, HashSet};

use vireo_core::DeptId;

use crate::{DataScopeError, Department};

/// Default maximum number of levels walked below a department.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 10;

/// Defect found while walking the department tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyCorruption {
    /// A department was reached twice, which only happens through a cycle.
    Cycle {
        /// Department reached a second time.
        department: DeptId,
    },
    /// Departments exist below the depth limit.
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },
}

impl HierarchyCorruption {
    /// Converts the defect into an error anchored at the traversal root.
    #[must_use]
    pub fn into_error(self, root: DeptId) -> DataScopeError {
        let detail = match self {
            Self::Cycle { department } => format!("cycle through department '{department}'"),
            Self::DepthExceeded { limit } => format!("depth limit of {limit} levels exceeded"),
        };

        DataScopeError::CorruptHierarchy {
            department: root,
            detail,
        }
    }
}

/// Result of a descendant walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descendants {
    departments: BTreeSet<DeptId>,
    corruption: Option<HierarchyCorruption>,
}

impl Descendants {
    /// Returns the department and every reachable descendant.
    #[must_use]
    pub fn departments(&self) -> &BTreeSet<DeptId> {
        &self.departments
    }

    /// Returns the first defect met during the walk, if any.
    #[must_use]
    pub fn corruption(&self) -> Option<HierarchyCorruption> {
        self.corruption
    }

    /// Consumes the walk and returns the collected departments.
    #[must_use]
    pub fn into_departments(self) -> BTreeSet<DeptId> {
        self.departments
    }
}

/// Parent/children adjacency over all departments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentHierarchy {
    parents: HashMap<DeptId, Option<DeptId>>,
    children: HashMap<DeptId, Vec<DeptId>>,
    max_depth: usize,
}

impl DepartmentHierarchy {
    /// Builds the index from a flat department list.
    ///
    /// Duplicate identifiers keep their first occurrence. A `max_depth` of
    /// zero is raised to one.
    #[must_use]
    pub fn build(departments: &[Department], max_depth: usize) -> Self {
        let mut parents = HashMap::with_capacity(departments.len());
        let mut children: HashMap<DeptId, Vec<DeptId>> = HashMap::new();

        for department in departments {
            if parents.contains_key(&department.id()) {
                continue;
            }

            parents.insert(department.id(), department.parent_id());
            if let Some(parent_id) = department.parent_id() {
                children.entry(parent_id).or_default().push(department.id());
            }
        }

        for siblings in children.values_mut() {
            siblings.sort_unstable();
        }

        Self {
            parents,
            children,
            max_depth: max_depth.max(1),
        }
    }

    /// Returns whether the department is part of the index.
    #[must_use]
    pub fn contains(&self, department: DeptId) -> bool {
        self.parents.contains_key(&department)
    }

    /// Returns the number of indexed departments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns whether the index holds no department.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns the direct children of a department.
    #[must_use]
    pub fn children_of(&self, department: DeptId) -> &[DeptId] {
        self.children
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the department and all departments transitively below it.
    ///
    /// Walks breadth-first. A revisited department marks a cycle and is not
    /// expanded again; levels below `max_depth` are not visited and flagged
    /// as [`HierarchyCorruption::DepthExceeded`].
    pub fn descendants(&self, root: DeptId) -> Result<Descendants, DataScopeError> {
        if !self.contains(root) {
            return Err(DataScopeError::DepartmentNotFound(root));
        }

        let mut departments = BTreeSet::from([root]);
        let mut corruption = None;
        let mut frontier = vec![root];
        let mut depth = 0;

        while !frontier.is_empty() {
            if depth >= self.max_depth {
                if frontier
                    .iter()
                    .any(|department| !self.children_of(*department).is_empty())
                {
                    corruption.get_or_insert(HierarchyCorruption::DepthExceeded {
                        limit: self.max_depth,
                    });
                }
                break;
            }

            let mut next = Vec::new();
            for parent in frontier {
                for child in self.children_of(parent) {
                    if departments.insert(*child) {
                        next.push(*child);
                    } else {
                        corruption.get_or_insert(HierarchyCorruption::Cycle { department: *child });
                    }
                }
            }

            frontier = next;
            depth += 1;
        }

        Ok(Descendants {
            departments,
            corruption,
        })
    }

    /// Returns whether moving `department` under `new_parent` would close a cycle.
    ///
    /// Walks upward from `new_parent`. Pre-existing cycles elsewhere in the
    /// tree end the walk instead of looping.
    #[must_use]
    pub fn would_create_cycle(&self, department: DeptId, new_parent: Option<DeptId>) -> bool {
        let mut visited = HashSet::new();
        let mut current = new_parent;

        while let Some(ancestor) = current {
            if ancestor == department {
                return true;
            }
            if !visited.insert(ancestor) {
                return false;
            }
            current = self.parents.get(&ancestor).copied().flatten();
        }

        false
    }
}
