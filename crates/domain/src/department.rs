use vireo_core::{AppError, AppResult, DeptId, NonEmptyString};

/// Lifecycle status of a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartmentStatus {
    /// Department is active.
    Enabled,
    /// Department is hidden from selection lists.
    Disabled,
}

impl DepartmentStatus {
    /// Returns the stable storage value.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    /// Parses a storage value.
    pub fn from_code(code: i32) -> AppResult<Self> {
        match code {
            1 => Ok(Self::Enabled),
            0 => Ok(Self::Disabled),
            _ => Err(AppError::Validation(format!(
                "unknown department status '{code}'"
            ))),
        }
    }
}

/// Organisational unit that owns users and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    id: DeptId,
    parent_id: Option<DeptId>,
    name: NonEmptyString,
    code: String,
    status: DepartmentStatus,
    sort: i32,
}

impl Department {
    /// Creates a department with a validated name.
    ///
    /// The parent link is not validated here: rows read back from storage may
    /// be malformed and the hierarchy index has to cope with them.
    pub fn new(
        id: DeptId,
        parent_id: Option<DeptId>,
        name: impl Into<String>,
        code: impl Into<String>,
        status: DepartmentStatus,
        sort: i32,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            parent_id,
            name: NonEmptyString::new(name)?,
            code: code.into(),
            status,
            sort,
        })
    }

    /// Returns the department identifier.
    #[must_use]
    pub fn id(&self) -> DeptId {
        self.id
    }

    /// Returns the parent department, `None` for a root department.
    #[must_use]
    pub fn parent_id(&self) -> Option<DeptId> {
        self.parent_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the department code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> DepartmentStatus {
        self.status
    }

    /// Returns the sort order within siblings.
    #[must_use]
    pub fn sort(&self) -> i32 {
        self.sort
    }
}
