//! Permission codes declared by the routes.

pub const DEPT_QUERY: &str = "sys:dept:query";
pub const DEPT_VIEW: &str = "sys:dept:view";
pub const DEPT_ADD: &str = "sys:dept:add";
pub const DEPT_EDIT: &str = "sys:dept:edit";
pub const DEPT_DELETE: &str = "sys:dept:delete";

pub const ROLE_QUERY: &str = "sys:role:query";
pub const ROLE_DETAIL: &str = "sys:role:detail";
pub const ROLE_ADD: &str = "sys:role:add";
pub const ROLE_EDIT: &str = "sys:role:edit";
pub const ROLE_DELETE: &str = "sys:role:delete";
pub const ROLE_PERMISSION_VIEW: &str = "sys:role:perm";
pub const ROLE_PERMISSION_UPDATE: &str = "sys:role:perm:update";
pub const USER_ROLE_UPDATE: &str = "sys:user:role:update";

pub const CONFIG_QUERY: &str = "sys:config:query";
pub const CONFIG_VIEW: &str = "sys:config:view";
pub const CONFIG_ADD: &str = "sys:config:add";
pub const CONFIG_UPDATE: &str = "sys:config:update";
pub const CONFIG_DELETE: &str = "sys:config:delete";
