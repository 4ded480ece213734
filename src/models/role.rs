use serde::{Deserialize, Serialize};

/// Authorization label controlling which view variant and actions a signed-in
/// user gets. The set is closed; unrecognized stored values resolve to the
/// least-privileged default instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    StoreManager,
    StoreEmployee,
}

/// Actions a view variant is allowed to render and a mutation route is
/// allowed to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Role {
    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "store_manager" => Role::StoreManager,
            "store_employee" => Role::StoreEmployee,
            _ => Role::StoreEmployee,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::StoreManager => "store_manager",
            Role::StoreEmployee => "store_employee",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::StoreManager => "Store Manager",
            Role::StoreEmployee => "Store Employee",
        }
    }

    /// The capability set per role. Delete is the one destructive action and
    /// stays reserved to admins; managers otherwise have create/edit parity,
    /// employees are read-only.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Role::Admin => Capabilities {
                can_create: true,
                can_edit: true,
                can_delete: true,
            },
            Role::StoreManager => Capabilities {
                can_create: true,
                can_edit: true,
                can_delete: false,
            },
            Role::StoreEmployee => Capabilities {
                can_create: false,
                can_edit: false,
                can_delete: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_values_fall_back_to_least_privilege() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("store_manager"), Role::StoreManager);
        assert_eq!(Role::parse("superuser"), Role::StoreEmployee);
        assert_eq!(Role::parse(""), Role::StoreEmployee);
    }

    #[test]
    fn employees_get_no_mutation_capabilities() {
        let caps = Role::StoreEmployee.capabilities();
        assert!(!caps.can_create && !caps.can_edit && !caps.can_delete);
    }

    #[test]
    fn delete_is_admin_only() {
        assert!(Role::Admin.capabilities().can_delete);
        assert!(!Role::StoreManager.capabilities().can_delete);
        assert!(Role::StoreManager.capabilities().can_edit);
    }
}
