//! Authorization predicates
//!
//! Every protected endpoint is guarded by one [`Policy`]. A request is
//! checked twice: [`Policy::has_permission`] before anything is loaded, and
//! [`Policy::has_object_permission`] once the target row has been fetched.
//! Both are pure; a `false` must stop the handler before any write happens.

use uuid::Uuid;

use crate::role::Role;

/// The authenticated caller as seen by the predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub is_superuser: bool,
}

/// What a request is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// GET, HEAD, OPTIONS
    Read,
    /// POST
    Create,
    /// PUT, PATCH, DELETE
    Modify,
}

impl Action {
    /// Map an HTTP method name onto an action. Unknown methods count as writes.
    pub fn from_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Action::Read,
            "POST" => Action::Create,
            _ => Action::Modify,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Action::Read)
    }
}

/// Access rule attached to an endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Categories: anyone signed in reads, vendors and administrators write.
    VendorOrAdminWrite,
    /// Customer profiles: customers create their own, owners change theirs.
    CustomerOwner,
    /// Vendor profiles and products: vendors create, owners change.
    VendorOwner,
    /// Addresses: customers or vendors write, owners change.
    CustomerOrVendorOwner,
    /// Admin listings: superusers read, nobody writes.
    SuperuserReadOnly,
}

impl Policy {
    /// Check run before the target object is known.
    pub fn has_permission(&self, principal: Option<&Principal>, action: Action) -> bool {
        let Some(principal) = principal else {
            return false;
        };

        match self {
            Policy::SuperuserReadOnly => action.is_safe() && principal.is_superuser,
            _ if action.is_safe() => true,
            Policy::VendorOrAdminWrite => {
                matches!(principal.role, Role::Vendor | Role::Administrator)
            }
            Policy::CustomerOwner => match action {
                Action::Create => principal.role == Role::Customer,
                _ => true,
            },
            Policy::VendorOwner => match action {
                Action::Create => principal.role == Role::Vendor,
                _ => true,
            },
            Policy::CustomerOrVendorOwner => {
                matches!(principal.role, Role::Customer | Role::Vendor)
            }
        }
    }

    /// Check run after the target object (owned by `owner`) has been loaded.
    pub fn has_object_permission(
        &self,
        principal: Option<&Principal>,
        action: Action,
        owner: Option<Uuid>,
    ) -> bool {
        let Some(principal) = principal else {
            return false;
        };

        match self {
            Policy::SuperuserReadOnly => action.is_safe() && principal.is_superuser,
            Policy::VendorOrAdminWrite => self.has_permission(Some(principal), action),
            _ if action.is_safe() => true,
            Policy::CustomerOwner | Policy::VendorOwner | Policy::CustomerOrVendorOwner => {
                owner == Some(principal.user_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNED: [Policy; 3] = [
        Policy::CustomerOwner,
        Policy::VendorOwner,
        Policy::CustomerOrVendorOwner,
    ];

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            is_superuser: false,
        }
    }

    fn superuser() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: Role::Administrator,
            is_superuser: true,
        }
    }

    #[test]
    fn method_mapping() {
        assert_eq!(Action::from_method("GET"), Action::Read);
        assert_eq!(Action::from_method("HEAD"), Action::Read);
        assert_eq!(Action::from_method("OPTIONS"), Action::Read);
        assert_eq!(Action::from_method("POST"), Action::Create);
        assert_eq!(Action::from_method("PUT"), Action::Modify);
        assert_eq!(Action::from_method("PATCH"), Action::Modify);
        assert_eq!(Action::from_method("DELETE"), Action::Modify);
    }

    #[test]
    fn anonymous_callers_are_always_denied() {
        for policy in [
            Policy::VendorOrAdminWrite,
            Policy::CustomerOwner,
            Policy::VendorOwner,
            Policy::CustomerOrVendorOwner,
            Policy::SuperuserReadOnly,
        ] {
            for action in [Action::Read, Action::Create, Action::Modify] {
                assert!(!policy.has_permission(None, action));
                assert!(!policy.has_object_permission(None, action, Some(Uuid::new_v4())));
            }
        }
    }

    #[test]
    fn categories_are_readable_by_everyone_and_writable_by_vendors_and_admins() {
        let policy = Policy::VendorOrAdminWrite;
        let customer = principal(Role::Customer);
        let vendor = principal(Role::Vendor);
        let admin = principal(Role::Administrator);

        assert!(policy.has_permission(Some(&customer), Action::Read));
        assert!(!policy.has_permission(Some(&customer), Action::Create));
        assert!(!policy.has_permission(Some(&customer), Action::Modify));
        assert!(!policy.has_object_permission(Some(&customer), Action::Modify, None));

        for writer in [&vendor, &admin] {
            assert!(policy.has_permission(Some(writer), Action::Create));
            assert!(policy.has_permission(Some(writer), Action::Modify));
            assert!(policy.has_object_permission(Some(writer), Action::Modify, None));
        }
    }

    #[test]
    fn creation_requires_the_matching_role() {
        let customer = principal(Role::Customer);
        let vendor = principal(Role::Vendor);
        let admin = principal(Role::Administrator);

        assert!(Policy::CustomerOwner.has_permission(Some(&customer), Action::Create));
        assert!(!Policy::CustomerOwner.has_permission(Some(&vendor), Action::Create));
        assert!(!Policy::CustomerOwner.has_permission(Some(&admin), Action::Create));

        assert!(Policy::VendorOwner.has_permission(Some(&vendor), Action::Create));
        assert!(!Policy::VendorOwner.has_permission(Some(&customer), Action::Create));
        assert!(!Policy::VendorOwner.has_permission(Some(&admin), Action::Create));

        assert!(Policy::CustomerOrVendorOwner.has_permission(Some(&customer), Action::Create));
        assert!(Policy::CustomerOrVendorOwner.has_permission(Some(&vendor), Action::Create));
        assert!(!Policy::CustomerOrVendorOwner.has_permission(Some(&admin), Action::Modify));
    }

    #[test]
    fn writes_to_owned_objects_require_ownership() {
        let owner = principal(Role::Customer);
        let stranger = principal(Role::Customer);

        for policy in OWNED {
            assert!(policy.has_object_permission(
                Some(&owner),
                Action::Modify,
                Some(owner.user_id)
            ));
            assert!(!policy.has_object_permission(
                Some(&stranger),
                Action::Modify,
                Some(owner.user_id)
            ));
            assert!(!policy.has_object_permission(Some(&owner), Action::Modify, None));
        }
    }

    #[test]
    fn superusers_do_not_bypass_ownership() {
        let owner = principal(Role::Vendor);
        let root = superuser();

        for policy in OWNED {
            assert!(!policy.has_object_permission(
                Some(&root),
                Action::Modify,
                Some(owner.user_id)
            ));
        }
    }

    #[test]
    fn reads_of_owned_objects_only_need_authentication() {
        let owner = principal(Role::Vendor);
        let reader = principal(Role::Customer);

        for policy in OWNED {
            assert!(policy.has_permission(Some(&reader), Action::Read));
            assert!(policy.has_object_permission(
                Some(&reader),
                Action::Read,
                Some(owner.user_id)
            ));
        }
    }

    #[test]
    fn admin_listing_is_read_only_for_superusers() {
        let policy = Policy::SuperuserReadOnly;
        let root = superuser();
        let staff_admin = principal(Role::Administrator);
        let customer = principal(Role::Customer);

        assert!(policy.has_permission(Some(&root), Action::Read));
        assert!(policy.has_object_permission(Some(&root), Action::Read, None));
        assert!(!policy.has_permission(Some(&root), Action::Create));
        assert!(!policy.has_permission(Some(&root), Action::Modify));

        assert!(!policy.has_permission(Some(&staff_admin), Action::Read));
        assert!(!policy.has_permission(Some(&customer), Action::Read));
    }
}
