//! User role model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role tag fixed when the user is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Administrator,
    Vendor,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "ADMINISTRATOR",
            Role::Vendor => "VENDOR",
            Role::Customer => "CUSTOMER",
        }
    }

    /// Roles a visitor may pick for themselves when signing up.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, Role::Vendor | Role::Customer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMINISTRATOR" => Ok(Role::Administrator),
            "VENDOR" => Ok(Role::Vendor),
            "CUSTOMER" => Ok(Role::Customer),
            other => Err(format!("\"{}\" is not a valid choice.", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("VENDOR".parse::<Role>(), Ok(Role::Vendor));
        assert_eq!("CUSTOMER".parse::<Role>(), Ok(Role::Customer));
        assert_eq!("ADMINISTRATOR".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!(
            "vendor".parse::<Role>(),
            Err("\"vendor\" is not a valid choice.".to_string())
        );
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&Role::Customer).unwrap();
        assert_eq!(json, "\"CUSTOMER\"");
        let role: Role = serde_json::from_str("\"ADMINISTRATOR\"").unwrap();
        assert_eq!(role, Role::Administrator);
    }

    #[test]
    fn only_vendor_and_customer_are_self_assignable() {
        assert!(Role::Vendor.is_self_assignable());
        assert!(Role::Customer.is_self_assignable());
        assert!(!Role::Administrator.is_self_assignable());
    }
}
