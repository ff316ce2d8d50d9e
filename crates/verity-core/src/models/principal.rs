//! The authenticated caller, verified upstream and trusted as-is.

use serde::{Deserialize, Serialize};

use crate::errors::{VerityError, VerityResult};

closed_enum! {
    Role, "role" {
        User => "user",
        FactChecker => "fact_checker",
        Admin => "admin",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::User)
    }

    pub fn fact_checker(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::FactChecker)
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Fact-checkers and admins may adjudicate.
    pub fn require_reviewer(&self) -> VerityResult<()> {
        match self.role {
            Role::FactChecker | Role::Admin => Ok(()),
            Role::User => Err(VerityError::forbidden(format!(
                "{} is not a fact-checker",
                self.user_id
            ))),
        }
    }

    pub fn require_admin(&self) -> VerityResult<()> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(VerityError::forbidden(format!(
                "{} is not an admin",
                self.user_id
            ))),
        }
    }
}
