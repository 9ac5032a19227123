//! Acting identity supplied by the session provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Organizer name carried by events the platform itself publishes.
///
/// Admin-authored events are stamped with this name instead of the admin's
/// personal name, and the visibility rules key off it.
pub const PLATFORM_ORGANIZER: &str = "Admin";

/// Role of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular user who browses and books events.
    Attendee,
    /// A user who submits events for approval.
    Organizer,
    /// A platform administrator.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attendee" | "user" => Ok(Self::Attendee),
            "organizer" => Ok(Self::Organizer),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!("unknown role: {other}"))),
        }
    }
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier.
    pub id: String,
    /// Display name, used as the organizer name on created events.
    pub name: String,
    /// The user's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// Returns `true` if the actor is a platform administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The organizer name this actor's events are published under.
    #[must_use]
    pub fn organizer_name(&self) -> &str {
        if self.is_admin() {
            PLATFORM_ORGANIZER
        } else {
            &self.name
        }
    }

    /// Returns `true` if the actor may edit or delete an event published
    /// under `organizer`.
    #[must_use]
    pub fn can_manage(&self, organizer: &str) -> bool {
        self.is_admin() || self.name == organizer
    }

    /// Fails with `DomainError::Forbidden` unless the actor is an admin.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` for non-admin actors.
    pub fn require_admin(&self, action: &str) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "{} may not {action}",
                self.name
            )))
        }
    }
}
