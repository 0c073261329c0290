use crate::config::SharingConfig;
use crate::error::{AppError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of grantee in the Drive sharing model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    User,
    Group,
    Domain,
    Anyone,
}

impl PermissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionType::User => "user",
            PermissionType::Group => "group",
            PermissionType::Domain => "domain",
            PermissionType::Anyone => "anyone",
        }
    }
}

/// Access level granted by a permission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Writer,
    Commenter,
    Reader,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Writer => "writer",
            Role::Commenter => "commenter",
            Role::Reader => "reader",
        }
    }
}

impl fmt::Display for PermissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(PermissionType::User),
            "group" => Ok(PermissionType::Group),
            "domain" => Ok(PermissionType::Domain),
            "anyone" => Ok(PermissionType::Anyone),
            other => Err(AppError::Data(format!("Unknown permission type: {}", other))),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "owner" => Ok(Role::Owner),
            "writer" => Ok(Role::Writer),
            "commenter" => Ok(Role::Commenter),
            "reader" => Ok(Role::Reader),
            other => Err(AppError::Data(format!("Unknown role: {}", other))),
        }
    }
}

/// A single permission on a spreadsheet.
///
/// `target` is an email address for users and groups, a domain name for
/// domains, and absent for `anyone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub perm_type: PermissionType,
    pub role: Role,
    pub target: Option<String>,
}

/// Who to share a written spreadsheet with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShareRequest {
    pub targets: Vec<String>,
    pub perm_type: Option<PermissionType>,
    pub role: Option<Role>,
    pub message: Option<String>,
    pub notify: Option<bool>,
}

/// A share request with defaults applied, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SharePlan {
    pub grants: Vec<Grant>,
    pub notify: bool,
    pub message: Option<String>,
}

impl ShareRequest {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn perm_type(mut self, perm_type: PermissionType) -> Self {
        self.perm_type = Some(perm_type);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Blank targets don't count.
    pub fn is_empty(&self) -> bool {
        self.targets.iter().all(|t| t.trim().is_empty())
    }

    /// Resolve into one grant per distinct target, in request order.
    pub fn plan(&self, defaults: &SharingConfig) -> SharePlan {
        let perm_type = self.perm_type.unwrap_or(defaults.perm_type);
        let role = self.role.unwrap_or(defaults.role);

        let grants = match perm_type {
            PermissionType::Anyone if !self.is_empty() => vec![Grant {
                perm_type,
                role,
                target: None,
            }],
            PermissionType::Anyone => Vec::new(),
            _ => {
                let mut seen: Vec<&str> = Vec::new();
                self.targets
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .filter(|t| {
                        let fresh = !seen.contains(t);
                        seen.push(*t);
                        fresh
                    })
                    .map(|t| Grant {
                        perm_type,
                        role,
                        target: Some(t.to_string()),
                    })
                    .collect()
            }
        };

        SharePlan {
            grants,
            notify: self.notify.unwrap_or(defaults.notify),
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_applies_defaults() {
        let request = ShareRequest::new(["a@example.com", "b@example.com"]);
        let plan = request.plan(&SharingConfig::default());

        assert_eq!(
            plan.grants,
            vec![
                Grant {
                    perm_type: PermissionType::User,
                    role: Role::Writer,
                    target: Some("a@example.com".to_string()),
                },
                Grant {
                    perm_type: PermissionType::User,
                    role: Role::Writer,
                    target: Some("b@example.com".to_string()),
                },
            ]
        );
        assert!(plan.notify);
        assert_eq!(plan.message, None);
    }

    #[test]
    fn test_plan_explicit_values_win() {
        let request = ShareRequest::new(["team@example.com"])
            .perm_type(PermissionType::Group)
            .role(Role::Reader)
            .message("Weekly numbers")
            .notify(false);
        let plan = request.plan(&SharingConfig::default());

        assert_eq!(plan.grants.len(), 1);
        assert_eq!(plan.grants[0].perm_type, PermissionType::Group);
        assert_eq!(plan.grants[0].role, Role::Reader);
        assert!(!plan.notify);
        assert_eq!(plan.message.as_deref(), Some("Weekly numbers"));
    }

    #[test]
    fn test_plan_skips_blank_and_duplicate_targets() {
        let request = ShareRequest::new(["a@example.com", " ", "a@example.com ", "c@example.com"]);
        let plan = request.plan(&SharingConfig::default());

        let targets: Vec<_> = plan
            .grants
            .iter()
            .map(|g| g.target.as_deref().unwrap())
            .collect();
        assert_eq!(targets, vec!["a@example.com", "c@example.com"]);
    }

    #[test]
    fn test_plan_anyone_collapses_to_single_grant() {
        let request = ShareRequest::new(["x", "y"])
            .perm_type(PermissionType::Anyone)
            .role(Role::Reader);
        let plan = request.plan(&SharingConfig::default());

        assert_eq!(
            plan.grants,
            vec![Grant {
                perm_type: PermissionType::Anyone,
                role: Role::Reader,
                target: None,
            }]
        );
    }

    #[test]
    fn test_empty_request() {
        assert!(ShareRequest::default().is_empty());
        assert!(ShareRequest::new([""]).is_empty());
        let plan = ShareRequest::default()
            .perm_type(PermissionType::Anyone)
            .plan(&SharingConfig::default());
        assert!(plan.grants.is_empty());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("domain".parse::<PermissionType>().unwrap(), PermissionType::Domain);
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        let err = "organizer".parse::<Role>().unwrap_err();
        assert!(matches!(err, AppError::Data(_)), "got {:?}", err);
        let err = "robot".parse::<PermissionType>().unwrap_err();
        assert!(matches!(err, AppError::Data(_)), "got {:?}", err);
        assert_eq!(Role::Commenter.to_string(), "commenter");
    }
}
