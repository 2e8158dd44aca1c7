//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into [`ClinicService`] as an
//! `Arc<CoreConfig>`. Nothing in the engine reads environment variables while handling a
//! request; binaries read the raw values and hand them to the parsing helpers below.
//!
//! [`ClinicService`]: crate::ClinicService

use crate::constants::{DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use crate::{ClinicError, ClinicResult};
use clinic_types::NonEmptyText;

/// Who may approve a patient deactivation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ApproverPolicy {
    /// Any clinical staff member may approve.
    #[default]
    Unchecked,
    /// The approver's role must match one of these (case-insensitive).
    RequireRole(Vec<NonEmptyText>),
}

impl ApproverPolicy {
    /// Returns true if a clinical staff member with `role` may approve.
    pub fn permits(&self, role: &str) -> bool {
        match self {
            ApproverPolicy::Unchecked => true,
            ApproverPolicy::RequireRole(roles) => roles.iter().any(|r| r.eq_ignore_case(role)),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    lookback_days: i64,
    approver_policy: ApproverPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            approver_policy: ApproverPolicy::Unchecked,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidConfig`] if `lookback_days` is not positive or exceeds
    /// [`MAX_LOOKBACK_DAYS`].
    pub fn new(lookback_days: i64, approver_policy: ApproverPolicy) -> ClinicResult<Self> {
        if lookback_days <= 0 {
            return Err(ClinicError::InvalidConfig(format!(
                "lookback window must be at least one day, got {lookback_days}"
            )));
        }
        if lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ClinicError::InvalidConfig(format!(
                "lookback window must be at most {MAX_LOOKBACK_DAYS} days, got {lookback_days}"
            )));
        }

        Ok(Self {
            lookback_days,
            approver_policy,
        })
    }

    pub fn lookback_days(&self) -> i64 {
        self.lookback_days
    }

    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::days(self.lookback_days)
    }

    pub fn approver_policy(&self) -> &ApproverPolicy {
        &self.approver_policy
    }
}

/// Parse the lookback window from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_LOOKBACK_DAYS`].
pub fn lookback_days_from_env_value(value: Option<String>) -> ClinicResult<i64> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_LOOKBACK_DAYS),
        Some(v) => v
            .parse::<i64>()
            .map_err(|e| ClinicError::InvalidConfig(format!("lookback days '{v}': {e}"))),
    }
}

/// Parse the deactivation approver policy from an optional comma-separated role list.
///
/// `None` or a blank value means [`ApproverPolicy::Unchecked`].
pub fn approver_policy_from_env_value(value: Option<String>) -> ClinicResult<ApproverPolicy> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(ApproverPolicy::Unchecked);
    };

    let roles = value
        .split(',')
        .filter(|r| !r.trim().is_empty())
        .map(NonEmptyText::new)
        .collect::<Result<Vec<_>, _>>()?;

    if roles.is_empty() {
        return Err(ClinicError::InvalidConfig(
            "approver role list contains no roles".into(),
        ));
    }

    Ok(ApproverPolicy::RequireRole(roles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_defaults_when_unset_or_blank() {
        assert_eq!(lookback_days_from_env_value(None).unwrap(), 365);
        assert_eq!(lookback_days_from_env_value(Some("  ".into())).unwrap(), 365);
        assert_eq!(lookback_days_from_env_value(Some(" 30 ".into())).unwrap(), 30);
    }

    #[test]
    fn lookback_rejects_garbage_and_non_positive() {
        assert!(matches!(
            lookback_days_from_env_value(Some("a year".into())),
            Err(ClinicError::InvalidConfig(_))
        ));
        assert!(matches!(
            CoreConfig::new(0, ApproverPolicy::Unchecked),
            Err(ClinicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn lookback_rejects_windows_beyond_the_cap() {
        assert!(matches!(
            CoreConfig::new(100_000_000, ApproverPolicy::Unchecked),
            Err(ClinicError::InvalidConfig(_))
        ));
        assert!(matches!(
            CoreConfig::new(MAX_LOOKBACK_DAYS + 1, ApproverPolicy::Unchecked),
            Err(ClinicError::InvalidConfig(_))
        ));

        let cfg = CoreConfig::new(MAX_LOOKBACK_DAYS, ApproverPolicy::Unchecked)
            .expect("cap itself is accepted");
        assert_eq!(cfg.lookback(), chrono::Duration::days(MAX_LOOKBACK_DAYS));
    }

    #[test]
    fn approver_policy_parses_role_list() {
        assert_eq!(
            approver_policy_from_env_value(None).unwrap(),
            ApproverPolicy::Unchecked
        );

        let policy = approver_policy_from_env_value(Some("Doctor, Physician,".into())).unwrap();
        assert!(policy.permits("doctor"));
        assert!(policy.permits("PHYSICIAN"));
        assert!(!policy.permits("Nurse"));
    }

    #[test]
    fn approver_policy_rejects_list_without_roles() {
        assert!(matches!(
            approver_policy_from_env_value(Some(" , ,".into())),
            Err(ClinicError::InvalidConfig(_))
        ));
    }
}
