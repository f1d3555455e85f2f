//! Proxy lifecycle state machine

use std::fmt;

/// Lifecycle states of the offline cache proxy.
///
/// Transitions are driven by the install and activate operations:
/// `Uninstalled -> Installing -> Installed -> Activating -> Active`.
/// A failed install falls back to `Uninstalled`; a failed activation
/// falls back to `Installed`. Only an `Active` proxy intercepts requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No install has succeeded yet
    Uninstalled,
    /// Precaching the resource manifest
    Installing,
    /// Installed and waiting to take over
    Installed,
    /// Evicting stale cache generations
    Activating,
    /// Controlling requests
    Active,
}

impl LifecycleState {
    /// Whether an install may start from this state
    pub fn can_install(&self) -> bool {
        matches!(self, Self::Uninstalled)
    }

    /// Whether an activation may start from this state
    pub fn can_activate(&self) -> bool {
        matches!(self, Self::Installed)
    }

    /// Whether fetch interception is allowed in this state
    pub fn can_intercept(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the proxy is installed but not yet controlling requests
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninstalled => "Uninstalled",
            Self::Installing => "Installing",
            Self::Installed => "Installed",
            Self::Activating => "Activating",
            Self::Active => "Active",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_uninstalled_can_install() {
        assert!(LifecycleState::Uninstalled.can_install());
        assert!(!LifecycleState::Installing.can_install());
        assert!(!LifecycleState::Installed.can_install());
        assert!(!LifecycleState::Activating.can_install());
        assert!(!LifecycleState::Active.can_install());
    }

    #[test]
    fn test_only_installed_can_activate() {
        assert!(LifecycleState::Installed.can_activate());
        assert!(LifecycleState::Installed.is_waiting());
        assert!(!LifecycleState::Uninstalled.can_activate());
        assert!(!LifecycleState::Active.can_activate());
    }

    #[test]
    fn test_only_active_can_intercept() {
        assert!(LifecycleState::Active.can_intercept());
        assert!(!LifecycleState::Uninstalled.can_intercept());
        assert!(!LifecycleState::Installing.can_intercept());
        assert!(!LifecycleState::Installed.can_intercept());
        assert!(!LifecycleState::Activating.can_intercept());
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::Uninstalled.to_string(), "Uninstalled");
        assert_eq!(LifecycleState::Active.to_string(), "Active");
    }
}
