//! Presentation forwarding
//!
//! A container can delegate some presentation questions (status bar
//! visibility and style, home indicator auto-hiding, edges that defer system
//! gestures) to the child it currently displays. Whenever the child changes,
//! the host is asked to re-evaluate each delegated subsystem.

use serde::{Deserialize, Serialize};

/// A presentation question a container may delegate to its child
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationQuery {
    StatusBarHidden,
    StatusBarStyle,
    HomeIndicatorAutoHidden,
    ScreenEdgesDeferringSystemGestures,
}

/// A request to re-evaluate one presentation subsystem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationUpdate {
    /// Covers both status bar visibility and style
    StatusBarAppearance { animated: bool },
    HomeIndicatorAutoHidden { animated: bool },
    ScreenEdgesDeferringSystemGestures { animated: bool },
}

/// Which presentation questions are delegated to the current child
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardingFlags {
    pub status_bar_hidden: bool,
    pub status_bar_style: bool,
    pub home_indicator_auto_hidden: bool,
    pub screen_edges_deferring_system_gestures: bool,
}

impl ForwardingFlags {
    /// Forward everything to the child
    pub fn all() -> Self {
        Self {
            status_bar_hidden: true,
            status_bar_style: true,
            home_indicator_auto_hidden: true,
            screen_edges_deferring_system_gestures: true,
        }
    }

    pub fn forwards(&self, query: PresentationQuery) -> bool {
        match query {
            PresentationQuery::StatusBarHidden => self.status_bar_hidden,
            PresentationQuery::StatusBarStyle => self.status_bar_style,
            PresentationQuery::HomeIndicatorAutoHidden => self.home_indicator_auto_hidden,
            PresentationQuery::ScreenEdgesDeferringSystemGestures => {
                self.screen_edges_deferring_system_gestures
            }
        }
    }

    /// Subsystems to re-evaluate after the child changed
    pub fn updates(&self, animated: bool) -> Vec<PresentationUpdate> {
        let mut updates = Vec::new();
        if self.status_bar_hidden || self.status_bar_style {
            updates.push(PresentationUpdate::StatusBarAppearance { animated });
        }
        if self.home_indicator_auto_hidden {
            updates.push(PresentationUpdate::HomeIndicatorAutoHidden { animated });
        }
        if self.screen_edges_deferring_system_gestures {
            updates.push(PresentationUpdate::ScreenEdgesDeferringSystemGestures { animated });
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_forwarding_no_updates() {
        assert!(ForwardingFlags::default().updates(true).is_empty());
    }

    #[test]
    fn test_status_bar_flags_share_one_update() {
        let flags = ForwardingFlags {
            status_bar_hidden: true,
            status_bar_style: true,
            ..Default::default()
        };
        assert_eq!(
            flags.updates(false),
            vec![PresentationUpdate::StatusBarAppearance { animated: false }]
        );
        assert!(flags.forwards(PresentationQuery::StatusBarStyle));
        assert!(!flags.forwards(PresentationQuery::HomeIndicatorAutoHidden));
    }

    #[test]
    fn test_all_updates() {
        assert_eq!(
            ForwardingFlags::all().updates(true),
            vec![
                PresentationUpdate::StatusBarAppearance { animated: true },
                PresentationUpdate::HomeIndicatorAutoHidden { animated: true },
                PresentationUpdate::ScreenEdgesDeferringSystemGestures { animated: true },
            ]
        );
    }
}
