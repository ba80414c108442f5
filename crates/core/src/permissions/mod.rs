//! Permission system for webinar operations

use uuid::Uuid;

use crate::models::{UserRole, Webinar};

/// Actions that can be performed on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebinarAction {
    // Webinar lifecycle
    CreateWebinar,
    EditWebinar,
    DeleteWebinar,

    // Script editing (messages, CTA buttons, timers)
    EditScript,

    // Integrations
    ManageWebhooks,

    // Viewing
    WatchWebinar,
    ViewAnalytics,

    // Platform administration
    ManageUsers,
}

/// Permission matrix for platform roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: UserRole, action: WebinarAction) -> bool {
        match action {
            // Anyone can watch
            WebinarAction::WatchWebinar => true,

            // Producers and admins author content
            WebinarAction::CreateWebinar
            | WebinarAction::EditWebinar
            | WebinarAction::DeleteWebinar
            | WebinarAction::EditScript
            | WebinarAction::ManageWebhooks
            | WebinarAction::ViewAnalytics => role >= UserRole::Producer,

            // Admin only
            WebinarAction::ManageUsers => role == UserRole::Admin,
        }
    }

    /// Ownership check: producers manage only their own webinars,
    /// admins manage everything.
    pub fn can_manage_webinar(role: UserRole, user_id: Uuid, webinar: &Webinar) -> bool {
        match role {
            UserRole::Admin => true,
            UserRole::Producer => webinar.owner_id == user_id,
            UserRole::Viewer => false,
        }
    }
}
