//! Role resolution and role-based navigation selection.
//!
//! Every protected view needs the current identity and role; they are
//! resolved once into an [`AuthContext`] and passed down instead of being
//! re-fetched per view.

use tracing::debug;

use crate::backend::{Backend, Session};
use crate::error::{KeyatError, Result};
use crate::models::{Role, UserProfile};

/// One labeled link in a bottom navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// A role's navigation bar: a static list of links, nothing conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavMenu {
    pub role: Role,
    pub links: &'static [NavLink],
}

const CONSUMER_NAV: NavMenu = NavMenu {
    role: Role::Consumer,
    links: &[
        NavLink { label: "Home", href: "/consumer/home" },
        NavLink { label: "Search", href: "/consumer/search" },
        NavLink { label: "Tours", href: "/consumer/tours" },
        NavLink { label: "Services", href: "/consumer/services" },
        NavLink { label: "Profile", href: "/consumer/profile" },
    ],
};

const LANDLORD_NAV: NavMenu = NavMenu {
    role: Role::Landlord,
    links: &[
        NavLink { label: "Dashboard", href: "/landlord/dashboard" },
        NavLink { label: "Properties", href: "/landlord/properties" },
        NavLink { label: "Tours", href: "/landlord/tours" },
        NavLink { label: "Profile", href: "/landlord/profile" },
    ],
};

const AGENT_NAV: NavMenu = NavMenu {
    role: Role::Agent,
    links: &[
        NavLink { label: "Dashboard", href: "/agent/dashboard" },
        NavLink { label: "Listings", href: "/agent/listings" },
        NavLink { label: "Tours", href: "/agent/tours" },
        NavLink { label: "Profile", href: "/agent/profile" },
    ],
};

const SERVICE_PROVIDER_NAV: NavMenu = NavMenu {
    role: Role::ServiceProvider,
    links: &[
        NavLink { label: "Dashboard", href: "/service-provider/dashboard" },
        NavLink { label: "Jobs", href: "/service-provider/jobs" },
        NavLink { label: "Profile", href: "/service-provider/profile" },
    ],
};

const ADMIN_NAV: NavMenu = NavMenu {
    role: Role::Admin,
    links: &[
        NavLink { label: "Dashboard", href: "/admin/dashboard" },
        NavLink { label: "Users", href: "/admin/users" },
        NavLink { label: "Listings", href: "/admin/listings" },
        NavLink { label: "Reports", href: "/admin/reports" },
    ],
};

/// Pure 5-way mapping from role to navigation bar.
pub fn nav_for_role(role: Role) -> &'static NavMenu {
    match role {
        Role::Consumer => &CONSUMER_NAV,
        Role::Landlord => &LANDLORD_NAV,
        Role::Agent => &AGENT_NAV,
        Role::ServiceProvider => &SERVICE_PROVIDER_NAV,
        Role::Admin => &ADMIN_NAV,
    }
}

/// Classify a route path by its prefix. Used only when no session exists,
/// so unauthenticated visitors still see a sensible navigation bar.
pub fn role_from_path(path: &str) -> Role {
    if path.starts_with("/landlord") {
        Role::Landlord
    } else if path.starts_with("/agent") {
        Role::Agent
    } else if path.starts_with("/service-provider") {
        Role::ServiceProvider
    } else if path.starts_with("/admin") {
        Role::Admin
    } else {
        Role::Consumer
    }
}

/// Identity and role for the current request, resolved once.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub session: Option<Session>,
    pub profile: Option<UserProfile>,
    pub role: Role,
}

impl AuthContext {
    /// Resolve the context for a page load.
    ///
    /// With a session: fetch the profile and use its role column, defaulting
    /// to consumer when the column is empty; a missing profile row becomes a
    /// derived placeholder rather than an error. Without a session: infer
    /// the role from the path prefix.
    pub async fn load(backend: &dyn Backend, path: &str) -> Result<Self> {
        match backend.current_session().await? {
            Some(session) => {
                let profile = match backend.fetch_profile(session.user_id).await? {
                    Some(profile) => profile,
                    None => {
                        debug!(user = %session.user_id, "profile row missing, using placeholder");
                        UserProfile::placeholder(session.user_id, &session.email)
                    }
                };
                let role = profile.role.unwrap_or(Role::Consumer);
                Ok(Self {
                    session: Some(session),
                    profile: Some(profile),
                    role,
                })
            }
            None => Ok(Self {
                session: None,
                profile: None,
                role: role_from_path(path),
            }),
        }
    }

    /// The session, or the error a protected page maps to a login redirect.
    pub fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(KeyatError::NotAuthenticated)
    }

    pub fn nav(&self) -> &'static NavMenu {
        nav_for_role(self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(user_id: Uuid) -> Session {
        Session {
            user_id,
            email: "tumelo@example.bw".to_string(),
            access_token: "t".to_string(),
        }
    }

    fn profile(user_id: Uuid, role: Option<Role>) -> UserProfile {
        UserProfile {
            id: user_id,
            first_name: "Tumelo".to_string(),
            last_name: "Kgosi".to_string(),
            email: "tumelo@example.bw".to_string(),
            phone: None,
            role,
            avatar_url: None,
            bio: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn each_role_gets_its_own_nav() {
        let roles = [
            Role::Consumer,
            Role::Landlord,
            Role::Agent,
            Role::ServiceProvider,
            Role::Admin,
        ];
        for role in roles {
            let nav = nav_for_role(role);
            assert_eq!(nav.role, role);
            // Every link stays inside the role's own route prefix, so no
            // menu can leak another role's pages.
            let prefix = match role {
                Role::Consumer => "/consumer",
                Role::Landlord => "/landlord",
                Role::Agent => "/agent",
                Role::ServiceProvider => "/service-provider",
                Role::Admin => "/admin",
            };
            for link in nav.links {
                assert!(link.href.starts_with(prefix), "{} in {:?}", link.href, role);
            }
        }
    }

    #[test]
    fn path_prefix_fallback() {
        assert_eq!(role_from_path("/landlord/dashboard"), Role::Landlord);
        assert_eq!(role_from_path("/agent/tours"), Role::Agent);
        assert_eq!(role_from_path("/service-provider/jobs"), Role::ServiceProvider);
        assert_eq!(role_from_path("/admin/users"), Role::Admin);
        assert_eq!(role_from_path("/consumer/home"), Role::Consumer);
        assert_eq!(role_from_path("/auth/login"), Role::Consumer);
    }

    #[tokio::test]
    async fn session_role_comes_from_profile() {
        let user_id = Uuid::new_v4();
        let backend = MemoryBackend::new()
            .with_session(session(user_id))
            .with_profile(profile(user_id, Some(Role::Landlord)));

        let ctx = AuthContext::load(&backend, "/consumer/home").await.unwrap();
        assert_eq!(ctx.role, Role::Landlord);
        assert_eq!(ctx.nav().role, Role::Landlord);
    }

    #[tokio::test]
    async fn empty_role_column_defaults_to_consumer() {
        let user_id = Uuid::new_v4();
        let backend = MemoryBackend::new()
            .with_session(session(user_id))
            .with_profile(profile(user_id, None));

        let ctx = AuthContext::load(&backend, "/landlord/dashboard").await.unwrap();
        assert_eq!(ctx.role, Role::Consumer);
    }

    #[tokio::test]
    async fn missing_profile_row_becomes_placeholder() {
        let user_id = Uuid::new_v4();
        let backend = MemoryBackend::new().with_session(session(user_id));

        let ctx = AuthContext::load(&backend, "/consumer/home").await.unwrap();
        let profile = ctx.profile.expect("placeholder expected");
        assert_eq!(profile.display_name(), "tumelo");
        assert_eq!(ctx.role, Role::Consumer);
    }

    #[tokio::test]
    async fn no_session_uses_path_prefix() {
        let backend = MemoryBackend::new();
        let ctx = AuthContext::load(&backend, "/agent/dashboard").await.unwrap();
        assert!(ctx.session.is_none());
        assert_eq!(ctx.role, Role::Agent);
        assert!(ctx.require_session().is_err());
    }
}
