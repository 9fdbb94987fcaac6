pub mod components;
pub mod layouts;
pub mod pages;

use crate::config::SiteInfo;

// Re-exports for convenience
pub use layouts::desktop::desktop_layout;

/// Per-request data every page shares.
pub struct PageCtx<'a> {
    pub site: &'a SiteInfo,
    /// Set when a signed-in admin is viewing the page.
    pub admin_email: Option<&'a str>,
}

impl<'a> PageCtx<'a> {
    pub fn public(site: &'a SiteInfo) -> Self {
        Self {
            site,
            admin_email: None,
        }
    }

    pub fn admin(site: &'a SiteInfo, email: &'a str) -> Self {
        Self {
            site,
            admin_email: Some(email),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin_email.is_some()
    }
}
