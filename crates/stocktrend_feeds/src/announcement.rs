//! Company announcement lookup

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::FeedError;

/// Resolves the latest announcement for a company.
///
/// Unknown companies resolve to `Ok(None)`; `Err` means the backend
/// itself failed.
#[async_trait]
pub trait AnnouncementLookup: Send + Sync {
    async fn lookup(&self, company: &str) -> Result<Option<String>, FeedError>;
}

/// Announcements served from a fixed company -> text table
#[derive(Debug, Clone, Default)]
pub struct StaticAnnouncements {
    by_company: HashMap<String, String>,
}

impl StaticAnnouncements {
    pub fn new(by_company: HashMap<String, String>) -> Self {
        Self { by_company }
    }
}

#[async_trait]
impl AnnouncementLookup for StaticAnnouncements {
    async fn lookup(&self, company: &str) -> Result<Option<String>, FeedError> {
        Ok(self.by_company.get(company.trim()).cloned())
    }
}
