use async_trait::async_trait;

use crate::error::Result;
use crate::types::Repository;

/// Where pages of repositories come from.
///
/// Pages are 1-based. A successful empty page means there is nothing
/// further to fetch for `user`.
#[async_trait]
pub trait RepoSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn fetch_page(&self, user: &str, page: u32, per_page: u8) -> Result<Vec<Repository>>;

    /// Login of the authenticated user, if the source has credentials.
    async fn current_user(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
