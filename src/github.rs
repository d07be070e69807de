use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::error::{RepopageError, Result};
use crate::source::RepoSource;
use crate::types::Repository;

pub struct GitHub {
    client: Octocrab,
    authenticated: bool,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for RepopageError {
    fn from(err: octocrab::Error) -> Self {
        RepopageError::Network(err.to_string())
    }
}

impl GitHub {
    /// Build a client. Without a token requests are anonymous.
    pub fn new(token: Option<String>, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| RepopageError::Config(format!("invalid api_url '{}': {}", url, e)))?;
        }

        let authenticated = token.is_some();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        let client = builder
            .build()
            .map_err(|e| RepopageError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            authenticated,
        })
    }
}

// GitHub API response types

#[derive(Debug, Deserialize)]
struct GhRepo {
    name: String,
    owner: Option<GhOwner>,
    description: Option<String>,
    language: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    fork: bool,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GhOwner {
    login: String,
}

impl From<GhRepo> for Repository {
    fn from(repo: GhRepo) -> Self {
        Repository {
            owner: repo.owner.map(|o| o.login).unwrap_or_default(),
            name: repo.name,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            language: repo.language,
            url: repo.html_url,
            stars: repo.stargazers_count,
            fork: repo.fork,
            updated_at: repo.updated_at,
        }
    }
}

#[derive(Serialize)]
struct ListParams {
    per_page: u8,
    page: u32,
    sort: &'static str,
}

fn user_repos_route(user: &str) -> String {
    format!("/users/{}/repos", urlencoding::encode(user))
}

#[async_trait]
impl RepoSource for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn fetch_page(&self, user: &str, page: u32, per_page: u8) -> Result<Vec<Repository>> {
        // full_name keeps page boundaries stable while the user scrolls
        let params = ListParams {
            per_page,
            page,
            sort: "full_name",
        };

        let repos: Vec<GhRepo> = self
            .client
            .get(user_repos_route(user), Some(&params))
            .await?;

        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn current_user(&self) -> Result<Option<String>> {
        if !self.authenticated {
            return Ok(None);
        }
        let user = self.client.current().user().await?;
        Ok(Some(user.login))
    }
}
