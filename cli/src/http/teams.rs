//! Team API client

use openapi_client::{Team, User};

use crate::errors::{ClientError, ResultExt};
use crate::http::client::HttpClient;

impl HttpClient {
    /// List teams visible to the token
    pub async fn list_teams(&self) -> Result<Vec<Team>, ClientError> {
        self.get("/teams", &[]).await.context("list teams")
    }

    /// Get a team by numeric id
    pub async fn get_team(&self, id: i64) -> Result<Team, ClientError> {
        self.get(&format!("/teams/{}", id), &[])
            .await
            .context("get team")
    }

    /// Members of a team
    pub async fn team_members(&self, id: i64) -> Result<Vec<User>, ClientError> {
        self.get(&format!("/teams/{}/members", id), &[])
            .await
            .context("get team members")
    }

    /// The team the token belongs to
    pub async fn current_team(&self) -> Result<Team, ClientError> {
        self.get("/teams/current", &[])
            .await
            .context("get current team")
    }

    pub async fn current_team_members(&self) -> Result<Vec<User>, ClientError> {
        self.get("/teams/current/members", &[])
            .await
            .context("get current team members")
    }
}
