//! PostgREST access to the `users` table.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::de::IgnoredAny;

use super::{SupabaseClient, ensure_success, parse_json, read_body};
use crate::backend::ProfileStore;
use crate::error::BackendError;
use crate::model::{Profile, ProfileUpdate};

/// Asks PostgREST for exactly one object; zero or many rows answer 406.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

fn table_url(base: &str, table: &str) -> String {
    format!("{base}/rest/v1/{table}")
}

fn id_filter(user_id: &str) -> String {
    format!("eq.{user_id}")
}

fn parse_fetch_response(status: StatusCode, body: &str, user_id: &str) -> Result<Profile, BackendError> {
    if status == StatusCode::NOT_ACCEPTABLE {
        return Err(BackendError::NotFound(user_id.to_owned()));
    }
    ensure_success(status, body)?;
    parse_json(body)
}

/// A PATCH that matched no row still answers 2xx, with an empty
/// representation. Missing rows and rows hidden by row-level security look
/// the same here.
fn parse_update_response(status: StatusCode, body: &str, user_id: &str) -> Result<(), BackendError> {
    ensure_success(status, body)?;
    let rows: Vec<IgnoredAny> = parse_json(body)?;
    if rows.is_empty() {
        return Err(BackendError::NotFound(user_id.to_owned()));
    }
    Ok(())
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl ProfileStore for SupabaseClient {
    async fn fetch_profile(&self, user_id: &str) -> Result<Profile, BackendError> {
        let url = table_url(&self.config.url, &self.config.users_table);
        let resp = self
            .with_api_key(self.http.get(url))
            .bearer_auth(self.bearer())
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&[("id", id_filter(user_id).as_str()), ("select", "*")])
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let (status, body) = read_body(resp).await?;
        parse_fetch_response(status, &body, user_id)
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), BackendError> {
        let url = table_url(&self.config.url, &self.config.users_table);
        let resp = self
            .with_api_key(self.http.patch(url))
            .bearer_auth(self.bearer())
            .header("Prefer", "return=representation")
            .query(&[("id", id_filter(user_id))])
            .json(update)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let (status, body) = read_body(resp).await?;
        parse_update_response(status, &body, user_id)
    }
}
