// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Sheets lead ledger.
//!
//! The spreadsheet is the source of truth for qualified leads. Each row is
//! `[timestamp, source, user id, name, contact, company, answers, checklist
//! yes/no]`, appended with `USER_ENTERED` input. Lookups scan the sheet and
//! take the last row for the user, so a re-qualified lead wins.

use async_trait::async_trait;
use leadbot_core::{Lead, LeadRepository, LeadSource, LeadbotError};
use serde::Deserialize;
use tracing::debug;

const API_BASE_URL: &str = "https://sheets.googleapis.com";

const CHECKLIST_YES: &str = "yes";
const CHECKLIST_NO: &str = "no";

fn repo_err(message: String, source: Option<reqwest::Error>) -> LeadbotError {
    LeadbotError::Repository {
        message,
        source: source.map(|e| Box::new(e) as _),
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

fn row_to_lead(row: &[String]) -> Lead {
    let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
    let source = if cell(1) == LeadSource::Ads.to_string() {
        LeadSource::Ads
    } else {
        LeadSource::Organic
    };
    Lead {
        timestamp: cell(0),
        source,
        user_id: cell(2),
        name: cell(3),
        contact: cell(4),
        company: cell(5),
        answers: cell(6),
        checklist_sent: cell(7) == CHECKLIST_YES,
    }
}

/// Lead repository backed by the Sheets values API.
pub struct SheetsLeadRepository {
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

impl SheetsLeadRepository {
    pub fn new(spreadsheet_id: &str, sheet_name: &str, access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: API_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            sheet_name: sheet_name.to_string(),
            access_token: access_token.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}!A:Z{}",
            self.base_url, self.spreadsheet_id, self.sheet_name, suffix
        )
    }
}

#[async_trait]
impl LeadRepository for SheetsLeadRepository {
    async fn append(&self, lead: &Lead) -> Result<(), LeadbotError> {
        let row = vec![
            lead.timestamp.clone(),
            lead.source.to_string(),
            lead.user_id.clone(),
            lead.name.clone(),
            lead.contact.clone(),
            lead.company.clone(),
            lead.answers.clone(),
            if lead.checklist_sent {
                CHECKLIST_YES.to_string()
            } else {
                CHECKLIST_NO.to_string()
            },
        ];

        let response = self
            .client
            .post(self.values_url(":append?valueInputOption=USER_ENTERED"))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| repo_err(format!("sheet append request failed: {e}"), Some(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(repo_err(
                format!("sheet append returned {status}: {body}"),
                None,
            ));
        }
        debug!(user_id = %lead.user_id, "lead row appended");
        Ok(())
    }

    async fn find_latest_by_user(&self, user_id: &str) -> Result<Option<Lead>, LeadbotError> {
        let response = self
            .client
            .get(self.values_url(""))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| repo_err(format!("sheet read request failed: {e}"), Some(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(repo_err(
                format!("sheet read returned {status}: {body}"),
                None,
            ));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| repo_err(format!("failed to parse sheet values: {e}"), Some(e)))?;

        Ok(range
            .values
            .iter()
            .rev()
            .find(|row| row.get(2).map(String::as_str) == Some(user_id))
            .map(|row| row_to_lead(row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(base_url: &str) -> SheetsLeadRepository {
        SheetsLeadRepository::new("sheet-id", "Leads", "test-token")
            .with_base_url(base_url.to_string())
    }

    fn lead() -> Lead {
        Lead {
            timestamp: "2026-01-02T10:00:00+00:00".into(),
            source: LeadSource::Organic,
            user_id: "42".into(),
            name: "Анна".into(),
            contact: "+79990001122".into(),
            company: "Ромашка".into(),
            answers: String::new(),
            checklist_sent: true,
        }
    }

    #[tokio::test]
    async fn append_posts_full_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/spreadsheets/sheet-id/values/Leads!A:Z:append"))
            .and(query_param("valueInputOption", "USER_ENTERED"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "values": [[
                    "2026-01-02T10:00:00+00:00",
                    "Органика",
                    "42",
                    "Анна",
                    "+79990001122",
                    "Ромашка",
                    "",
                    "yes",
                ]]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        repo(&server.uri()).append(&lead()).await.unwrap();
    }

    #[tokio::test]
    async fn append_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = repo(&server.uri()).append(&lead()).await.unwrap_err();
        assert!(err.to_string().contains("403"), "got: {err}");
    }

    #[tokio::test]
    async fn find_latest_takes_last_matching_row() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-id/values/Leads!A:Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Leads!A1:Z3",
                "values": [
                    ["2026-01-01T09:00:00+00:00", "Органика", "42", "Старое имя", "", "", "", "no"],
                    ["2026-01-01T10:00:00+00:00", "Реклама", "7", "Другой", "", "", "promo", "yes"],
                    ["2026-01-02T10:00:00+00:00", "Органика", "42", "Анна", "+7999", "Ромашка", "", "yes"],
                ]
            })))
            .mount(&server)
            .await;

        let found = repo(&server.uri())
            .find_latest_by_user("42")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Анна");
        assert_eq!(found.source, LeadSource::Organic);
        assert!(found.checklist_sent);

        let other = repo(&server.uri())
            .find_latest_by_user("7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(other.source, LeadSource::Ads);
        assert_eq!(other.answers, "promo");
    }

    #[tokio::test]
    async fn find_latest_handles_empty_sheet_and_short_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "range": "Leads!A1:Z1",
            })))
            .mount(&server)
            .await;
        assert!(repo(&server.uri())
            .find_latest_by_user("42")
            .await
            .unwrap()
            .is_none());

        let server2 = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "values": [["2026-01-01T09:00:00+00:00", "Органика", "42"]]
            })))
            .mount(&server2)
            .await;
        let found = repo(&server2.uri())
            .find_latest_by_user("42")
            .await
            .unwrap()
            .unwrap();
        assert!(found.name.is_empty());
        assert!(!found.checklist_sent);
    }
}
