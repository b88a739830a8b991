use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tavle_domain::{Description, IssueRecord, Snapshot};

const REQUEST_TIMEOUT_SECS: u64 = 30;

const SEARCH_FIELDS: &str =
    "summary,issuetype,status,assignee,priority,labels,created,updated,description";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub email: String,
    pub token: String,
    pub jql: String,
    pub max_results: usize,
}

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    email: String,
    token: String,
}

#[derive(Deserialize)]
struct SearchPayload {
    #[serde(default)]
    issues: Vec<IssuePayload>,
    #[serde(default)]
    total: usize,
}

#[derive(Deserialize)]
struct IssuePayload {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Default, Deserialize)]
struct IssueFields {
    summary: Option<String>,
    status: Option<NameLike>,
    issuetype: Option<NameLike>,
    assignee: Option<UserLike>,
    priority: Option<NameLike>,
    #[serde(default)]
    labels: Vec<String>,
    created: Option<String>,
    updated: Option<String>,
    description: Option<Description>,
}

#[derive(Default, Deserialize)]
struct NameLike {
    name: Option<String>,
}

#[derive(Default, Deserialize)]
struct UserLike {
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    email_address: Option<String>,
}

impl JiraClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build tracker HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            token: config.token.clone(),
        })
    }

    /// Run the search query and normalize the result into the snapshot the
    /// board consumes.
    pub async fn fetch_snapshot(&self, jql: &str, max_results: usize) -> Result<Snapshot> {
        let endpoint = format!("{}/rest/api/3/search", self.base_url);
        let response = self
            .http
            .get(endpoint)
            .basic_auth(&self.email, Some(&self.token))
            .query(&[
                ("jql", jql.to_string()),
                ("maxResults", max_results.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ])
            .send()
            .await
            .context("failed to execute tracker search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("tracker search failed: status={} body={}", status, body);
        }

        let payload: SearchPayload = response
            .json()
            .await
            .context("failed to decode tracker search response")?;

        Ok(self.into_snapshot(payload))
    }

    fn into_snapshot(&self, payload: SearchPayload) -> Snapshot {
        Snapshot {
            fetched_at: Some(chrono::Utc::now().to_rfc3339()),
            total: Some(payload.total),
            issues: payload
                .issues
                .into_iter()
                .map(|issue| self.into_record(issue))
                .collect(),
        }
    }

    fn into_record(&self, payload: IssuePayload) -> IssueRecord {
        let fields = payload.fields;
        let url = format!("{}/browse/{}", self.base_url, payload.key);
        IssueRecord {
            key: payload.key,
            summary: fields.summary.unwrap_or_default(),
            status: fields.status.and_then(name_like),
            issue_type: fields.issuetype.and_then(name_like),
            assignee: fields.assignee.and_then(display_name_like),
            priority: fields.priority.and_then(name_like),
            labels: fields.labels,
            created: fields.created,
            updated: fields.updated,
            url: Some(url),
            description: fields.description,
        }
    }
}

fn name_like(value: NameLike) -> Option<String> {
    value.name.filter(|name| !name.trim().is_empty())
}

fn display_name_like(value: UserLike) -> Option<String> {
    value
        .display_name
        .or(value.email_address)
        .filter(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str) -> JiraClient {
        JiraClient::new(&FetchConfig {
            base_url: base_url.to_string(),
            email: "user@example.com".to_string(),
            token: "secret".to_string(),
            jql: "ORDER BY updated DESC".to_string(),
            max_results: 50,
        })
        .unwrap()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = client("https://tracker.example.com/");
        assert_eq!(client.base_url, "https://tracker.example.com");
    }

    #[test]
    fn test_payload_maps_to_issue_record() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "total": 1,
            "issues": [{
                "key": "WEB-22",
                "fields": {
                    "summary": "Fix the footer",
                    "status": {"name": "Done"},
                    "issuetype": {"name": "Task"},
                    "assignee": {"displayName": "Kari Nordmann"},
                    "priority": {"name": "High"},
                    "labels": ["frontend"],
                    "created": "2024-04-01T08:00:00.000+0000",
                    "updated": "2024-04-02T08:00:00.000+0000",
                    "description": {
                        "type": "doc",
                        "content": [
                            {"type": "paragraph", "content": [{"type": "text", "text": "Hi"}]}
                        ]
                    }
                }
            }]
        }))
        .unwrap();

        let snapshot = client("https://tracker.example.com").into_snapshot(payload);
        assert_eq!(snapshot.total, Some(1));
        assert!(snapshot.fetched_at.is_some());

        let record = &snapshot.issues[0];
        assert_eq!(record.key, "WEB-22");
        assert_eq!(record.status.as_deref(), Some("Done"));
        assert_eq!(record.assignee.as_deref(), Some("Kari Nordmann"));
        assert_eq!(
            record.url.as_deref(),
            Some("https://tracker.example.com/browse/WEB-22")
        );
        assert!(record.description.is_some());
    }

    #[test]
    fn test_missing_fields_default_cleanly() {
        let payload: SearchPayload =
            serde_json::from_value(json!({"issues": [{"key": "WEB-9"}]})).unwrap();
        let snapshot = client("https://tracker.example.com").into_snapshot(payload);

        let record = &snapshot.issues[0];
        assert_eq!(record.summary, "");
        assert_eq!(record.status, None);
        assert!(record.labels.is_empty());
    }

    #[test]
    fn test_empty_names_become_none() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "issues": [{
                "key": "WEB-3",
                "fields": {"status": {"name": "  "}, "assignee": {"displayName": ""}}
            }]
        }))
        .unwrap();
        let snapshot = client("https://tracker.example.com").into_snapshot(payload);

        let record = &snapshot.issues[0];
        assert_eq!(record.status, None);
        assert_eq!(record.assignee, None);
    }
}
