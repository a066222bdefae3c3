//! Hugging Face Hub client
use std::collections::HashSet;

use log::debug;
use reqwest::{
    header::{HeaderMap, AUTHORIZATION, LINK, USER_AGENT},
    StatusCode,
};
use url::Url;
use urlencoding::encode;

use super::{
    repo::{HfMove, HfRepo, HfVisibility},
    HF_LIST_LIMIT, HF_USER_AGENT,
};
use crate::{
    errors::{HubError, HubErrorKind},
    hub::{HubClient, HubFuture, RepoKind, RepositoryDescriptor},
};

/// Marker of the hub refusing a move into an existing repository
const ALREADY_EXISTS: &str = "already exists";

/// Hugging Face Hub client
#[derive(Debug, Clone)]
pub struct HfHubClient {
    /// Access token
    token: String,

    /// Hub endpoint, always ending with `/`
    endpoint: Url,

    /// Reqwest client
    client: reqwest::Client,
}

impl HfHubClient {
    /// Create a new client for the hub at `endpoint`
    pub fn new(token: impl Into<String>, endpoint: Url) -> Self {
        let mut endpoint = endpoint;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        Self {
            token: token.into(),
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint the client talks to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Url of an API path relative to the endpoint
    fn api_url(&self, path: &str) -> Result<Url, HubError> {
        Ok(self.endpoint.join(path)?)
    }

    /// Url of the settings of a repository
    fn settings_url(&self, repo_id: &str, kind: RepoKind) -> Result<Url, HubError> {
        let encoded = repo_id
            .split('/')
            .map(|part| encode(part).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        self.api_url(&format!("api/{}/{}/settings", kind.api_segment(), encoded))
    }
}

/// Url of the next page announced by a `Link` header, relative targets resolved against `current`
fn next_page(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == "rel=\"next\"") {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        current.join(target).ok()
    })
}

/// Whether a failed move means the destination is taken
fn is_conflict(status: StatusCode, text: &str) -> bool {
    status == StatusCode::CONFLICT || text.contains(ALREADY_EXISTS)
}

impl HubClient for HfHubClient {
    fn list_repos(
        &self,
        kind: RepoKind,
        author: &str,
    ) -> HubFuture<'_, Vec<RepositoryDescriptor>> {
        let author = author.to_string();
        Box::pin(async move {
            let mut url = self.api_url(&format!("api/{}", kind.api_segment()))?;
            url.query_pairs_mut()
                .append_pair("author", &author)
                .append_pair("limit", HF_LIST_LIMIT);
            let mut next = Some(url);
            let mut seen = HashSet::new();
            let mut page: usize = 1;
            let mut all_repos = vec![];
            while let Some(url) = next {
                if !seen.insert(url.clone()) {
                    debug!("Pagination of {author} loops back to {url}, stopping");
                    break;
                }
                let response = self
                    .client
                    .get(url.clone())
                    .header(AUTHORIZATION, format!("Bearer {}", self.token))
                    .header(USER_AGENT, HF_USER_AGENT)
                    .send()
                    .await?;
                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await?;
                    return Err(HubError::new(HubErrorKind::ListRepos)
                        .with_text(&format!("author {author}: {status} - {text}")));
                }
                next = next_page(&url, response.headers());
                let text = response.text().await?;
                let repos: Vec<HfRepo> = serde_json::from_str(&text)?;
                debug!(
                    "Requested {} of {author} (page {page}): {}",
                    kind.api_segment(),
                    repos.len()
                );
                all_repos.extend(repos.into_iter().map(|r| r.into_descriptor(kind)));
                page += 1;
            }
            Ok(all_repos)
        })
    }

    fn update_visibility(
        &self,
        repo_id: &str,
        kind: RepoKind,
        private: bool,
    ) -> HubFuture<'_, ()> {
        let repo_id = repo_id.to_string();
        Box::pin(async move {
            let url = self.settings_url(&repo_id, kind)?;
            let response = self
                .client
                .put(url)
                .header(AUTHORIZATION, format!("Bearer {}", self.token))
                .header(USER_AGENT, HF_USER_AGENT)
                .json(&HfVisibility { private })
                .send()
                .await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await?;
                return Err(HubError::new(HubErrorKind::UpdateVisibility)
                    .with_repo(&repo_id)
                    .with_text(&format!("{status} - {text}")));
            }
            Ok(())
        })
    }

    fn move_repo(&self, from_id: &str, to_id: &str, kind: RepoKind) -> HubFuture<'_, ()> {
        let body = HfMove {
            from_repo: from_id.to_string(),
            to_repo: to_id.to_string(),
            kind,
        };
        Box::pin(async move {
            let url = self.api_url("api/repos/move")?;
            let response = self
                .client
                .post(url)
                .header(AUTHORIZATION, format!("Bearer {}", self.token))
                .header(USER_AGENT, HF_USER_AGENT)
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await?;
                let kind = if is_conflict(status, &text) {
                    HubErrorKind::MoveConflict
                } else {
                    HubErrorKind::MoveRepo
                };
                return Err(HubError::new(kind)
                    .with_repo(&body.to_repo)
                    .with_text(&format!("{status} - {text}")));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use reqwest::header::HeaderValue;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> HfHubClient {
        HfHubClient::new("secret", Url::parse(&server.uri()).unwrap())
    }

    #[test]
    fn endpoint_gets_trailing_slash() {
        let client = HfHubClient::new("t", Url::parse("https://hub.example.com/mirror").unwrap());
        assert_eq!(client.endpoint().as_str(), "https://hub.example.com/mirror/");
        assert_eq!(
            client
                .settings_url("my org/data set", RepoKind::Dataset)
                .unwrap()
                .as_str(),
            "https://hub.example.com/mirror/api/datasets/my%20org/data%20set/settings"
        );
    }

    #[test]
    fn next_page_from_link_header() {
        let current = Url::parse("https://huggingface.co/api/models?author=org1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                "<https://huggingface.co/api/models?author=org1&cursor=abc>; rel=\"next\"",
            ),
        );
        assert_eq!(
            next_page(&current, &headers).map(|u| u.to_string()),
            Some("https://huggingface.co/api/models?author=org1&cursor=abc".to_string())
        );
        headers.insert(
            LINK,
            HeaderValue::from_static("<https://huggingface.co/api/models>; rel=\"prev\""),
        );
        assert_eq!(next_page(&current, &headers), None);
        assert_eq!(next_page(&current, &HeaderMap::new()), None);
    }

    #[test]
    fn relative_next_page_is_resolved() {
        let current = Url::parse("https://hub.example.com/mirror/api/models?author=org1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static("</mirror/api/models?author=org1&cursor=abc>; rel=\"next\""),
        );
        assert_eq!(
            next_page(&current, &headers).map(|u| u.to_string()),
            Some("https://hub.example.com/mirror/api/models?author=org1&cursor=abc".to_string())
        );
        headers.insert(
            LINK,
            HeaderValue::from_static("<models?author=org1&cursor=def>; rel=\"next\""),
        );
        assert_eq!(
            next_page(&current, &headers).map(|u| u.to_string()),
            Some("https://hub.example.com/mirror/api/models?author=org1&cursor=def".to_string())
        );
    }

    #[tokio::test]
    async fn list_follows_relative_link_and_stops_on_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param("cursor", "page2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", "</api/models?author=org1&cursor=page2>; rel=\"next\"")
                    .set_body_json(json!([{"id": "org1/b"}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param("limit", "1000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("link", "</api/models?author=org1&cursor=page2>; rel=\"next\"")
                    .set_body_json(json!([{"id": "org1/a"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repos = client_for(&server)
            .list_repos(RepoKind::Model, "org1")
            .await
            .unwrap();

        let ids: Vec<&str> = repos.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["org1/a", "org1/b"]);
    }

    #[tokio::test]
    async fn list_follows_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/datasets"))
            .and(query_param("author", "org1"))
            .and(query_param("cursor", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "org1/c"}])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/datasets"))
            .and(query_param("author", "org1"))
            .and(query_param("limit", "1000"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "link",
                        format!(
                            "<{}/api/datasets?author=org1&cursor=page2>; rel=\"next\"",
                            server.uri()
                        )
                        .as_str(),
                    )
                    .set_body_json(json!([
                        {"id": "org1/a", "private": false},
                        {"id": "org1/b", "private": true}
                    ])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let repos = client_for(&server)
            .list_repos(RepoKind::Dataset, "org1")
            .await
            .unwrap();

        let ids: Vec<&str> = repos.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["org1/a", "org1/b", "org1/c"]);
        assert_eq!(repos[0].private, Some(false));
        assert_eq!(repos[1].private, Some(true));
        assert!(repos.iter().all(|r| r.kind == RepoKind::Dataset));
    }

    #[tokio::test]
    async fn list_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_repos(RepoKind::Model, "org1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), &HubErrorKind::ListRepos);
        assert_eq!(
            err.to_string(),
            "ListRepos: author org1: 401 Unauthorized - Invalid credentials"
        );
    }

    #[tokio::test]
    async fn update_visibility_sends_settings() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/models/org1/foo/settings"))
            .and(body_json(json!({"private": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .update_visibility("org1/foo", RepoKind::Model, true)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_visibility_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update_visibility("org1/foo", RepoKind::Dataset, true)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), &HubErrorKind::UpdateVisibility);
    }

    #[tokio::test]
    async fn move_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/repos/move"))
            .and(body_json(
                json!({"fromRepo": "org1/foo", "toRepo": "org2/foo", "type": "dataset"}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .move_repo("org1/foo", "org2/foo", RepoKind::Dataset)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn move_into_existing_repo_is_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/repos/move"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "Repository org2/foo already exists"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .move_repo("org1/foo", "org2/foo", RepoKind::Model)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn move_other_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/repos/move"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .move_repo("org1/foo", "org2/foo", RepoKind::Model)
            .await
            .unwrap_err();

        assert!(!err.is_conflict());
        assert_eq!(err.kind(), &HubErrorKind::MoveRepo);
    }

    #[test]
    fn conflict_detection() {
        assert!(is_conflict(StatusCode::CONFLICT, ""));
        assert!(is_conflict(StatusCode::BAD_REQUEST, "repo already exists"));
        assert!(!is_conflict(StatusCode::FORBIDDEN, "no access"));
    }
}
