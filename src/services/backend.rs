use crate::models::{
    ApiErrorBody, ChangeStatusRequest, CreateMatchingRequest, Matching, MatchingCandidate, Member,
    MemberStatus,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when talking to the admin REST API
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    ApiError {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Message from a structured `{"message": ...}` error body, if the API sent one
    pub fn api_message(&self) -> Option<&str> {
        match self {
            BackendError::ApiError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the admin: the API message or the given fallback
    pub fn user_message(&self, fallback: &str) -> String {
        self.api_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Admin member API client
///
/// Wraps every endpoint under `/admin/members` used by the console:
/// - pending approval listing, detail and status changes
/// - approved female listing and scored candidates
/// - matching creation and listing
pub struct AdminApiClient {
    base_url: String,
    members_path: String,
    client: Client,
}

impl AdminApiClient {
    /// Create a new client for `base_url` (scheme and host) with the given request timeout
    pub fn new(
        base_url: String,
        members_path: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            members_path,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            self.members_path.trim_matches('/'),
            path
        )
    }

    /// List members waiting for approval, optionally filtered by keyword
    pub async fn list_pending_approval(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<Member>, BackendError> {
        self.get_json(&self.pending_approval_url(keyword)).await
    }

    /// Blank keywords produce the unfiltered URL
    fn pending_approval_url(&self, keyword: Option<&str>) -> String {
        match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => format!(
                "{}?keyword={}",
                self.url("/pending-approval"),
                urlencoding::encode(keyword)
            ),
            None => self.url("/pending-approval"),
        }
    }

    /// Fetch one member's full profile
    pub async fn get_member(&self, member_id: i64) -> Result<Member, BackendError> {
        self.get_json(&self.url(&format!("/{}", member_id))).await
    }

    /// Change a member's status
    pub async fn change_status(
        &self,
        member_id: i64,
        status: &MemberStatus,
    ) -> Result<(), BackendError> {
        let url = self.url(&format!("/{}/status", member_id));
        let body = ChangeStatusRequest {
            status: status.as_str().to_string(),
        };

        body.validate()
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;

        tracing::debug!("PATCH {} -> {}", url, body.status);

        let response = self.client.patch(&url).json(&body).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    /// List approved female members that can be matched
    pub async fn list_connecting_females(&self) -> Result<Vec<Member>, BackendError> {
        self.get_json(&self.url("/connecting/females")).await
    }

    /// Scored male candidates for a female member, best score first
    pub async fn list_matching_candidates(
        &self,
        female_member_id: i64,
    ) -> Result<Vec<MatchingCandidate>, BackendError> {
        self.get_json(&self.url(&format!("/{}/matching-candidates", female_member_id)))
            .await
    }

    /// Create a matching of one female and three male members
    pub async fn create_matching(
        &self,
        request: &CreateMatchingRequest,
    ) -> Result<(), BackendError> {
        let url = self.url("/matching");

        tracing::debug!(
            "POST {} female={} males={:?}",
            url,
            request.female_member_id,
            request.male_member_ids
        );

        let response = self.client.post(&url).json(request).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    /// List every created matching
    pub async fn list_matchings(&self) -> Result<Vec<Matching>, BackendError> {
        self.get_json(&self.url("/matchings")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::InvalidResponse(format!("{}: {}", url, e)))
    }

    /// Turn a non-2xx response into [`BackendError::ApiError`], keeping the
    /// body's `message` when it parses.
    async fn ensure_success(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::ApiError {
            status,
            message: parse_error_message(&body),
        })
    }
}

/// Extract `message` from an API error body. Malformed bodies yield `None`.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AdminApiClient {
        AdminApiClient::new(
            base.to_string(),
            "/admin/members".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let api = client("http://backend.test/");
        assert_eq!(
            api.url("/matchings"),
            "http://backend.test/admin/members/matchings"
        );
        assert_eq!(api.url("/7/status"), "http://backend.test/admin/members/7/status");
    }

    #[test]
    fn test_pending_approval_url() {
        let api = client("http://backend.test");
        assert_eq!(
            api.pending_approval_url(None),
            "http://backend.test/admin/members/pending-approval"
        );
        assert_eq!(
            api.pending_approval_url(Some("   ")),
            "http://backend.test/admin/members/pending-approval"
        );
        assert_eq!(
            api.pending_approval_url(Some(" 김 & co ")),
            "http://backend.test/admin/members/pending-approval?keyword=%EA%B9%80%20%26%20co"
        );
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_error_message(r#"{"message":"이미 처리된 요청입니다"}"#),
            Some("이미 처리된 요청입니다".to_string())
        );
        assert_eq!(parse_error_message(r#"{"error":"x"}"#), None);
        assert_eq!(parse_error_message("<html>502</html>"), None);
        assert_eq!(parse_error_message(""), None);
    }

    #[test]
    fn test_user_message_fallback() {
        let err = BackendError::ApiError {
            status: StatusCode::BAD_REQUEST,
            message: None,
        };
        assert_eq!(err.user_message("상태 변경 실패"), "상태 변경 실패");

        let err = BackendError::ApiError {
            status: StatusCode::BAD_REQUEST,
            message: Some("중복된 남성 유저가 선택되었습니다.".to_string()),
        };
        assert_eq!(err.user_message("매칭 생성 실패"), "중복된 남성 유저가 선택되었습니다.");
    }

    #[tokio::test]
    async fn test_keyword_is_trimmed_and_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/admin/members/pending-approval")
            .match_query(mockito::Matcher::UrlEncoded("keyword".into(), "김 하나".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let api = client(&server.url());
        let members = api.list_pending_approval(Some("  김 하나 ")).await.unwrap();

        assert!(members.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pending_list_parses_members() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/admin/members/pending-approval")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Aiko", "status": "PENDING_APPROVAL"}]"#)
            .create_async()
            .await;

        let api = client(&server.url());
        let members = api.list_pending_approval(None).await.unwrap();

        assert_eq!(members.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_keeps_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/admin/members/3/status")
            .match_body(mockito::Matcher::Json(serde_json::json!({"status": "APPROVED"})))
            .with_status(400)
            .with_body(r#"{"message":"승인 대기 상태의 유저만 상태를 변경할 수 있습니다."}"#)
            .create_async()
            .await;

        let api = client(&server.url());
        let err = api
            .change_status(3, &MemberStatus::Approved)
            .await
            .unwrap_err();

        assert_eq!(
            err.api_message(),
            Some("승인 대기 상태의 유저만 상태를 변경할 수 있습니다.")
        );
    }

    #[tokio::test]
    async fn test_blank_status_is_rejected_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/admin/members/3/status")
            .expect(0)
            .create_async()
            .await;

        let api = client(&server.url());
        let err = api
            .change_status(3, &MemberStatus::from(""))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::InvalidRequest(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_list_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/admin/members/matchings")
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create_async()
            .await;

        let api = client(&server.url());
        let err = api.list_matchings().await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
