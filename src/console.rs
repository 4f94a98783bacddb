//! Console operations.
//!
//! Each operation drives one session's [`ConsoleState`] through its
//! transitions and performs the backend calls in between. The session lock is
//! never held across a backend call; list results are applied through load
//! tickets so a slow response cannot overwrite a newer one.

use crate::core::{ConsoleState, LoadKind, Notice, Tab, Ticket, WorkflowError};
use crate::models::MemberStatus;
use crate::services::{AdminApiClient, BackendError, SessionHandle};
use std::sync::Arc;
use validator::Validate;

const MSG_APPROVAL_LOAD_FAILED: &str = "승인 대기 유저 목록을 불러오는데 실패했습니다.";
const MSG_DETAIL_LOAD_FAILED: &str = "유저 상세 정보를 불러오는데 실패했습니다.";
const MSG_STATUS_CHANGED: &str = "상태가 변경되었습니다.";
const MSG_STATUS_API_FALLBACK: &str = "상태 변경 실패";
const MSG_STATUS_FAILED: &str = "상태 변경에 실패했습니다.";
const MSG_FEMALES_LOAD_FAILED: &str = "승인완료 여성 유저 목록을 불러오는데 실패했습니다.";
const MSG_CANDIDATES_LOAD_FAILED: &str = "매칭 후보를 불러오는데 실패했습니다.";
const MSG_MATCHING_CREATED: &str = "매칭이 성공적으로 생성되었습니다. (승인완료 → 연결중)";
const MSG_MATCHING_API_FALLBACK: &str = "매칭 생성 실패";
const MSG_MATCHING_FAILED: &str = "매칭 생성에 실패했습니다.";
const MSG_MATCHINGS_LOAD_FAILED: &str = "매칭 목록을 불러오는데 실패했습니다.";

/// Message for a failed mutation: the API's own message when it sent one,
/// `api_fallback` for other HTTP errors and `generic` for transport failures.
fn failure_message(err: &BackendError, api_fallback: &str, generic: &str) -> String {
    match err {
        BackendError::ApiError { .. } => err.user_message(api_fallback),
        _ => generic.to_string(),
    }
}

/// Business-rule rejections are shown to the admin but not logged as errors
fn reject(state: &mut ConsoleState, err: WorkflowError) {
    tracing::info!("Rejected console action: {}", err);
    state.notify(Notice::error(err.to_string()));
}

/// Console controller shared by all sessions
#[derive(Clone)]
pub struct AdminConsole {
    api: Arc<AdminApiClient>,
}

impl AdminConsole {
    pub fn new(api: Arc<AdminApiClient>) -> Self {
        Self { api }
    }

    /// Activate a tab and load its list
    pub async fn switch_tab(&self, session: &SessionHandle, tab: Tab) {
        let (ticket, keyword) = {
            let mut state = session.lock().await;
            let ticket = state.switch_tab(tab);
            (ticket, state.search_keyword().map(str::to_owned))
        };

        tracing::debug!("Switched to tab {}", tab.as_str());

        match tab {
            Tab::Approval => self.fetch_approval(session, ticket, keyword).await,
            Tab::Matching => self.fetch_females(session, ticket).await,
            Tab::MatchingList => self.fetch_matchings(session, ticket).await,
        }
    }

    // ==================== approval ====================

    /// Reload the pending approval list with the session's keyword
    pub async fn load_approval_members(&self, session: &SessionHandle) {
        let (ticket, keyword) = {
            let mut state = session.lock().await;
            let ticket = state.begin_load(LoadKind::Approval);
            (ticket, state.search_keyword().map(str::to_owned))
        };
        self.fetch_approval(session, ticket, keyword).await;
    }

    /// Store a new search keyword and reload
    pub async fn search_approval_members(&self, session: &SessionHandle, keyword: &str) {
        session.lock().await.set_keyword(keyword);
        self.load_approval_members(session).await;
    }

    async fn fetch_approval(&self, session: &SessionHandle, ticket: Ticket, keyword: Option<String>) {
        let result = self.api.list_pending_approval(keyword.as_deref()).await;

        let mut state = session.lock().await;
        match result {
            Ok(members) => {
                let count = members.len();
                if state.approval_loaded(ticket, members) {
                    tracing::debug!("Loaded {} pending members (keyword: {:?})", count, keyword);
                }
            }
            Err(e) => {
                if state.load_failed(ticket) {
                    tracing::error!("Failed to load pending approval members: {}", e);
                    state.notify(Notice::error(MSG_APPROVAL_LOAD_FAILED));
                }
            }
        }
    }

    /// Fetch a member and open the detail modal. Nothing opens on failure.
    pub async fn open_member_detail(&self, session: &SessionHandle, member_id: i64) {
        let result = self.api.get_member(member_id).await;

        let mut state = session.lock().await;
        match result {
            Ok(member) => state.open_detail(member),
            Err(e) => {
                tracing::error!("Failed to load member {}: {}", member_id, e);
                state.notify(Notice::error(MSG_DETAIL_LOAD_FAILED));
            }
        }
    }

    pub async fn close_member_detail(&self, session: &SessionHandle) {
        session.lock().await.close_detail();
    }

    pub async fn open_status_modal(
        &self,
        session: &SessionHandle,
        member_id: i64,
        name: &str,
        current_status: MemberStatus,
    ) {
        session
            .lock()
            .await
            .open_status_modal(member_id, name, current_status);
    }

    pub async fn cancel_status_modal(&self, session: &SessionHandle) {
        session.lock().await.cancel_status_modal();
    }

    /// Submit the status picked in the modal.
    ///
    /// The target is cleared only after the backend accepted the change; the
    /// approval list is reloaded whichever tab is active.
    pub async fn confirm_status_change(&self, session: &SessionHandle, choice: Option<&str>) {
        let change = session.lock().await.status_change(choice);
        let (member_id, status) = match change {
            Ok(Some(change)) => change,
            Ok(None) => return,
            Err(e) => {
                reject(&mut *session.lock().await, e);
                return;
            }
        };

        match self.api.change_status(member_id, &status).await {
            Ok(()) => {
                tracing::info!("Changed status of member {} to {}", member_id, status);
                {
                    let mut state = session.lock().await;
                    state.status_changed(member_id, status);
                    state.notify(Notice::success(MSG_STATUS_CHANGED));
                }
                self.load_approval_members(session).await;
            }
            Err(e) => {
                tracing::error!("Failed to change status of member {}: {}", member_id, e);
                let message = failure_message(&e, MSG_STATUS_API_FALLBACK, MSG_STATUS_FAILED);
                session.lock().await.notify(Notice::error(message));
            }
        }
    }

    // ==================== matching ====================

    pub async fn load_connecting_female_members(&self, session: &SessionHandle) {
        let ticket = session.lock().await.begin_load(LoadKind::Females);
        self.fetch_females(session, ticket).await;
    }

    async fn fetch_females(&self, session: &SessionHandle, ticket: Ticket) {
        let result = self.api.list_connecting_females().await;

        let mut state = session.lock().await;
        match result {
            Ok(members) => {
                let count = members.len();
                if state.females_loaded(ticket, members) {
                    tracing::debug!("Loaded {} approved female members", count);
                }
            }
            Err(e) => {
                if state.load_failed(ticket) {
                    tracing::error!("Failed to load approved female members: {}", e);
                    state.notify(Notice::error(MSG_FEMALES_LOAD_FAILED));
                }
            }
        }
    }

    /// Fetch candidates for a female member and move to candidate selection.
    ///
    /// An empty candidate list keeps the female list on screen.
    pub async fn select_female_member(&self, session: &SessionHandle, female_id: i64, name: &str) {
        let ticket = session.lock().await.begin_female_selection(female_id, name);

        tracing::debug!("Loading matching candidates for female member {}", female_id);
        let result = self.api.list_matching_candidates(female_id).await;

        let mut state = session.lock().await;
        match result {
            Ok(candidates) => {
                let count = candidates.len();
                match state.candidates_loaded(ticket, candidates) {
                    Ok(true) => tracing::debug!(
                        "Showing {} candidates for female member {}",
                        count,
                        female_id
                    ),
                    Ok(false) => {}
                    Err(e) => reject(&mut state, e),
                }
            }
            Err(e) => {
                if state.load_failed(ticket) {
                    tracing::error!("Failed to load candidates for female member {}: {}", female_id, e);
                    state.notify(Notice::error(MSG_CANDIDATES_LOAD_FAILED));
                }
            }
        }
    }

    pub async fn toggle_male_selection(&self, session: &SessionHandle, member_id: i64, checked: bool) {
        let mut state = session.lock().await;
        if let Err(e) = state.toggle_male(member_id, checked) {
            reject(&mut state, e);
        }
    }

    pub async fn select_all_males(&self, session: &SessionHandle, checked: bool) {
        let mut state = session.lock().await;
        if let Err(e) = state.select_all_males(checked) {
            reject(&mut state, e);
        }
    }

    pub async fn open_matching_confirm_modal(&self, session: &SessionHandle) {
        let mut state = session.lock().await;
        if let Err(e) = state.open_matching_confirm() {
            reject(&mut state, e);
        }
    }

    pub async fn cancel_matching_confirm(&self, session: &SessionHandle) {
        session.lock().await.cancel_matching_confirm();
    }

    /// Submit the matching. On success the selection is reset and the
    /// female list reloaded, so the now-connecting female drops out of it.
    pub async fn create_matching(&self, session: &SessionHandle) {
        let request = {
            let mut state = session.lock().await;
            match state.matching_request() {
                Ok(request) => request,
                Err(e) => {
                    reject(&mut state, e);
                    return;
                }
            }
        };

        if let Err(errors) = request.validate() {
            tracing::warn!("Refusing invalid matching request: {}", errors);
            session
                .lock()
                .await
                .notify(Notice::error(WorkflowError::IncompleteSelection.to_string()));
            return;
        }

        match self.api.create_matching(&request).await {
            Ok(()) => {
                tracing::info!(
                    "Created matching: female={} males={:?}",
                    request.female_member_id,
                    request.male_member_ids
                );
                {
                    let mut state = session.lock().await;
                    state.matching_created();
                    state.notify(Notice::success(MSG_MATCHING_CREATED));
                }
                self.load_connecting_female_members(session).await;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to create matching for female {}: {}",
                    request.female_member_id,
                    e
                );
                let message = failure_message(&e, MSG_MATCHING_API_FALLBACK, MSG_MATCHING_FAILED);
                session.lock().await.notify(Notice::error(message));
            }
        }
    }

    pub async fn show_female_list(&self, session: &SessionHandle) {
        session.lock().await.show_female_list();
    }

    // ==================== matching list ====================

    pub async fn load_matching_list(&self, session: &SessionHandle) {
        let ticket = session.lock().await.begin_load(LoadKind::Matchings);
        self.fetch_matchings(session, ticket).await;
    }

    async fn fetch_matchings(&self, session: &SessionHandle, ticket: Ticket) {
        let result = self.api.list_matchings().await;

        let mut state = session.lock().await;
        match result {
            Ok(matchings) => {
                let count = matchings.len();
                if state.matchings_loaded(ticket, matchings) {
                    tracing::debug!("Loaded {} matchings", count);
                }
            }
            Err(e) => {
                if state.load_failed(ticket) {
                    tracing::error!("Failed to load matchings: {}", e);
                    state.notify(Notice::error(MSG_MATCHINGS_LOAD_FAILED));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_failure_message_prefers_api_message() {
        let api = BackendError::ApiError {
            status: StatusCode::BAD_REQUEST,
            message: Some("이미 처리된 요청입니다".to_string()),
        };
        assert_eq!(
            failure_message(&api, MSG_STATUS_API_FALLBACK, MSG_STATUS_FAILED),
            "이미 처리된 요청입니다"
        );

        let bare = BackendError::ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(
            failure_message(&bare, MSG_STATUS_API_FALLBACK, MSG_STATUS_FAILED),
            MSG_STATUS_API_FALLBACK
        );

        let invalid = BackendError::InvalidResponse("bad".to_string());
        assert_eq!(
            failure_message(&invalid, MSG_MATCHING_API_FALLBACK, MSG_MATCHING_FAILED),
            MSG_MATCHING_FAILED
        );
    }
}
