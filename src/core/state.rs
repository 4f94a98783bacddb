use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::selection::MaleSelection;
use crate::models::{CreateMatchingRequest, Matching, MatchingCandidate, Member, MemberStatus};

/// Business-rule violations detected before (or instead of) a backend call.
///
/// The display text is shown to the admin as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("남성 유저는 최대 3명까지만 선택할 수 있습니다.")]
    SelectionFull,

    #[error("남성 유저 3명을 선택해주세요.")]
    IncompleteSelection,

    #[error("현재 조건에 맞는 남성 유저가 없습니다.")]
    NoCandidates,

    #[error("매칭 후보 목록에 없는 유저입니다. (memberId: {0})")]
    UnknownCandidate(i64),

    #[error("여성 유저를 먼저 선택해주세요.")]
    NoFemaleSelected,

    #[error("매칭 확인 중에는 선택을 변경할 수 없습니다.")]
    SelectionLocked,

    #[error("선택할 수 없는 상태입니다: {0}")]
    StatusNotAllowed(String),
}

/// Console tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Approval,
    Matching,
    MatchingList,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Approval, Tab::Matching, Tab::MatchingList];

    /// Parse a tab id. Unknown ids fall back to the approval tab.
    pub fn parse(raw: &str) -> Tab {
        match raw {
            "matching" => Tab::Matching,
            "matching-list" => Tab::MatchingList,
            _ => Tab::Approval,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Approval => "approval",
            Tab::Matching => "matching",
            Tab::MatchingList => "matching-list",
        }
    }

    /// The list this tab loads when it becomes active
    pub fn load_kind(&self) -> LoadKind {
        match self {
            Tab::Approval => LoadKind::Approval,
            Tab::Matching => LoadKind::Females,
            Tab::MatchingList => LoadKind::Matchings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One-shot notification shown on the next render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Kinds of list loads that may be in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadKind {
    Approval,
    Females,
    Candidates,
    Matchings,
}

/// Identifies one issued load. Only the latest ticket of a kind is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub kind: LoadKind,
    pub seq: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LoadTickets {
    last_issued: u64,
    approval: Option<u64>,
    females: Option<u64>,
    candidates: Option<u64>,
    matchings: Option<u64>,
}

impl LoadTickets {
    fn slot_mut(&mut self, kind: LoadKind) -> &mut Option<u64> {
        match kind {
            LoadKind::Approval => &mut self.approval,
            LoadKind::Females => &mut self.females,
            LoadKind::Candidates => &mut self.candidates,
            LoadKind::Matchings => &mut self.matchings,
        }
    }

    fn slot(&self, kind: LoadKind) -> Option<u64> {
        match kind {
            LoadKind::Approval => self.approval,
            LoadKind::Females => self.females,
            LoadKind::Candidates => self.candidates,
            LoadKind::Matchings => self.matchings,
        }
    }

    fn issue(&mut self, kind: LoadKind) -> Ticket {
        self.last_issued += 1;
        let seq = self.last_issued;
        *self.slot_mut(kind) = Some(seq);
        Ticket { kind, seq }
    }

    /// Consume a ticket. Returns false when it was superseded or cancelled.
    fn settle(&mut self, ticket: Ticket) -> bool {
        let slot = self.slot_mut(ticket.kind);
        if *slot == Some(ticket.seq) {
            *slot = None;
            true
        } else {
            false
        }
    }

    fn cancel(&mut self, kind: LoadKind) {
        *self.slot_mut(kind) = None;
    }
}

/// Approval tab data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalView {
    pub keyword: String,
    pub members: Vec<Member>,
}

/// Member targeted by the status modal, with the statuses it may move to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTarget {
    pub member_id: i64,
    pub name: String,
    pub current_status: MemberStatus,
    pub options: Vec<MemberStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchingStage {
    #[default]
    FemaleList,
    CandidateSelection,
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFemale {
    pub id: i64,
    pub name: String,
}

/// Matching tab data and the candidate selection in progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingView {
    pub stage: MatchingStage,
    pub females: Vec<Member>,
    pub selected_female: Option<SelectedFemale>,
    /// Female whose candidates are being fetched
    pub pending_female: Option<SelectedFemale>,
    pub candidates: Vec<MatchingCandidate>,
    pub selection: MaleSelection,
}

/// View state of one admin session.
///
/// All transitions are plain methods without I/O. Operations that need the
/// backend are split in two: a `begin_*` step that issues a [`Ticket`] and a
/// `*_loaded` step that applies the response only if its ticket is still the
/// latest one of its kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleState {
    pub active_tab: Tab,
    pub approval: ApprovalView,
    pub detail: Option<Member>,
    pub status_modal: Option<StatusTarget>,
    pub matching: MatchingView,
    pub matchings: Vec<Matching>,
    pub notice: Option<Notice>,
    tickets: LoadTickets,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a tab and issue the load for its list
    pub fn switch_tab(&mut self, tab: Tab) -> Ticket {
        self.active_tab = tab;
        self.begin_load(tab.load_kind())
    }

    pub fn begin_load(&mut self, kind: LoadKind) -> Ticket {
        self.tickets.issue(kind)
    }

    pub fn is_loading(&self, kind: LoadKind) -> bool {
        self.tickets.slot(kind).is_some()
    }

    /// Settle a failed load. Returns false when the failure is stale.
    pub fn load_failed(&mut self, ticket: Ticket) -> bool {
        if ticket.kind == LoadKind::Candidates && self.tickets.slot(ticket.kind) == Some(ticket.seq) {
            self.matching.pending_female = None;
        }
        self.tickets.settle(ticket)
    }

    /// Row count shown next to the title, for the active tab's list
    pub fn total_count(&self) -> usize {
        match self.active_tab {
            Tab::Approval => self.approval.members.len(),
            Tab::Matching => self.matching.females.len(),
            Tab::MatchingList => self.matchings.len(),
        }
    }

    // ---- approval ----

    pub fn set_keyword(&mut self, keyword: &str) {
        self.approval.keyword = keyword.trim().to_string();
    }

    /// Keyword to send to the backend, if any
    pub fn search_keyword(&self) -> Option<&str> {
        let keyword = self.approval.keyword.trim();
        (!keyword.is_empty()).then_some(keyword)
    }

    pub fn approval_loaded(&mut self, ticket: Ticket, members: Vec<Member>) -> bool {
        if !self.tickets.settle(ticket) {
            tracing::debug!("Dropping stale approval list (ticket {})", ticket.seq);
            return false;
        }
        self.approval.members = members;
        true
    }

    pub fn open_detail(&mut self, member: Member) {
        self.detail = Some(member);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Target a member for a status change. Only pending members get options.
    pub fn open_status_modal(&mut self, member_id: i64, name: &str, current_status: MemberStatus) {
        let options = current_status.allowed_transitions().to_vec();
        self.status_modal = Some(StatusTarget {
            member_id,
            name: name.to_string(),
            current_status,
            options,
        });
    }

    pub fn cancel_status_modal(&mut self) {
        self.status_modal = None;
    }

    /// Resolve the status picked in the modal.
    ///
    /// `Ok(None)` when no member is targeted; the confirm is then a no-op.
    pub fn status_change(
        &self,
        choice: Option<&str>,
    ) -> Result<Option<(i64, MemberStatus)>, WorkflowError> {
        let Some(target) = &self.status_modal else {
            return Ok(None);
        };
        let raw = choice.unwrap_or("").trim();
        let status = MemberStatus::from(raw);
        if !target.options.contains(&status) {
            return Err(WorkflowError::StatusNotAllowed(raw.to_string()));
        }
        Ok(Some((target.member_id, status)))
    }

    /// Apply a successful status change: close the modal and clear the target
    pub fn status_changed(&mut self, member_id: i64, status: MemberStatus) {
        if self.status_modal.as_ref().map(|t| t.member_id) == Some(member_id) {
            self.status_modal = None;
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.id == member_id) {
            detail.status = Some(status);
        }
    }

    // ---- matching ----

    pub fn females_loaded(&mut self, ticket: Ticket, members: Vec<Member>) -> bool {
        if !self.tickets.settle(ticket) {
            tracing::debug!("Dropping stale female list (ticket {})", ticket.seq);
            return false;
        }
        self.matching.females = members;
        true
    }

    /// Start fetching candidates for a female member
    pub fn begin_female_selection(&mut self, female_id: i64, name: &str) -> Ticket {
        self.matching.pending_female = Some(SelectedFemale { id: female_id, name: name.to_string() });
        self.tickets.issue(LoadKind::Candidates)
    }

    /// Apply fetched candidates.
    ///
    /// `Ok(false)` for a superseded response. An empty list is rejected and
    /// the view stays on the female list.
    pub fn candidates_loaded(
        &mut self,
        ticket: Ticket,
        candidates: Vec<MatchingCandidate>,
    ) -> Result<bool, WorkflowError> {
        if !self.tickets.settle(ticket) {
            tracing::debug!("Dropping stale candidate list (ticket {})", ticket.seq);
            return Ok(false);
        }
        let pending = self.matching.pending_female.take();
        if candidates.is_empty() {
            return Err(WorkflowError::NoCandidates);
        }
        let Some(female) = pending else {
            return Err(WorkflowError::NoFemaleSelected);
        };

        self.matching.selected_female = Some(female);
        self.matching.candidates = candidates;
        self.matching.selection.clear();
        self.matching.stage = MatchingStage::CandidateSelection;
        Ok(true)
    }

    pub fn toggle_male(&mut self, member_id: i64, checked: bool) -> Result<(), WorkflowError> {
        self.ensure_selecting()?;
        if checked && !self.matching.candidates.iter().any(|c| c.member_id == member_id) {
            return Err(WorkflowError::UnknownCandidate(member_id));
        }
        self.matching.selection.toggle(member_id, checked)
    }

    pub fn select_all_males(&mut self, checked: bool) -> Result<(), WorkflowError> {
        self.ensure_selecting()?;
        let visible = self.matching.candidates.iter().map(|c| c.member_id);
        self.matching.selection.select_all(visible, checked);
        Ok(())
    }

    fn ensure_selecting(&self) -> Result<(), WorkflowError> {
        match self.matching.stage {
            MatchingStage::CandidateSelection => Ok(()),
            MatchingStage::Confirmation => Err(WorkflowError::SelectionLocked),
            MatchingStage::FemaleList => Err(WorkflowError::NoFemaleSelected),
        }
    }

    /// Create-matching is offered only with exactly three males selected
    pub fn can_create_matching(&self) -> bool {
        self.matching.selected_female.is_some() && self.matching.selection.is_complete()
    }

    /// Selected candidates in display order
    pub fn selected_candidates(&self) -> Vec<&MatchingCandidate> {
        self.matching
            .candidates
            .iter()
            .filter(|c| self.matching.selection.contains(c.member_id))
            .collect()
    }

    pub fn open_matching_confirm(&mut self) -> Result<(), WorkflowError> {
        if self.matching.stage != MatchingStage::CandidateSelection {
            return Err(WorkflowError::NoFemaleSelected);
        }
        if !self.matching.selection.is_complete() {
            return Err(WorkflowError::IncompleteSelection);
        }
        self.matching.stage = MatchingStage::Confirmation;
        Ok(())
    }

    pub fn cancel_matching_confirm(&mut self) {
        if self.matching.stage == MatchingStage::Confirmation {
            self.matching.stage = MatchingStage::CandidateSelection;
        }
    }

    /// Build the creation request, re-checking the three-male rule
    pub fn matching_request(&self) -> Result<CreateMatchingRequest, WorkflowError> {
        if !self.matching.selection.is_complete() {
            return Err(WorkflowError::IncompleteSelection);
        }
        let female = self
            .matching
            .selected_female
            .as_ref()
            .ok_or(WorkflowError::NoFemaleSelected)?;
        Ok(CreateMatchingRequest {
            female_member_id: female.id,
            male_member_ids: self.matching.selection.ids().to_vec(),
        })
    }

    /// Matching was created: drop the selection and go back to the female list
    pub fn matching_created(&mut self) {
        self.show_female_list();
    }

    /// Back-navigation from the candidate view. Discards everything selected.
    pub fn show_female_list(&mut self) {
        self.matching.stage = MatchingStage::FemaleList;
        self.matching.selected_female = None;
        self.matching.pending_female = None;
        self.matching.candidates.clear();
        self.matching.selection.clear();
        self.tickets.cancel(LoadKind::Candidates);
    }

    // ---- matching list ----

    pub fn matchings_loaded(&mut self, ticket: Ticket, matchings: Vec<Matching>) -> bool {
        if !self.tickets.settle(ticket) {
            tracing::debug!("Dropping stale matching list (ticket {})", ticket.seq);
            return false;
        }
        self.matchings = matchings;
        true
    }

    // ---- notifications ----

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, score: f64) -> MatchingCandidate {
        MatchingCandidate {
            member_id: id,
            name: Some(format!("Male {}", id)),
            email: Some(format!("m{}@test.kr", id)),
            height: Some(175),
            weight: None,
            residence_area: Some("Seoul".to_string()),
            matching_count: Some(0),
            matching_score: score,
            score_color: None,
            score_level: None,
        }
    }

    fn selecting_state(candidate_ids: &[i64]) -> ConsoleState {
        let mut state = ConsoleState::new();
        let ticket = state.begin_female_selection(7, "Aiko");
        let candidates = candidate_ids.iter().map(|id| candidate(*id, 80.0)).collect();
        assert_eq!(state.candidates_loaded(ticket, candidates), Ok(true));
        state
    }

    #[test]
    fn test_unknown_tab_falls_back_to_approval() {
        assert_eq!(Tab::parse("matching-list"), Tab::MatchingList);
        assert_eq!(Tab::parse("bogus"), Tab::Approval);
    }

    #[test]
    fn test_switch_tab_issues_matching_load() {
        let mut state = ConsoleState::new();
        let ticket = state.switch_tab(Tab::MatchingList);
        assert_eq!(ticket.kind, LoadKind::Matchings);
        assert!(state.is_loading(LoadKind::Matchings));
        assert!(state.matchings_loaded(ticket, vec![]));
        assert!(!state.is_loading(LoadKind::Matchings));
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut state = ConsoleState::new();
        let first = state.begin_load(LoadKind::Approval);
        let second = state.begin_load(LoadKind::Approval);
        assert!(state.approval_loaded(second, vec![]));
        let stale: Member = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(!state.approval_loaded(first, vec![stale]));
        assert!(state.approval.members.is_empty());
    }

    #[test]
    fn test_stale_candidates_after_second_selection() {
        let mut state = ConsoleState::new();
        let first = state.begin_female_selection(1, "First");
        let second = state.begin_female_selection(2, "Second");

        assert_eq!(state.candidates_loaded(second, vec![candidate(10, 90.0)]), Ok(true));
        assert_eq!(state.candidates_loaded(first, vec![candidate(20, 50.0)]), Ok(false));

        assert_eq!(state.matching.selected_female.as_ref().map(|f| f.id), Some(2));
        assert_eq!(state.matching.candidates.len(), 1);
        assert_eq!(state.matching.candidates[0].member_id, 10);
    }

    #[test]
    fn test_empty_candidates_do_not_transition() {
        let mut state = ConsoleState::new();
        let ticket = state.begin_female_selection(7, "Aiko");
        assert_eq!(state.candidates_loaded(ticket, vec![]), Err(WorkflowError::NoCandidates));
        assert_eq!(state.matching.stage, MatchingStage::FemaleList);
        assert!(state.matching.selected_female.is_none());
        assert!(state.matching.pending_female.is_none());
    }

    #[test]
    fn test_back_navigation_discards_inflight_candidates() {
        let mut state = ConsoleState::new();
        let ticket = state.begin_female_selection(7, "Aiko");
        state.show_female_list();
        assert_eq!(state.candidates_loaded(ticket, vec![candidate(1, 70.0)]), Ok(false));
        assert_eq!(state.matching.stage, MatchingStage::FemaleList);
    }

    #[test]
    fn test_create_enabled_only_with_three() {
        let mut state = selecting_state(&[1, 2, 3, 4, 5]);
        for (id, expected) in [(1, false), (2, false), (3, true)] {
            state.toggle_male(id, true).unwrap();
            assert_eq!(state.can_create_matching(), expected);
        }
        assert_eq!(state.toggle_male(4, true), Err(WorkflowError::SelectionFull));
        assert!(state.can_create_matching());
        state.toggle_male(2, false).unwrap();
        assert!(!state.can_create_matching());
    }

    #[test]
    fn test_toggle_rejects_unknown_candidate() {
        let mut state = selecting_state(&[1, 2]);
        assert_eq!(state.toggle_male(99, true), Err(WorkflowError::UnknownCandidate(99)));
    }

    #[test]
    fn test_confirmation_locks_selection() {
        let mut state = selecting_state(&[1, 2, 3, 4]);
        state.select_all_males(true).unwrap();
        state.open_matching_confirm().unwrap();
        assert_eq!(state.toggle_male(1, false), Err(WorkflowError::SelectionLocked));
        state.cancel_matching_confirm();
        assert_eq!(state.matching.stage, MatchingStage::CandidateSelection);
        assert_eq!(state.matching.selection.ids(), &[1, 2, 3]);
    }

    #[test]
    fn test_confirm_requires_three() {
        let mut state = selecting_state(&[1, 2, 3]);
        state.toggle_male(1, true).unwrap();
        assert_eq!(state.open_matching_confirm(), Err(WorkflowError::IncompleteSelection));
        assert_eq!(state.matching_request(), Err(WorkflowError::IncompleteSelection));
    }

    #[test]
    fn test_show_female_list_resets_everything() {
        let mut state = selecting_state(&[1, 2, 3]);
        state.select_all_males(true).unwrap();
        state.open_matching_confirm().unwrap();
        state.show_female_list();
        assert_eq!(state.matching.stage, MatchingStage::FemaleList);
        assert!(state.matching.selected_female.is_none());
        assert!(state.matching.candidates.is_empty());
        assert!(state.matching.selection.is_empty());
    }

    #[test]
    fn test_status_options_only_for_pending() {
        let mut state = ConsoleState::new();
        state.open_status_modal(3, "Aiko", MemberStatus::Approved);
        assert!(state.status_modal.as_ref().unwrap().options.is_empty());
        assert!(matches!(
            state.status_change(Some("BLACKLISTED")),
            Err(WorkflowError::StatusNotAllowed(_))
        ));

        state.open_status_modal(3, "Aiko", MemberStatus::PendingApproval);
        assert_eq!(
            state.status_change(Some("APPROVED")),
            Ok(Some((3, MemberStatus::Approved)))
        );
    }

    #[test]
    fn test_status_change_without_target_is_noop() {
        let state = ConsoleState::new();
        assert_eq!(state.status_change(Some("APPROVED")), Ok(None));
    }

    #[test]
    fn test_status_changed_clears_target_and_updates_detail() {
        let mut state = ConsoleState::new();
        let member: Member =
            serde_json::from_str(r#"{"id": 3, "status": "PENDING_APPROVAL"}"#).unwrap();
        state.open_detail(member);
        state.open_status_modal(3, "Aiko", MemberStatus::PendingApproval);
        state.status_changed(3, MemberStatus::Approved);
        assert!(state.status_modal.is_none());
        assert_eq!(state.detail.unwrap().status, Some(MemberStatus::Approved));
    }

    #[test]
    fn test_total_count_follows_active_tab() {
        let mut state = ConsoleState::new();
        let ticket = state.begin_load(LoadKind::Females);
        let female: Member = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        state.females_loaded(ticket, vec![female]);
        assert_eq!(state.total_count(), 0);
        state.active_tab = Tab::Matching;
        assert_eq!(state.total_count(), 1);
    }

    #[test]
    fn test_state_is_serializable() {
        let state = selecting_state(&[1, 2, 3]);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["matching"]["stage"], "candidate-selection");
        let back: ConsoleState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
