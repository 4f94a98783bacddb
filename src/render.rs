//! HTML projection of a [`ConsoleState`].
//!
//! Rendering never touches the backend or mutates state. Every value that
//! originates from the backend goes through [`escape`]; actions are plain
//! forms whose ids live in the URL path.

use crate::core::format::{format_date, or_dash, text_or_dash, PLACEHOLDER};
use crate::core::labels;
use crate::core::state::{MatchingStage, StatusTarget};
use crate::core::{
    format_score, score_color, score_level, ConsoleState, MaleSelection, Notice, NoticeLevel, Tab,
};
use crate::models::{Matching, MatchingCandidate, Member, MemberStatus, MALES_PER_MATCHING};

const EMPTY_MEMBERS: &str = "조회된 회원이 없습니다.";
const EMPTY_MATCHINGS: &str = "조회된 매칭이 없습니다.";

/// Escape text for HTML element content and quoted attribute values
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt_text(value: Option<&str>) -> String {
    escape(&text_or_dash(value))
}

fn with_unit(value: Option<i32>, unit: &str) -> String {
    or_dash(value.map(|v| format!("{} {}", v, unit)))
}

/// Only http(s) links are rendered as anchors
fn safe_link(url: &str) -> Option<String> {
    let trimmed = url.trim();
    (trimmed.starts_with("https://") || trimmed.starts_with("http://")).then(|| escape(trimmed))
}

/// A POST form rendered as a single button
fn action_button(action: &str, label: &str, class: &str, hidden: &[(&str, &str)], disabled: bool) -> String {
    let fields: String = hidden
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                escape(name),
                escape(value)
            )
        })
        .collect();
    format!(
        r#"<form method="post" action="{}" class="inline-form">{}<button type="submit" class="{}"{}>{}</button></form>"#,
        escape(action),
        fields,
        class,
        if disabled { " disabled" } else { "" },
        label
    )
}

fn empty_row(colspan: u8, message: &str) -> String {
    format!(
        r#"<tr class="empty-row"><td colspan="{}"><div class="empty-state"><p>{}</p></div></td></tr>"#,
        colspan, message
    )
}

fn status_badge(status: Option<&MemberStatus>) -> String {
    match status {
        Some(status) => format!(
            r#"<span class="status-badge {}">{}</span>"#,
            labels::status_class(status),
            escape(labels::status_text(status))
        ),
        None => PLACEHOLDER.to_string(),
    }
}

/// Korean label for a profile code
fn code_label(value: Option<&str>, lookup: fn(&str) -> &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(|v| escape(lookup(v)))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Member name that opens the detail modal
fn member_link(member_id: i64, name: Option<&str>) -> String {
    action_button(
        &format!("/console/members/{}/detail", member_id),
        &opt_text(name),
        "member-name-link",
        &[],
        false,
    )
}

fn status_action(member: &Member, class: &str) -> String {
    let status = member
        .status
        .as_ref()
        .map(|s| s.as_str().to_string())
        .unwrap_or_default();
    action_button(
        &format!("/console/members/{}/status", member.id),
        "상태 변경",
        class,
        &[("name", member.display_name()), ("currentStatus", status.as_str())],
        false,
    )
}

// ==================== approval ====================

pub fn render_approval_rows(members: &[Member]) -> String {
    if members.is_empty() {
        return empty_row(7, EMPTY_MEMBERS);
    }
    members
        .iter()
        .map(|member| {
            format!(
                r#"<tr data-member-id="{id}"><td>{id}</td><td>{name}</td><td>{email}</td><td>{status}</td><td>{created}</td><td>{area}</td><td>{action}</td></tr>"#,
                id = member.id,
                name = member_link(member.id, member.name.as_deref()),
                email = opt_text(member.email.as_deref()),
                status = status_badge(member.status.as_ref()),
                created = escape(&format_date(member.created_at.as_deref())),
                area = opt_text(member.residence_area.as_deref()),
                action = status_action(member, "action-btn"),
            )
        })
        .collect()
}

fn render_approval_panel(state: &ConsoleState) -> String {
    format!(
        r#"<div class="search-bar">
<form method="post" action="/console/approval/search" class="inline-form">
<input type="text" id="search-input" name="keyword" value="{keyword}" placeholder="이름 또는 이메일 검색">
<button type="submit" id="search-btn" class="btn">검색</button>
</form>
{reset}
</div>
<table class="data-table">
<thead><tr><th>ID</th><th>이름</th><th>이메일</th><th>상태</th><th>등록일</th><th>거주지역</th><th>관리</th></tr></thead>
<tbody id="approval-table-body">{rows}</tbody>
</table>"#,
        keyword = escape(&state.approval.keyword),
        reset = action_button("/console/approval/reset", "필터 초기화", "btn btn-secondary", &[], false),
        rows = render_approval_rows(&state.approval.members),
    )
}

/// Detail modal body. Absent values all render as the same placeholder.
pub fn render_member_detail(member: &Member) -> String {
    let religion_other = member
        .religion_other
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| format!("<p><strong>종교 기타:</strong> {}</p>", escape(v)))
        .unwrap_or_default();

    let profile_image = member
        .profile_image_url
        .as_deref()
        .or(member.thumbnail_image_url.as_deref())
        .and_then(safe_link)
        .map(|href| {
            format!(
                r#"<p><strong>프로필 이미지:</strong> <a href="{}" target="_blank" rel="noopener noreferrer">보기</a></p>"#,
                href
            )
        })
        .unwrap_or_default();

    let gallery: String = member
        .image_urls
        .iter()
        .filter_map(|url| safe_link(url))
        .enumerate()
        .map(|(i, href)| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a> "#,
                href,
                i + 1
            )
        })
        .collect();
    let gallery = if gallery.is_empty() {
        String::new()
    } else {
        format!("<p><strong>추가 이미지:</strong> {}</p>", gallery.trim_end())
    };

    let footer = if member.is_pending_approval() {
        status_action(member, "btn btn-primary")
    } else {
        String::new()
    };

    format!(
        r#"<div id="member-detail-content" class="detail-grid">
<div><h4>기본 정보</h4>
<p><strong>ID:</strong> {id}</p>
<p><strong>이름:</strong> {name}</p>
<p><strong>이메일:</strong> {email}</p>
<p><strong>상태:</strong> {status}</p>
<p><strong>성별:</strong> {gender}</p>
<p><strong>등록일:</strong> {created}</p></div>
<div><h4>신체 정보</h4>
<p><strong>키:</strong> {height}</p>
<p><strong>몸무게:</strong> {weight}</p>
<p><strong>거주지역:</strong> {area}</p></div>
<div><h4>기타 정보</h4>
<p><strong>흡연:</strong> {smoking}</p>
<p><strong>음주:</strong> {drinking}</p>
<p><strong>종교:</strong> {religion}</p>
{religion_other}<p><strong>학력:</strong> {education}</p>
<p><strong>자산:</strong> {asset}</p></div>
<div><h4>추가 정보</h4>
<p><strong>기타 정보:</strong> {other}</p>
{profile_image}{gallery}</div>
</div>
<div id="member-detail-footer" class="modal-footer">{footer}</div>"#,
        id = member.id,
        name = opt_text(member.name.as_deref()),
        email = opt_text(member.email.as_deref()),
        status = status_badge(member.status.as_ref()),
        gender = member
            .gender
            .as_ref()
            .map(|g| escape(labels::gender_text(g)))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        created = escape(&format_date(member.created_at.as_deref())),
        height = with_unit(member.height, "cm"),
        weight = with_unit(member.weight, "kg"),
        area = opt_text(member.residence_area.as_deref()),
        smoking = code_label(member.smoking_status.as_deref(), labels::smoking_text),
        drinking = code_label(member.drinking_frequency.as_deref(), labels::drinking_text),
        religion = code_label(member.religion.as_deref(), labels::religion_text),
        religion_other = religion_other,
        education = code_label(member.education.as_deref(), labels::education_text),
        asset = code_label(member.asset.as_deref(), labels::asset_text),
        other = opt_text(member.other_info.as_deref()),
        profile_image = profile_image,
        gallery = gallery,
        footer = footer,
    )
}

fn render_detail_modal(member: &Member) -> String {
    format!(
        r#"<div id="member-detail-modal" class="modal show"><div class="modal-content">
<div class="modal-header"><h3>유저 상세 정보</h3>{close}</div>
{body}
</div></div>"#,
        close = action_button("/console/members/detail/close", "&times;", "modal-close", &[], false),
        body = render_member_detail(member),
    )
}

/// Status modal. With no options the confirm button is disabled.
pub fn render_status_modal(target: &StatusTarget) -> String {
    let options: String = target
        .options
        .iter()
        .map(|status| {
            format!(
                r#"<option value="{}">{}</option>"#,
                escape(status.as_str()),
                escape(labels::status_text(status))
            )
        })
        .collect();
    let disabled = if target.options.is_empty() { " disabled" } else { "" };

    format!(
        r#"<div id="status-modal" class="modal show"><div class="modal-content">
<div class="modal-header"><h3>상태 변경</h3></div>
<form method="post" action="/console/status/confirm">
<p><strong id="modal-member-name">{name}</strong> 님의 상태를 변경합니다.</p>
<p>현재 상태: {current}</p>
<select id="new-status" name="status">{options}</select>
<div class="modal-footer"><button type="submit" id="modal-confirm" class="btn btn-primary"{disabled}>확인</button></div>
</form>
{cancel}
</div></div>"#,
        name = escape(&target.name),
        current = status_badge(Some(&target.current_status)),
        options = options,
        disabled = disabled,
        cancel = action_button("/console/status/cancel", "취소", "btn btn-secondary", &[], false),
    )
}

// ==================== matching ====================

pub fn render_female_rows(members: &[Member]) -> String {
    if members.is_empty() {
        return empty_row(6, EMPTY_MEMBERS);
    }
    members
        .iter()
        .map(|member| {
            let action = format!("/console/matching/females/{}/select", member.id);
            let name = member.display_name();
            format!(
                r#"<tr data-member-id="{id}"><td>{id}</td><td>{link}</td><td>{email}</td><td>{created}</td><td>{area}</td><td>{button}</td></tr>"#,
                id = member.id,
                link = action_button(&action, &opt_text(member.name.as_deref()), "member-name-link", &[("name", name)], false),
                email = opt_text(member.email.as_deref()),
                created = escape(&format_date(member.created_at.as_deref())),
                area = opt_text(member.residence_area.as_deref()),
                button = action_button(&action, "매칭 후보 보기", "action-btn", &[("name", name)], false),
            )
        })
        .collect()
}

fn count_badge(count: u32) -> String {
    let color = if count > 0 { "#4299e1" } else { "#a0aec0" };
    format!(
        r#"<span class="badge" style="background: {};">{}개</span>"#,
        color, count
    )
}

fn score_badge(candidate: &MatchingCandidate) -> String {
    let color = candidate
        .score_color
        .as_deref()
        .filter(|c| is_css_color(c))
        .unwrap_or_else(|| score_color(candidate.matching_score));
    let level = candidate
        .score_level
        .as_deref()
        .unwrap_or_else(|| score_level(candidate.matching_score));
    format!(
        r#"<span class="score-badge" style="background: {};" title="{}">{}</span>"#,
        color,
        escape(level),
        format_score(candidate.matching_score)
    )
}

/// Server colors are trusted only in `#rrggbb` / `#rgb` form
fn is_css_color(value: &str) -> bool {
    let hex = value.strip_prefix('#').unwrap_or("");
    matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn render_candidate_rows(candidates: &[MatchingCandidate], selection: &MaleSelection) -> String {
    candidates
        .iter()
        .map(|candidate| {
            let selected = selection.contains(candidate.member_id);
            let toggle = action_button(
                &format!("/console/matching/candidates/{}/toggle", candidate.member_id),
                if selected { "&#9745;" } else { "&#9744;" },
                if selected { "check-toggle checked" } else { "check-toggle" },
                &[("checked", if selected { "false" } else { "true" })],
                false,
            );
            format!(
                r#"<tr data-member-id="{id}"{class}><td>{toggle}</td><td>{id}</td><td>{name}</td><td>{email}</td><td>{height}</td><td>{weight}</td><td>{area}</td><td>{count}</td><td>{score}</td></tr>"#,
                id = candidate.member_id,
                class = if selected { r#" class="selected""# } else { "" },
                toggle = toggle,
                name = opt_text(candidate.name.as_deref()),
                email = opt_text(candidate.email.as_deref()),
                height = with_unit(candidate.height, "cm"),
                weight = with_unit(candidate.weight, "kg"),
                area = opt_text(candidate.residence_area.as_deref()),
                count = count_badge(candidate.matching_count.unwrap_or(0)),
                score = score_badge(candidate),
            )
        })
        .collect()
}

fn render_matching_panel(state: &ConsoleState) -> String {
    let view = &state.matching;
    if view.stage == MatchingStage::FemaleList {
        return format!(
            r#"<div id="female-list-section">
<table class="data-table">
<thead><tr><th>ID</th><th>이름</th><th>이메일</th><th>등록일</th><th>거주지역</th><th>매칭</th></tr></thead>
<tbody id="female-table-body">{}</tbody>
</table>
</div>"#,
            render_female_rows(&view.females)
        );
    }

    let female_name = view
        .selected_female
        .as_ref()
        .map(|f| escape(&f.name))
        .unwrap_or_default();
    let all_checked = view.selection.is_complete();

    format!(
        r#"<div id="matching-candidates-section">
<div class="section-header">
{back}
<h3><span id="selected-female-name">{female}</span> 님의 매칭 후보</h3>
<span>선택된 남성: <strong id="selected-male-count">{count}</strong> / {max}</span>
{create}
</div>
<table class="data-table">
<thead><tr><th>{select_all}</th><th>ID</th><th>이름</th><th>이메일</th><th>키</th><th>몸무게</th><th>거주지역</th><th>매칭 수</th><th>매칭 점수</th></tr></thead>
<tbody id="matching-candidates-body">{rows}</tbody>
</table>
</div>"#,
        back = action_button("/console/matching/back", "&larr; 여성 유저 목록", "btn btn-secondary", &[], false),
        female = female_name,
        count = view.selection.len(),
        max = MALES_PER_MATCHING,
        create = action_button(
            "/console/matching/confirm",
            "매칭 생성",
            "btn btn-primary",
            &[],
            !state.can_create_matching()
        ),
        select_all = action_button(
            "/console/matching/candidates/select-all",
            if all_checked { "전체 해제" } else { "전체 선택" },
            "check-toggle",
            &[("checked", if all_checked { "false" } else { "true" })],
            false
        ),
        rows = render_candidate_rows(&view.candidates, &view.selection),
    )
}

/// Confirmation modal listing the female and the three selected males
pub fn render_matching_confirm(state: &ConsoleState) -> String {
    let female = state
        .matching
        .selected_female
        .as_ref()
        .map(|f| escape(&f.name))
        .unwrap_or_default();
    let males: String = state
        .selected_candidates()
        .iter()
        .map(|m| {
            format!(
                "<li>{} ({})</li>",
                opt_text(m.name.as_deref()),
                format_score(m.matching_score)
            )
        })
        .collect();

    format!(
        r#"<div id="matching-confirm-modal" class="modal show"><div class="modal-content">
<div class="modal-header"><h3>매칭 확인</h3></div>
<p>여성 유저: <strong id="confirm-female-name">{female}</strong></p>
<div id="confirm-male-names"><strong>선택된 남성 유저:</strong><ul>{males}</ul></div>
<div class="modal-footer">{cancel}{confirm}</div>
</div></div>"#,
        female = female,
        males = males,
        cancel = action_button("/console/matching/confirm/cancel", "취소", "btn btn-secondary", &[], false),
        confirm = action_button("/console/matching/create", "매칭 생성", "btn btn-primary", &[], false),
    )
}

// ==================== matching list ====================

pub fn render_matching_rows(matchings: &[Matching]) -> String {
    if matchings.is_empty() {
        return empty_row(4, EMPTY_MATCHINGS);
    }
    matchings
        .iter()
        .map(|matching| {
            let males: String = matching
                .ranked_males()
                .iter()
                .map(|male| {
                    format!(
                        r#"<div class="male-member">{link}<br><small>{email}</small><br><small>순서: {order}</small></div>"#,
                        link = member_link(male.member_id, male.name.as_deref()),
                        email = opt_text(male.email.as_deref()),
                        order = male.order,
                    )
                })
                .collect();
            format!(
                r#"<tr data-matching-id="{id}"><td>{id}</td><td>{female}<br><small>{email}</small></td><td>{males}</td><td>{created}</td></tr>"#,
                id = matching.matching_id,
                female = member_link(matching.female_member_id, matching.female_name.as_deref()),
                email = opt_text(matching.female_email.as_deref()),
                males = males,
                created = escape(&format_date(matching.created_at.as_deref())),
            )
        })
        .collect()
}

fn render_matching_list_panel(state: &ConsoleState) -> String {
    format!(
        r#"<table class="data-table">
<thead><tr><th>매칭 ID</th><th>여성 유저</th><th>남성 유저</th><th>매칭일</th></tr></thead>
<tbody id="matching-list-table-body">{}</tbody>
</table>"#,
        render_matching_rows(&state.matchings)
    )
}

// ==================== page ====================

pub fn render_notice(notice: &Notice) -> String {
    let (class, icon) = match notice.level {
        NoticeLevel::Success => ("notice notice-success", "&#9989;"),
        NoticeLevel::Error => ("notice notice-error", "&#10060;"),
    };
    format!(
        r#"<div class="{}" role="alert">{} {}</div>"#,
        class,
        icon,
        escape(&notice.message)
    )
}

fn render_tabs(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { "nav-tab active" } else { "nav-tab" };
            action_button(
                &format!("/console/tabs/{}", tab.as_str()),
                labels::tab_title(*tab),
                class,
                &[],
                false,
            )
        })
        .collect()
}

fn panel(id: &str, active: bool, body: String) -> String {
    format!(
        r#"<section id="{}" class="tab-content{}"{}>{}</section>"#,
        id,
        if active { " active" } else { "" },
        if active { "" } else { " hidden" },
        body
    )
}

/// Render the full console page for a session.
///
/// `notice` is passed separately because it is taken out of the state once
/// shown.
pub fn render_page(state: &ConsoleState, notice: Option<&Notice>) -> String {
    let active = state.active_tab;
    let mut modals = String::new();
    if let Some(member) = &state.detail {
        modals.push_str(&render_detail_modal(member));
    }
    if let Some(target) = &state.status_modal {
        modals.push_str(&render_status_modal(target));
    }
    if state.matching.stage == MatchingStage::Confirmation {
        modals.push_str(&render_matching_confirm(state));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>Masil Admin</title>
<style>{css}</style>
</head>
<body>
<header class="top-bar">
<nav>{tabs}</nav>
<form method="post" action="/console/logout" class="inline-form" onsubmit="return confirm('로그아웃 하시겠습니까?');"><button type="submit" id="logout-btn" class="btn btn-secondary">로그아웃</button></form>
</header>
<main>
<h2><span id="current-tab-title">{title}</span> <small>총 <span id="total-count">{total}</span>건</small></h2>
{notice}
{approval}
{matching}
{matching_list}
</main>
{modals}
</body>
</html>"#,
        css = STYLE,
        tabs = render_tabs(active),
        title = labels::tab_title(active),
        total = state.total_count(),
        notice = notice.map(render_notice).unwrap_or_default(),
        approval = panel("approval-tab-content", active == Tab::Approval, render_approval_panel(state)),
        matching = panel("matching-tab-content", active == Tab::Matching, render_matching_panel(state)),
        matching_list = panel(
            "matching-list-tab-content",
            active == Tab::MatchingList,
            render_matching_list_panel(state)
        ),
        modals = modals,
    )
}

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;background:#f7fafc;color:#2d3748}\
.top-bar{display:flex;justify-content:space-between;padding:12px 24px;background:#667eea}\
main{padding:24px}\
.inline-form{display:inline}\
.nav-tab{background:none;border:0;color:#e2e8f0;font-size:16px;margin-right:12px;cursor:pointer}\
.nav-tab.active{color:#fff;font-weight:700}\
.data-table{width:100%;border-collapse:collapse;background:#fff}\
.data-table td,.data-table th{padding:8px;border-bottom:1px solid #e2e8f0;text-align:left}\
.member-name-link{background:none;border:0;color:#667eea;cursor:pointer;padding:0}\
.badge,.score-badge{color:#fff;padding:4px 12px;border-radius:12px;font-weight:600}\
.status-badge{padding:2px 8px;border-radius:8px;background:#edf2f7}\
.status-pending{background:#fefcbf}.status-approved{background:#c6f6d5}\
.status-connecting{background:#bee3f8}.status-connected{background:#e9d8fd}\
.status-blacklisted{background:#fed7d7}\
.notice{padding:12px;margin-bottom:16px;border-radius:8px}\
.notice-success{background:#c6f6d5}.notice-error{background:#fed7d7}\
.modal{position:fixed;inset:0;background:rgba(0,0,0,.4);display:flex;align-items:center;justify-content:center}\
.modal-content{background:#fff;padding:24px;border-radius:12px;min-width:480px}\
.detail-grid{display:grid;grid-template-columns:1fr 1fr;gap:20px}\
.empty-state{text-align:center;color:#718096}\
button[disabled]{opacity:.5;cursor:not-allowed}\
tr.selected{background:#ebf8ff}";
