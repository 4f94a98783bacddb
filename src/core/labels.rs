//! Display labels for backend enum strings.
//!
//! Every lookup falls back to the raw value for keys it does not know.

use crate::core::state::Tab;
use crate::models::{Gender, MemberStatus};

pub fn status_text(status: &MemberStatus) -> &str {
    match status {
        MemberStatus::PendingApproval => "승인대기",
        MemberStatus::Approved => "승인완료",
        MemberStatus::Connecting => "연결중",
        MemberStatus::Connected => "연결됨",
        MemberStatus::Blacklisted => "블랙 유저",
        other => other.as_str(),
    }
}

/// CSS class of the status badge. Unknown statuses get no class.
pub fn status_class(status: &MemberStatus) -> &'static str {
    match status {
        MemberStatus::PendingApproval => "status-pending",
        MemberStatus::Approved => "status-approved",
        MemberStatus::Connecting => "status-connecting",
        MemberStatus::Connected => "status-connected",
        MemberStatus::Blacklisted => "status-blacklisted",
        _ => "",
    }
}

pub fn gender_text(gender: &Gender) -> &str {
    match gender {
        Gender::JapaneseFemale => "일본 여성",
        Gender::KoreanMale => "한국 남성",
        Gender::Other(raw) => raw,
    }
}

pub fn smoking_text(value: &str) -> &str {
    match value {
        "SMOKER" => "흡연",
        "NON_SMOKER" => "비흡연",
        other => other,
    }
}

pub fn drinking_text(value: &str) -> &str {
    match value {
        "LESS_THAN_ONCE_A_WEEK" => "주 1회 미만",
        "ONCE_A_WEEK" => "주 1회",
        "TWICE_A_WEEK" => "주 2회",
        "MORE_THAN_THREE_TIMES_A_WEEK" => "주 3회 이상",
        other => other,
    }
}

pub fn religion_text(value: &str) -> &str {
    match value {
        "NONE" => "무교",
        "BUDDHISM" => "불교",
        "CHRISTIANITY" => "기독교",
        "CATHOLICISM" => "천주교",
        "SHINTO" => "신토",
        "OTHER" => "기타",
        other => other,
    }
}

pub fn education_text(value: &str) -> &str {
    match value {
        "HIGH_SCHOOL" => "고등학교 졸업",
        "ASSOCIATE_DEGREE" => "전문학사",
        "BACHELOR_DEGREE" => "학사",
        "MASTER_DEGREE" => "석사",
        "DOCTORATE_DEGREE" => "박사",
        other => other,
    }
}

pub fn asset_text(value: &str) -> &str {
    match value {
        "UNDER_100M" => "1억 미만",
        "BETWEEN_100M_300M" => "1억-3억",
        "BETWEEN_300M_500M" => "3억-5억",
        "BETWEEN_500M_1B" => "5억-10억",
        "OVER_1B" => "10억 초과",
        other => other,
    }
}

pub fn tab_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Approval => "유저 승인",
        Tab::Matching => "유저 매칭",
        Tab::MatchingList => "매칭 확인",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_fall_back_to_raw() {
        assert_eq!(smoking_text("VAPER"), "VAPER");
        assert_eq!(asset_text("OVER_10B"), "OVER_10B");
        assert_eq!(status_text(&MemberStatus::from("SUSPENDED")), "SUSPENDED");
        assert_eq!(status_class(&MemberStatus::from("SUSPENDED")), "");
        assert_eq!(gender_text(&Gender::from("OTHER".to_string())), "OTHER");
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(status_text(&MemberStatus::PendingApproval), "승인대기");
        assert_eq!(status_class(&MemberStatus::Blacklisted), "status-blacklisted");
        assert_eq!(religion_text("SHINTO"), "신토");
        assert_eq!(education_text("MASTER_DEGREE"), "석사");
        assert_eq!(drinking_text("ONCE_A_WEEK"), "주 1회");
    }
}
