use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle stage of a member as reported by the backend.
///
/// Unknown values are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    IncompleteProfile,
    PendingApproval,
    Approved,
    Connecting,
    Connected,
    Blacklisted,
    Other(String),
}

impl MemberStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MemberStatus::IncompleteProfile => "INCOMPLETE_PROFILE",
            MemberStatus::PendingApproval => "PENDING_APPROVAL",
            MemberStatus::Approved => "APPROVED",
            MemberStatus::Connecting => "CONNECTING",
            MemberStatus::Connected => "CONNECTED",
            MemberStatus::Blacklisted => "BLACKLISTED",
            MemberStatus::Other(raw) => raw,
        }
    }

    /// Statuses an admin may move a member to from this one.
    ///
    /// Only pending members can be changed from the console.
    pub fn allowed_transitions(&self) -> &'static [MemberStatus] {
        const FROM_PENDING: &[MemberStatus] = &[MemberStatus::Approved, MemberStatus::Blacklisted];
        match self {
            MemberStatus::PendingApproval => FROM_PENDING,
            _ => &[],
        }
    }
}

impl From<String> for MemberStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "INCOMPLETE_PROFILE" => MemberStatus::IncompleteProfile,
            "PENDING_APPROVAL" => MemberStatus::PendingApproval,
            "APPROVED" => MemberStatus::Approved,
            "CONNECTING" => MemberStatus::Connecting,
            "CONNECTED" => MemberStatus::Connected,
            "BLACKLISTED" => MemberStatus::Blacklisted,
            _ => MemberStatus::Other(raw),
        }
    }
}

impl From<&str> for MemberStatus {
    fn from(raw: &str) -> Self {
        MemberStatus::from(raw.to_string())
    }
}

impl From<MemberStatus> for String {
    fn from(status: MemberStatus) -> Self {
        match status {
            MemberStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Member category. The service only pairs Japanese women with Korean men.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    JapaneseFemale,
    KoreanMale,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::JapaneseFemale => "JAPANESE_FEMALE",
            Gender::KoreanMale => "KOREAN_MALE",
            Gender::Other(raw) => raw,
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "JAPANESE_FEMALE" => Gender::JapaneseFemale,
            "KOREAN_MALE" => Gender::KoreanMale,
            _ => Gender::Other(raw),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Member record as returned by the list and detail endpoints.
///
/// List endpoints only fill a subset of the fields; everything but the id
/// may be absent or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<MemberStatus>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub residence_area: Option<String>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub smoking_status: Option<String>,
    #[serde(default)]
    pub drinking_frequency: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub religion_other: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub other_info: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_urls: Vec<String>,
}

impl Member {
    pub fn is_pending_approval(&self) -> bool {
        matches!(self.status, Some(MemberStatus::PendingApproval))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Lists may come back as `null` instead of `[]`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Male member scored against a specific female member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingCandidate {
    pub member_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub residence_area: Option<String>,
    #[serde(default)]
    pub matching_count: Option<u32>,
    pub matching_score: f64,
    #[serde(default)]
    pub score_color: Option<String>,
    #[serde(default)]
    pub score_level: Option<String>,
}

/// Created grouping of one female member with three ranked male members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matching {
    pub matching_id: i64,
    pub female_member_id: i64,
    #[serde(default)]
    pub female_name: Option<String>,
    #[serde(default)]
    pub female_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub male_members: Vec<MaleMember>,
}

impl Matching {
    /// Male members in presentation rank
    pub fn ranked_males(&self) -> Vec<&MaleMember> {
        let mut males: Vec<&MaleMember> = self.male_members.iter().collect();
        males.sort_by_key(|m| m.order);
        males
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaleMember {
    pub member_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrips_unknown_values() {
        let status: MemberStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(status, MemberStatus::Other("SUSPENDED".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"SUSPENDED\"");
    }

    #[test]
    fn test_only_pending_members_have_transitions() {
        assert_eq!(
            MemberStatus::PendingApproval.allowed_transitions(),
            &[MemberStatus::Approved, MemberStatus::Blacklisted]
        );
        assert!(MemberStatus::Approved.allowed_transitions().is_empty());
        assert!(MemberStatus::Other("X".into()).allowed_transitions().is_empty());
    }

    #[test]
    fn test_member_tolerates_nulls() {
        let json = r#"{"id": 3, "name": "Aiko", "height": null, "status": "PENDING_APPROVAL"}"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, 3);
        assert_eq!(member.height, None);
        assert!(member.is_pending_approval());
        assert!(member.image_urls.is_empty());
    }

    #[test]
    fn test_ranked_males_sorted_by_order() {
        let json = r#"{
            "matchingId": 1, "femaleMemberId": 7,
            "maleMembers": [
                {"memberId": 3, "order": 3},
                {"memberId": 1, "order": 1},
                {"memberId": 2, "order": 2}
            ]
        }"#;
        let matching: Matching = serde_json::from_str(json).unwrap();
        let ids: Vec<i64> = matching.ranked_males().iter().map(|m| m.member_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
