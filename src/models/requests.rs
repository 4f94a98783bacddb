use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Number of male members in every matching
pub const MALES_PER_MATCHING: usize = 3;

/// Body of `PATCH /admin/members/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    #[validate(length(min = 1))]
    pub status: String,
}

/// Body of `POST /admin/members/matching`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchingRequest {
    pub female_member_id: i64,
    #[validate(length(equal = 3), custom(function = "distinct_ids"))]
    pub male_member_ids: Vec<i64>,
}

#[allow(clippy::ptr_arg)]
fn distinct_ids(ids: &Vec<i64>) -> Result<(), ValidationError> {
    let mut seen = ids.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != ids.len() {
        return Err(ValidationError::new("duplicate_member_id"));
    }
    Ok(())
}

/// Keyword search form on the approval tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub keyword: String,
}

/// Hidden fields posted when opening the status modal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusModalForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_status: String,
}

/// Status picked in the status modal. Absent when no option was offered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusChoiceForm {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectFemaleForm {
    #[serde(default)]
    pub name: String,
}

/// Checkbox state posted by candidate toggles and the select-all control
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub checked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_request_requires_three_distinct_ids() {
        let ok = CreateMatchingRequest { female_member_id: 7, male_member_ids: vec![1, 2, 3] };
        assert!(ok.validate().is_ok());

        let short = CreateMatchingRequest { female_member_id: 7, male_member_ids: vec![1, 2] };
        assert!(short.validate().is_err());

        let dup = CreateMatchingRequest { female_member_id: 7, male_member_ids: vec![1, 1, 2] };
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_matching_request_wire_format() {
        let req = CreateMatchingRequest { female_member_id: 7, male_member_ids: vec![1, 2, 3] };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"femaleMemberId": 7, "maleMemberIds": [1, 2, 3]})
        );
    }
}
