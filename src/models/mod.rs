// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Gender, MaleMember, Matching, MatchingCandidate, Member, MemberStatus};
pub use requests::{
    ChangeStatusRequest, CheckForm, CreateMatchingRequest, SearchForm, SelectFemaleForm,
    StatusChoiceForm, StatusModalForm, MALES_PER_MATCHING,
};
pub use responses::{ApiErrorBody, ErrorResponse, HealthResponse};
