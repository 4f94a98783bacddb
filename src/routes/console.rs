use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder, Responder};

use crate::console::AdminConsole;
use crate::core::Tab;
use crate::models::{CheckForm, MemberStatus, SearchForm, SelectFemaleForm, StatusChoiceForm, StatusModalForm};
use crate::render;
use crate::services::{new_session_id, SessionHandle, SessionStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub console: AdminConsole,
    pub sessions: SessionStore,
    pub cookie_name: String,
    /// Absolute backend logout URL the console hands the browser over to
    pub logout_url: String,
}

/// Configure all console routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(console_page))
        .route("/state", web::get().to(console_state))
        .route("/tabs/{tab}", web::post().to(switch_tab))
        .route("/approval/search", web::post().to(search_approval))
        .route("/approval/reset", web::post().to(reset_approval))
        .route("/members/detail/close", web::post().to(close_detail))
        .route("/members/{id}/detail", web::post().to(open_detail))
        .route("/members/{id}/status", web::post().to(open_status_modal))
        .route("/status/confirm", web::post().to(confirm_status))
        .route("/status/cancel", web::post().to(cancel_status))
        .route("/matching/females/{id}/select", web::post().to(select_female))
        .route("/matching/candidates/select-all", web::post().to(select_all_males))
        .route("/matching/candidates/{id}/toggle", web::post().to(toggle_male))
        .route("/matching/confirm", web::post().to(open_matching_confirm))
        .route("/matching/confirm/cancel", web::post().to(cancel_matching_confirm))
        .route("/matching/create", web::post().to(create_matching))
        .route("/matching/back", web::post().to(back_to_females))
        .route("/logout", web::post().to(logout));
}

/// Session resolved from the request cookie
struct Session {
    id: String,
    handle: SessionHandle,
    /// No state existed for this request's cookie
    created: bool,
}

impl Session {
    /// A session created here starts on the approval tab with its list loaded,
    /// whichever route the request hit.
    async fn resolve(state: &AppState, req: &HttpRequest) -> Self {
        let id = req
            .cookie(&state.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        if let Some(id) = id {
            if let Some(handle) = state.sessions.get(&id).await {
                return Self { id, handle, created: false };
            }
        }

        let id = new_session_id();
        let handle = state.sessions.get_or_create(&id).await;
        tracing::info!("Opened console session");
        state.console.switch_tab(&handle, Tab::Approval).await;
        Self { id, handle, created: true }
    }

    fn apply_cookie(&self, state: &AppState, builder: &mut HttpResponseBuilder) {
        if self.created {
            builder.cookie(session_cookie(&state.cookie_name, &self.id));
        }
    }
}

fn session_cookie<'a>(name: &'a str, id: &'a str) -> Cookie<'a> {
    Cookie::build(name, id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// POST/redirect/GET back to the page
fn back_to_console(state: &AppState, session: &Session) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, "/console"));
    session.apply_cookie(state, &mut builder);
    builder.finish()
}

/// Render the console
async fn console_page(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;

    let html = {
        let mut console = session.handle.lock().await;
        let notice = console.take_notice();
        render::render_page(&console, notice.as_ref())
    };

    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    session.apply_cookie(&state, &mut builder);
    builder.body(html)
}

/// Session state as JSON
async fn console_state(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    let snapshot = session.handle.lock().await.clone();

    let mut builder = HttpResponse::Ok();
    session.apply_cookie(&state, &mut builder);
    builder.json(snapshot)
}

async fn switch_tab(
    state: web::Data<AppState>,
    req: HttpRequest,
    tab: web::Path<String>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.switch_tab(&session.handle, Tab::parse(&tab)).await;
    back_to_console(&state, &session)
}

async fn search_approval(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<SearchForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state
        .console
        .search_approval_members(&session.handle, &form.keyword)
        .await;
    back_to_console(&state, &session)
}

async fn reset_approval(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.search_approval_members(&session.handle, "").await;
    back_to_console(&state, &session)
}

async fn open_detail(
    state: web::Data<AppState>,
    req: HttpRequest,
    member_id: web::Path<i64>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state
        .console
        .open_member_detail(&session.handle, member_id.into_inner())
        .await;
    back_to_console(&state, &session)
}

async fn close_detail(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.close_member_detail(&session.handle).await;
    back_to_console(&state, &session)
}

async fn open_status_modal(
    state: web::Data<AppState>,
    req: HttpRequest,
    member_id: web::Path<i64>,
    form: web::Form<StatusModalForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    let current = MemberStatus::from(form.current_status.as_str());
    state
        .console
        .open_status_modal(&session.handle, member_id.into_inner(), &form.name, current)
        .await;
    back_to_console(&state, &session)
}

async fn confirm_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<StatusChoiceForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state
        .console
        .confirm_status_change(&session.handle, form.status.as_deref())
        .await;
    back_to_console(&state, &session)
}

async fn cancel_status(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.cancel_status_modal(&session.handle).await;
    back_to_console(&state, &session)
}

async fn select_female(
    state: web::Data<AppState>,
    req: HttpRequest,
    female_id: web::Path<i64>,
    form: web::Form<SelectFemaleForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state
        .console
        .select_female_member(&session.handle, female_id.into_inner(), &form.name)
        .await;
    back_to_console(&state, &session)
}

async fn toggle_male(
    state: web::Data<AppState>,
    req: HttpRequest,
    member_id: web::Path<i64>,
    form: web::Form<CheckForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state
        .console
        .toggle_male_selection(&session.handle, member_id.into_inner(), form.checked)
        .await;
    back_to_console(&state, &session)
}

async fn select_all_males(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<CheckForm>,
) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.select_all_males(&session.handle, form.checked).await;
    back_to_console(&state, &session)
}

async fn open_matching_confirm(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.open_matching_confirm_modal(&session.handle).await;
    back_to_console(&state, &session)
}

async fn cancel_matching_confirm(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.cancel_matching_confirm(&session.handle).await;
    back_to_console(&state, &session)
}

async fn create_matching(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.create_matching(&session.handle).await;
    back_to_console(&state, &session)
}

async fn back_to_females(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let session = Session::resolve(&state, &req).await;
    state.console.show_female_list(&session.handle).await;
    back_to_console(&state, &session)
}

/// Drop the session and hand the browser to the backend logout.
///
/// 307 keeps the POST method on the redirected request.
async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(&state.cookie_name) {
        state.sessions.remove(cookie.value()).await;
        tracing::info!("Console session logged out");
    }

    let mut removal = session_cookie(&state.cookie_name, "");
    removal.make_removal();

    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, state.logout_url.as_str()))
        .cookie(removal)
        .finish()
}
