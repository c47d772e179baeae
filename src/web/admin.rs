//! Admin page and settings form

use super::AppState;
use crate::error::StromError;
use crate::persistence::Settings;
use crate::render::html::{Element, el};
use axum::{
    Form,
    extract::{Query, Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

/// Usage examples listed on the admin page
const SHORTCODE_EXAMPLES: &[(&str, &str)] = &[
    (
        "[display_strom_tariffs]",
        "Display as table (default rows from settings)",
    ),
    (
        "[display_strom_tariffs rows=\"5\"]",
        "Display as table with 5 rows",
    ),
    (
        "[display_strom_tariffs layout=\"cards\"]",
        "Display as cards (card provider from settings)",
    ),
    (
        "[display_strom_tariffs layout=\"cards\" stromanbieter=\"Wien Energie\"]",
        "Display cards of a single provider",
    ),
    ("[stromgraph]", "Spot price chart for the current day"),
    ("[stromgraph range=\"range\"]", "Spot price chart over a range of days"),
];

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub updated: Option<String>,
    pub token: Option<String>,
}

/// Raw form fields; numbers arrive as text
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub api_key: String,
    pub clear_api_key: Option<String>,
    pub api_url: String,
    pub table_rows: String,
    pub card_provider: String,
}

impl SettingsForm {
    /// Merge the submitted fields over `current`.
    ///
    /// The API key is never sent back to the browser, so a blank key field
    /// keeps the stored key; only `clear_api_key` removes it.
    pub fn into_settings(self, current: &Settings) -> Settings {
        let api_key = if self.clear_api_key.is_some() {
            String::new()
        } else if self.api_key.trim().is_empty() {
            current.api_key.clone()
        } else {
            self.api_key
        };
        Settings {
            api_key,
            api_url: self.api_url,
            table_rows: absint(&self.table_rows),
            card_provider: self.card_provider,
        }
    }
}

/// Leading integer of `raw` as an absolute value; anything else is 0
pub fn absint(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let unsigned = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    let digits: String = unsigned.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Token presented with a request: `Authorization: Bearer` or `?token=`
fn presented_token(request: &Request) -> Option<String> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    bearer.or_else(|| {
        Query::<AdminQuery>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(query)| query.token)
    })
}

/// True when a browser-sent `Origin` names a different host than `Host`
fn is_cross_origin(request: &Request) -> bool {
    let Some(origin) = request.headers().get(header::ORIGIN) else {
        return false;
    };
    let origin_host = origin
        .to_str()
        .ok()
        .and_then(|o| reqwest::Url::parse(o).ok())
        .and_then(|url| {
            url.host_str()
                .map(|host| match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                })
        });
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    match (origin_host, host) {
        (Some(origin_host), Some(host)) => !origin_host.eq_ignore_ascii_case(host),
        _ => true,
    }
}

fn rejection(status: StatusCode, message: &str) -> Response {
    let body = el("div").class("error-message").text(message).render();
    (status, Html(body)).into_response()
}

/// Guard for every `/admin` route.
///
/// With `web.admin_token` set, requests must present the token. State
/// changing requests from another origin are refused either way.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let logger = crate::logging::get_logger("web");

    if let Some(expected) = state.service.config().web.admin_token.as_deref()
        && presented_token(&request).as_deref() != Some(expected)
    {
        logger.warn(&format!("Unauthorized admin request: {}", request.uri().path()));
        return rejection(StatusCode::UNAUTHORIZED, "Admin token required");
    }

    if request.method() != Method::GET && is_cross_origin(&request) {
        logger.warn("Rejected cross-origin admin request");
        return rejection(StatusCode::FORBIDDEN, "Cross-origin requests are not allowed");
    }

    next.run(request).await
}

/// Settings form target, carrying the token of an authenticated session
fn form_action(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("/admin/settings?token={}", encode_query_value(token)),
        None => "/admin/settings".to_string(),
    }
}

fn encode_query_value(value: &str) -> String {
    reqwest::Url::parse_with_params("http://localhost/", [("v", value)])
        .ok()
        .and_then(|url| url.query().map(|q| q.trim_start_matches("v=").to_string()))
        .unwrap_or_default()
}

fn redirect_target(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("/admin?updated=1&token={}", encode_query_value(token)),
        None => "/admin?updated=1".to_string(),
    }
}

pub async fn admin_page(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Html<String> {
    let settings = state.service.settings().snapshot();
    let ttl = state.service.config().cache.ttl_seconds;
    let updated = query.updated.as_deref() == Some("1");
    let action = form_action(query.token.as_deref());
    Html(render_admin_page(&settings, ttl, updated, None, &action))
}

pub async fn save_settings(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let logger = crate::logging::get_logger("web");
    let current = state.service.settings().snapshot();
    let submitted = form.into_settings(&current);

    match state.service.settings().update(submitted.clone()) {
        Ok(_) => {
            logger.info("Admin settings updated");
            Redirect::to(&redirect_target(query.token.as_deref())).into_response()
        }
        Err(e) => {
            logger.warn(&format!("Rejected settings update: {}", e));
            let status = match &e {
                StromError::Validation { .. } | StromError::InvalidInput { .. } => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let ttl = state.service.config().cache.ttl_seconds;
            let action = form_action(query.token.as_deref());
            let page = render_admin_page(&submitted, ttl, false, Some(&e), &action);
            (status, Html(page)).into_response()
        }
    }
}

/// Complete admin HTML document
pub fn render_admin_page(
    settings: &Settings,
    ttl_seconds: u64,
    updated: bool,
    error: Option<&StromError>,
    action: &str,
) -> String {
    let notice = updated.then(|| el("div").class("notice notice-success").text("Settings saved."));
    let error_box = error.map(|e| el("div").class("error-message").text(e.to_string()));

    let shortcodes = el("ul").children(SHORTCODE_EXAMPLES.iter().map(|(code, description)| {
        el("li")
            .child(el("code").text(*code))
            .text(format!(" - {}", description))
    }));

    let body = el("body").child(
        el("div")
            .class("wrap")
            .child(el("h1").text("Strom Tariffs"))
            .maybe_child(notice)
            .maybe_child(error_box)
            .child(el("h2").text("Shortcodes"))
            .child(el("p").text("Use these shortcodes to display the tariff information:"))
            .child(shortcodes)
            .child(el("h2").text("Settings"))
            .child(settings_form(settings, action))
            .child(
                el("p")
                    .class("cache-info")
                    .text(format!("Cache duration: {} seconds", ttl_seconds)),
            ),
    );

    let document = el("html")
        .attr("lang", "en")
        .child(
            el("head")
                .child(el("meta").attr("charset", "utf-8"))
                .child(el("title").text("Strom Tarif Settings")),
        )
        .child(body);
    format!("<!DOCTYPE html>{}", document.render())
}

fn settings_form(settings: &Settings, action: &str) -> Element {
    let row = |label: &'static str, input: Element| {
        el("tr")
            .child(el("th").child(el("label").text(label)))
            .child(el("td").child(input))
    };
    let input = |kind: &'static str, name: &'static str, value: String| {
        el("input")
            .attr("type", kind)
            .attr("name", name)
            .attr("id", name)
            .attr("value", value)
    };

    el("form")
        .attr("method", "post")
        .attr("action", action)
        .child(
            el("table")
                .class("form-table")
                .child(row("API Key", api_key_field(settings)))
                .child(row(
                    "API URL",
                    input("url", "api_url", settings.api_url.clone()),
                ))
                .child(row(
                    "Default Table Rows",
                    input("number", "table_rows", settings.table_rows.to_string()),
                ))
                .child(row(
                    "Provider for Cards",
                    input("text", "card_provider", settings.card_provider.clone()),
                )),
        )
        .child(
            el("button")
                .attr("type", "submit")
                .class("button button-primary")
                .text("Save Changes"),
        )
}

/// Password input that never carries the stored key
fn api_key_field(settings: &Settings) -> Element {
    let placeholder = if settings.api_key.is_empty() {
        "not set"
    } else {
        "stored; leave blank to keep"
    };
    el("span")
        .child(
            el("input")
                .attr("type", "password")
                .attr("name", "api_key")
                .attr("id", "api_key")
                .attr("value", "")
                .attr("placeholder", placeholder)
                .attr("autocomplete", "off"),
        )
        .child(
            el("label")
                .child(
                    el("input")
                        .attr("type", "checkbox")
                        .attr("name", "clear_api_key")
                        .attr("value", "1"),
                )
                .text(" Remove stored key"),
        )
}
