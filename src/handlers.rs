use crate::calendar::{date_key, derive_calendar_marks, month_grid, month_label, parse_date_key, parse_month};
use crate::errors::AppError;
use crate::models::{
    BristolType, CalendarQuery, CalendarResponse, DayCounts, DayEditRequest, DayResponse, EntryMap, Statistics,
};
use crate::session::{EditSession, existing_bristol_type};
use crate::state::AppState;
use crate::stats::{compute_statistics, counts_for_day};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::Local;

pub async fn index() -> Html<String> {
    Html(render_index(&today_string()))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = validate_date_key(&date)?;
    let store = state.store.lock().await;
    Ok(Json(to_response(store.entries(), date)))
}

pub async fn put_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<DayEditRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let date = validate_date_key(&date)?;
    let bristol_type = payload
        .bristol_type
        .map(BristolType::try_from)
        .transpose()
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    let mut store = state.store.lock().await;
    let mut session = EditSession::open(store.entries(), &date);
    session.step_to(DayCounts::new(payload.successful, payload.accidents, payload.failed));
    session.set_bristol_type(bristol_type);
    session.save(&mut *store, Local::now().naive_local()).await?;

    Ok(Json(to_response(store.entries(), date)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let selected = match query.selected.as_deref() {
        Some(value) => parse_date_key(value).ok_or_else(|| invalid_date(value))?,
        None => Local::now().date_naive(),
    };
    let month = match query.month.as_deref() {
        Some(value) => parse_month(value)
            .ok_or_else(|| AppError::bad_request(format!("month must be YYYY-MM, got '{value}'")))?,
        None => selected,
    };

    let weeks = month_grid(month)
        .into_iter()
        .map(|week| week.iter().map(|day| day.map(date_key)).collect())
        .collect();

    let store = state.store.lock().await;
    let selected = date_key(selected);
    Ok(Json(CalendarResponse {
        month: month_label(month),
        marks: derive_calendar_marks(store.entries(), &selected),
        selected,
        weeks,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    let store = state.store.lock().await;
    Ok(Json(compute_statistics(store.entries())))
}

fn to_response(entries: &EntryMap, date: String) -> DayResponse {
    let counts = counts_for_day(entries, &date);
    let day = entries.get(&date).cloned().unwrap_or_default();
    DayResponse {
        successful: counts.successful,
        accidents: counts.accidents,
        failed: counts.failed,
        bristol_type: existing_bristol_type(&day),
        entries: day,
        date,
    }
}

fn validate_date_key(value: &str) -> Result<String, AppError> {
    parse_date_key(value)
        .map(date_key)
        .ok_or_else(|| invalid_date(value))
}

fn invalid_date(value: &str) -> AppError {
    AppError::bad_request(format!("date must be YYYY-MM-DD, got '{value}'"))
}

fn today_string() -> String {
    date_key(Local::now().date_naive())
}
