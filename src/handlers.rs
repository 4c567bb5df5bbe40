use crate::errors::AppError;
use crate::models::{
    day_key, CalendarQuery, CalendarSnapshot, FilterRequest, HabitsView, NewHabit, NewOccurrence,
    NewTrait, OccurrenceFilter, TimeRange, TraitsView,
};
use crate::notify::Notification;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Json<CalendarSnapshot> {
    let mut session = state.session.lock().await;
    session
        .occurrences
        .fetch(TimeRange::new(query.start, query.end))
        .await;
    Json(session.occurrences.snapshot())
}

pub async fn set_filter(
    State(state): State<AppState>,
    Json(payload): Json<FilterRequest>,
) -> Json<CalendarSnapshot> {
    let mut session = state.session.lock().await;
    session.occurrences.filter_by(OccurrenceFilter {
        habit_ids: payload.habit_ids.into_iter().collect(),
        trait_ids: payload.trait_ids.into_iter().collect(),
    });
    Json(session.occurrences.snapshot())
}

pub async fn add_occurrence(
    State(state): State<AppState>,
    Json(payload): Json<NewOccurrence>,
) -> Result<Json<CalendarSnapshot>, AppError> {
    let insert = normalize_day(payload)?;
    let mut session = state.session.lock().await;
    session.occurrences.add(insert).await;
    Ok(Json(session.occurrences.snapshot()))
}

pub async fn delete_occurrence(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<CalendarSnapshot> {
    let mut session = state.session.lock().await;
    session.occurrences.remove(id).await;
    Json(session.occurrences.snapshot())
}

pub async fn list_habits(State(state): State<AppState>) -> Json<HabitsView> {
    let session = state.session.lock().await;
    Json(session.habits.snapshot())
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<Json<HabitsView>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("habit name must not be blank"));
    }

    let mut session = state.session.lock().await;
    session.habits.add(payload).await;
    Ok(Json(session.habits.snapshot()))
}

pub async fn delete_habit(State(state): State<AppState>, Path(id): Path<i64>) -> Json<HabitsView> {
    let mut session = state.session.lock().await;
    // Occurrences of the habit are dropped locally only once the backend
    // confirms the habit itself is gone.
    if session.habits.remove(id).await {
        session.occurrences.remove_by_habit(id);
    }
    Json(session.habits.snapshot())
}

pub async fn list_traits(State(state): State<AppState>) -> Json<TraitsView> {
    let session = state.session.lock().await;
    Json(session.traits.snapshot())
}

pub async fn add_trait(
    State(state): State<AppState>,
    Json(payload): Json<NewTrait>,
) -> Result<Json<TraitsView>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("trait name must not be blank"));
    }

    let mut session = state.session.lock().await;
    session.traits.add(payload).await;
    Ok(Json(session.traits.snapshot()))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifier.drain())
}

pub async fn reset(State(state): State<AppState>) -> Json<CalendarSnapshot> {
    let mut session = state.session.lock().await;
    session.occurrences.clear();
    session.habits.clear();
    session.traits.clear();
    Json(session.occurrences.snapshot())
}

fn normalize_day(mut insert: NewOccurrence) -> Result<NewOccurrence, AppError> {
    let missing = insert
        .day
        .as_deref()
        .map_or(true, |day| day.trim().is_empty());
    if missing {
        let day = day_key(insert.timestamp)
            .ok_or_else(|| AppError::bad_request("timestamp is out of range"))?;
        insert.day = Some(day);
    }
    Ok(insert)
}
