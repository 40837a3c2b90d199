//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{AttendanceStatus, Event, Player, Session, Team};
use crate::error::AppError;
use crate::handlers::{
    AttendanceDetail, AttendanceHandler, AttendanceView, CreateEventCommand, CreateEventsResult,
    CreatePlayerCommand, CreateTeamCommand, DeclareAttendanceCommand, EventHandler, PlayerHandler,
    TeamHandler, UpdateEventCommand, UpdatePlayerCommand, UpdateTeamCommand,
};
use crate::jobs::{SweepJob, SweepReport};
use crate::repository::{UserProfile, UserRepository};

// =========================================================================
// Request types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct PlayersQuery {
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Attendance body for the path-addressed update endpoint; the player id
/// comes from the path.
#[derive(Debug, Deserialize)]
pub struct AttendanceBody {
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        // Teams
        .route("/teams", post(create_team).get(list_teams))
        .route(
            "/teams/:team_id",
            get(get_team).patch(update_team).delete(delete_team),
        )
        // Players
        .route("/players", post(create_player).get(list_players))
        .route(
            "/players/:player_id",
            get(get_player).patch(update_player).delete(delete_player),
        )
        // Events
        .route("/events", post(create_events).get(list_events))
        .route(
            "/events/:event_id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/events/:event_id/cancel", post(cancel_event))
        // Attendance
        .route(
            "/events/:event_id/attendance",
            post(submit_attendance).get(get_attendance),
        )
        .route("/events/:event_id/attendance/detail", get(attendance_detail))
        .route(
            "/events/:event_id/attendance/:player_id",
            axum::routing::patch(update_attendance).delete(remove_attendance),
        )
        // Session
        .route("/me", get(whoami))
        // Admin
        .route("/admin/sweep", post(trigger_sweep))
}

// =========================================================================
// Team endpoints
// =========================================================================

async fn create_team(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Json(command): Json<CreateTeamCommand>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    let team = TeamHandler::new(pool).create(command, &session).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

async fn list_teams(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Team>>, AppError> {
    let teams = TeamHandler::new(pool).list(&session).await?;
    Ok(Json(teams))
}

async fn get_team(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(team_id): Path<String>,
) -> Result<Json<Team>, AppError> {
    let team = TeamHandler::new(pool).get(&team_id, &session).await?;
    Ok(Json(team))
}

async fn update_team(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(team_id): Path<String>,
    Json(command): Json<UpdateTeamCommand>,
) -> Result<Json<Team>, AppError> {
    let team = TeamHandler::new(pool)
        .update(&team_id, command, &session)
        .await?;
    Ok(Json(team))
}

async fn delete_team(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(team_id): Path<String>,
) -> Result<StatusCode, AppError> {
    TeamHandler::new(pool).delete(&team_id, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Player endpoints
// =========================================================================

async fn create_player(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Json(command): Json<CreatePlayerCommand>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let player = PlayerHandler::new(pool).create(command, &session).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn list_players(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Query(query): Query<PlayersQuery>,
) -> Result<Json<Vec<Player>>, AppError> {
    let players = PlayerHandler::new(pool)
        .list(&session, query.team_id.as_deref())
        .await?;
    Ok(Json(players))
}

async fn get_player(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<Player>, AppError> {
    let player = PlayerHandler::new(pool).get(player_id, &session).await?;
    Ok(Json(player))
}

async fn update_player(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(player_id): Path<Uuid>,
    Json(command): Json<UpdatePlayerCommand>,
) -> Result<Json<Player>, AppError> {
    let player = PlayerHandler::new(pool)
        .update(player_id, command, &session)
        .await?;
    Ok(Json(player))
}

async fn delete_player(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(player_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PlayerHandler::new(pool).delete(player_id, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Event endpoints
// =========================================================================

/// Batch creation: one event per team in the command. Partial failure
/// leaves committed siblings committed; the response carries both sides.
async fn create_events(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Json(command): Json<CreateEventCommand>,
) -> Result<(StatusCode, Json<CreateEventsResult>), AppError> {
    let result = EventHandler::new(pool).create(command, &session).await?;
    let status = if result.all_failed() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(result)))
}

async fn list_events(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventHandler::new(pool).list(&session).await?;
    Ok(Json(events))
}

async fn get_event(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = EventHandler::new(pool).get(event_id, &session).await?;
    Ok(Json(event))
}

async fn update_event(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
    Json(command): Json<UpdateEventCommand>,
) -> Result<Json<Event>, AppError> {
    let event = EventHandler::new(pool)
        .update(event_id, command, &session)
        .await?;
    Ok(Json(event))
}

async fn delete_event(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    EventHandler::new(pool).delete(event_id, &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_event(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    let event = EventHandler::new(pool).cancel(event_id, &session).await?;
    Ok(Json(event))
}

// =========================================================================
// Attendance endpoints
// =========================================================================

async fn submit_attendance(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
    Json(command): Json<DeclareAttendanceCommand>,
) -> Result<(StatusCode, Json<AttendanceView>), AppError> {
    let view = AttendanceHandler::new(pool)
        .submit(event_id, command, &session)
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_attendance(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path((event_id, player_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AttendanceBody>,
) -> Result<Json<AttendanceView>, AppError> {
    let command = DeclareAttendanceCommand {
        player_id,
        status: body.status,
        notes: body.notes,
    };
    let view = AttendanceHandler::new(pool)
        .update(event_id, command, &session)
        .await?;
    Ok(Json(view))
}

async fn remove_attendance(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path((event_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AttendanceView>, AppError> {
    let view = AttendanceHandler::new(pool)
        .remove(event_id, player_id, &session)
        .await?;
    Ok(Json(view))
}

async fn get_attendance(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AttendanceView>, AppError> {
    let view = AttendanceHandler::new(pool).read(event_id, &session).await?;
    Ok(Json(view))
}

async fn attendance_detail(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<AttendanceDetail>, AppError> {
    let detail = AttendanceHandler::new(pool)
        .detail(event_id, &session)
        .await?;
    Ok(Json(detail))
}

// =========================================================================
// Session endpoints
// =========================================================================

/// Profile of the authenticated caller, so clients learn their role.
async fn whoami(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = UserRepository::new(pool).get(session.user_id).await?;
    Ok(Json(profile))
}

// =========================================================================
// Admin endpoints
// =========================================================================

/// Manual sweep trigger: runs one pass of the status transition rule and
/// reports what changed. Superadmin only.
async fn trigger_sweep(
    State(pool): State<PgPool>,
    Extension(session): Extension<Session>,
) -> Result<Json<SweepReport>, AppError> {
    if !session.role.is_superadmin() {
        return Err(AppError::Forbidden(
            "Sweep trigger requires superadmin".to_string(),
        ));
    }
    let report = SweepJob::new(pool).run_once().await;
    Ok(Json(report))
}
