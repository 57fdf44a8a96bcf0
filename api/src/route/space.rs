use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::availability::{
    add_blocked_slot, reassign_slot, remove_blocked_slot, resolve_availability,
    upsert_date_override, upsert_weekly_template,
};
use crate::handler::space::{register_space, show_space, show_space_list};

pub fn build_space_routers() -> Router<AppRegistry> {
    let spaces_routers = Router::new()
        .route("/", post(register_space))
        .route("/", get(show_space_list))
        .route("/:space_id", get(show_space))
        .route("/:space_id/availability", get(resolve_availability))
        .route(
            "/:space_id/availability/template/:day_of_week",
            put(upsert_weekly_template),
        )
        .route(
            "/:space_id/availability/overrides/:date",
            put(upsert_date_override),
        )
        .route(
            "/:space_id/availability/blocked-slots",
            post(add_blocked_slot),
        )
        .route(
            "/:space_id/availability/blocked-slots",
            delete(remove_blocked_slot),
        )
        .route(
            "/:space_id/availability/reassignments",
            post(reassign_slot),
        );

    Router::new().nest("/spaces", spaces_routers)
}
