use rocket::{catchers, routes, Build, Rocket};

pub mod broadcaster;
pub mod catchers;
pub mod cors;
pub mod error;
pub mod routes;
pub mod store;

pub use routes::AppState;
pub use shared::{models::*, fraud::*};

use crate::catchers::{bad_request, internal_error, not_found, unprocessable_entity};
use crate::cors::CORS;
use crate::routes::{all_options, get_votes, index, submit_vote, subscribe};

pub fn rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .attach(CORS)
        .manage(state)
        .mount(
            "/",
            routes![index, submit_vote, get_votes, subscribe, all_options],
        )
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unprocessable_entity,
                internal_error
            ],
        )
}
