use std::sync::Arc;
use trillium::Conn;
use trillium_scoped_router::{
    json, scope_fn, Error, Meta, RouteRecord, Router, RouterConnExt, UrlOptions,
};

async fn require_auth(conn: Conn) -> Conn {
    let requires_auth = conn
        .route_meta("requiresAuth")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if requires_auth && conn.headers().get_str("authorization").is_none() {
        conn.with_status(401).halt()
    } else {
        conn
    }
}

async fn show_user(conn: Conn) -> Conn {
    let user_id = conn.param("userId").unwrap_or_default();
    let response_body = format!("hello user {user_id}");
    conn.ok(response_body)
}

fn router() -> Result<Router, Error> {
    let mut router = Router::new().with_scope_separator(".");
    router.get(("Home", "/", "hello everyone"))?;

    router.scope([
        "Users".into(),
        "/users".into(),
        scope_fn(|users| {
            users.get(("Index", "/", "all users"))?;
            users.get(("View", "/:userId", show_user))?;
            Ok(())
        }),
        Meta::new().with("requiresAuth", true).into(),
    ])?;

    router.import(
        [RouteRecord::new("/docs").with_children([
            RouteRecord::new("routing")
                .with_name("Routing")
                .with_handler("routes are matched segment by segment"),
            RouteRecord::new("naming")
                .with_name("Naming")
                .with_handler("scope names compose with route names"),
        ])],
        Meta::new().with("requiresAuth", false),
    )?;

    let profile = router.url_with(
        "Users.View",
        &json!({ "userId": 1 }),
        &UrlOptions::new().with_query(json!({ "tab": "posts" })),
    )?;
    log::info!("the first user's profile lives at {profile}");

    Ok(router)
}

pub fn main() -> Result<(), Error> {
    env_logger::init();
    let router = Arc::new(router()?);
    trillium_smol::run((router.resolver(), require_auth, router));
    Ok(())
}
