use trillium::Conn;
use trillium_scoped_router::*;
use trillium_testing::prelude::*;

fn users_scope(router: &mut Router) {
    router
        .scope([
            "Users".into(),
            "/users".into(),
            scope_fn(|users| {
                users.get(("Index", "/", "users index"))?;
                users.get(("View", "/:userId", "user"))?;
                users.scope([
                    "Posts".into(),
                    "/:userId/posts".into(),
                    scope_fn(|posts| {
                        posts.get(("View", "/:postId", "post"))?;
                        Ok(())
                    }),
                ])?;
                Ok(())
            }),
        ])
        .unwrap();
}

#[test]
fn scope_names_compose_outer_first() {
    let mut router = Router::new();
    users_scope(&mut router);

    assert_eq!(router.named_route("UsersIndex"), Some("/users"));
    assert_eq!(router.named_route("UsersView"), Some("/users/:userId"));
    assert_eq!(
        router.named_route("UsersPostsView"),
        Some("/users/:userId/posts/:postId")
    );
}

#[test]
fn reversed_names_with_a_separator() {
    let mut router = Router::new()
        .with_scope_separator(".")
        .with_reverse_scope_naming(true);
    users_scope(&mut router);

    assert_eq!(
        router.named_routes().collect::<Vec<_>>(),
        vec![
            ("Index.Users", "/users"),
            ("View.Posts.Users", "/users/:userId/posts/:postId"),
            ("View.Users", "/users/:userId"),
        ]
    );
}

#[test]
fn unnamed_scopes_compose_an_empty_name() {
    let mut router = Router::new().with_scope_separator(".");
    router
        .scope([
            "Admin".into(),
            "/admin".into(),
            scope_fn(|admin| {
                admin.scope([
                    "/v2".into(),
                    scope_fn(|v2| {
                        v2.get(("Reports", "/reports", "reports"))?;
                        v2.get(("/unnamed", "unnamed"))?;
                        Ok(())
                    }),
                ])?;
                Ok(())
            }),
        ])
        .unwrap();

    assert_eq!(router.named_route("Admin..Reports"), Some("/admin/v2/reports"));
    assert_eq!(router.named_route("Admin.Reports"), None);
    assert_eq!(router.named_routes().count(), 1);
    assert_ok!(get("/admin/v2/unnamed").on(&router), "unnamed");
}

#[test]
fn unnamed_scopes_without_a_separator() {
    let mut router = Router::new();
    router
        .scope([
            "Admin".into(),
            "/admin".into(),
            scope_fn(|admin| {
                admin.scope([
                    "/v2".into(),
                    scope_fn(|v2| {
                        v2.get(("Reports", "/reports", "reports"))?;
                        Ok(())
                    }),
                ])?;
                Ok(())
            }),
        ])
        .unwrap();

    assert_eq!(router.named_route("AdminReports"), Some("/admin/v2/reports"));
}

#[test]
fn scope_meta_is_merged_into_routes() {
    let mut router = Router::new();
    router
        .scope([
            "Admin".into(),
            "/admin".into(),
            scope_fn(|admin| {
                assert_eq!(admin.path(), "/admin");
                assert_eq!(admin.name(), "Admin");
                admin.get((
                    "Settings",
                    "/settings",
                    "settings",
                    Meta::new().with("layout", "wide"),
                ))?;
                admin.get(("Home", "/", "home"))?;
                Ok(())
            }),
            Meta::new()
                .with("requiresAuth", true)
                .with("layout", "narrow")
                .into(),
        ])
        .unwrap();

    let settings = router.find("get", "/admin/settings").unwrap();
    assert_eq!(settings.meta().get("requiresAuth").unwrap(), true);
    assert_eq!(settings.meta().get("layout").unwrap(), "wide");

    let home = router.find("get", "/admin").unwrap();
    assert_eq!(home.meta().get("layout").unwrap(), "narrow");
}

#[test]
fn scope_errors_propagate() {
    let mut router = Router::new();
    let result = router.scope([
        "/broken".into(),
        scope_fn(|broken| {
            broken.get(("/*rest/more", "nope"))?;
            Ok(())
        }),
    ]);
    assert!(matches!(result, Err(Error::Pattern { .. })));

    let texts: [RouteArg<ScopeFn<'_>>; 3] = ["A".into(), "B".into(), "C".into()];
    assert_eq!(router.scope(texts).unwrap_err(), Error::ArgumentSequence);
}

#[test]
fn built_routers() {
    let router = Router::new()
        .with_scope_separator("::")
        .build(|root| {
            root.get(("Home", "/", "home"))?;
            root.scope([
                "Api".into(),
                "/api".into(),
                scope_fn(|api| {
                    api.post(("Create", "/things", |conn: Conn| async move {
                        conn.with_status(201).with_body("created").halt()
                    }))?;
                    Ok(())
                }),
            ])?;
            Ok(())
        })
        .unwrap();

    assert_eq!(router.url("Api::Create").unwrap(), "/api/things");
    assert_status!(post("/api/things").on(&router), 201);
    assert_ok!(get("/").on(&router), "home");
}

#[test]
fn path_prefix_applies_to_names_and_urls() {
    let mut router = Router::new().with_path_prefix("/v1/");
    users_scope(&mut router);
    assert_eq!(router.url("UsersIndex").unwrap(), "/v1/users");
    assert_ok!(get("/v1/users/3/posts/9").on(&router), "post");
}

#[test]
fn urls_without_params_are_templates() {
    let mut router = Router::new();
    users_scope(&mut router);
    assert_eq!(router.url("UsersView").unwrap(), "/users/:userId");
}

#[test]
fn urls_with_params_and_query() {
    let mut router = Router::new();
    users_scope(&mut router);

    assert_eq!(
        router
            .url_with(
                "UsersView",
                &json!({ "userId": 1 }),
                &UrlOptions::new().with_query(json!({ "active": true })),
            )
            .unwrap(),
        "/users/1?active=true"
    );

    assert_eq!(
        router
            .url_with(
                "UsersView",
                &json!({ "userId": 42 }),
                &UrlOptions::new()
                    .with_query(json!({ "sort": ["-id", "name"] }))
                    .with_encode(false),
            )
            .unwrap(),
        "/users/42?sort[]=-id&sort[]=name"
    );
}

#[test]
fn deeply_nested_params_are_substituted() {
    let mut router = Router::new();
    users_scope(&mut router);

    assert_eq!(
        router
            .url_with(
                "UsersPostsView",
                &json!({ "userId": 3, "postId": "intro" }),
                &UrlOptions::new(),
            )
            .unwrap(),
        "/users/3/posts/intro"
    );

    assert_eq!(
        router
            .url_with("UsersPostsView", &json!({ "userId": 3 }), &UrlOptions::new())
            .unwrap_err(),
        Error::MissingParameter(String::from("postId"))
    );
}

#[test]
fn urls_match_their_routes() {
    let mut router = Router::new();
    router
        .get(("Orders", "/orders/by/:userId/from/:providerName", |conn: Conn| async move {
            let user_id = conn.param("userId").unwrap_or_default().to_string();
            let provider = conn.param("providerName").unwrap_or_default().to_string();
            conn.ok(format!("{user_id} {provider}"))
        }))
        .unwrap();

    let url = router
        .url_with(
            "Orders",
            &json!({ "userId": 42, "providerName": "provider-a" }),
            &UrlOptions::new(),
        )
        .unwrap();
    assert_eq!(url, "/orders/by/42/from/provider-a");
    assert_ok!(get(url).on(&router), "42 provider-a");

    assert_eq!(
        router
            .url_with(
                "Orders",
                &json!({ "userId": 42, "providerName": "provider-a" }),
                &UrlOptions::new()
                    .with_query(json!({
                        "q": 1032503,
                        "sort": ["-id", "userId"],
                        "foo": { "bar": true, "baz": false }
                    }))
                    .with_allow_dots(true)
                    .with_encode(false),
            )
            .unwrap(),
        "/orders/by/42/from/provider-a?q=1032503&sort[]=-id&sort[]=userId&foo.bar=true&foo.baz=false"
    );
}

#[test]
fn unknown_names() {
    let router = Router::new();
    assert_eq!(
        router.url("Nope").unwrap_err(),
        Error::NamedRouteNotFound(String::from("Nope"))
    );
    assert_eq!(
        router.url("Nope").unwrap_err().to_string(),
        "named route (Nope) does not exist"
    );
}

#[test]
fn last_name_wins() {
    let mut router = Router::new();
    router
        .get(("Page", "/first", "first"))
        .unwrap()
        .get(("Page", "/second", "second"))
        .unwrap();

    assert_eq!(router.url("Page").unwrap(), "/second");
    assert_ok!(get("/first").on(&router), "first");
}

#[cfg(feature = "serde")]
#[test]
fn options_from_configuration() {
    let options: RouterOptions = serde_json::from_value(json!({
        "pathPrefix": "/api",
        "scope_separator": ".",
    }))
    .unwrap();

    assert_eq!(options.path_prefix(), "/api");
    assert_eq!(options.scope_separator(), ".");
    assert!(!options.reverse_scope_naming());

    let mut router = Router::with_options(options);
    users_scope(&mut router);
    assert_eq!(router.url("Users.Index").unwrap(), "/api/users");
}
