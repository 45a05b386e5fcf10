use product_catalog::{
    db::{create_pool, orm_from_pool, run_migrations},
    dto::products::ProductPayload,
    models::Lookup,
    services::product_service,
    state::AppState,
};

// Integration flow against Postgres: create -> search/filter -> update -> delete.
#[tokio::test]
async fn catalog_flow_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run the Postgres flow test."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let created = product_service::create(
        &state,
        ProductPayload {
            name: "Product A".into(),
            description: Some("first".into()),
            price: 10.0,
            category: "Category1".into(),
        },
    )
    .await?;
    assert!(created.id > 0);

    match product_service::get_by_id(&state, created.id).await? {
        Lookup::Found(p) => assert_eq!(p, created),
        Lookup::Absent => panic!("created product should be found"),
    }

    let hits = product_service::search(&state, "prod").await?;
    assert!(hits.iter().any(|p| p.id == created.id));

    let in_category = product_service::find_by_category(&state, "CATEGORY1").await?;
    assert_eq!(in_category.len(), 1);
    let not_prefix = product_service::find_by_category(&state, "Category").await?;
    assert!(not_prefix.is_empty());

    let updated = product_service::update(
        &state,
        created.id,
        ProductPayload {
            name: "Renamed".into(),
            description: None,
            price: 11.5,
            category: "Category2".into(),
        },
    )
    .await?;
    match updated {
        Lookup::Found(p) => {
            assert_eq!(p.name, "Renamed");
            assert_eq!(p.description, None);
            assert_eq!(p.price, 11.5);
            assert_eq!(p.category, "Category2");
        }
        Lookup::Absent => panic!("update should find the product"),
    }

    assert_eq!(
        product_service::update(
            &state,
            created.id + 1000,
            ProductPayload {
                name: "X".into(),
                description: None,
                price: 1.0,
                category: "C".into(),
            },
        )
        .await?,
        Lookup::Absent
    );

    product_service::delete(&state, created.id).await?;
    product_service::delete(&state, created.id).await?;
    assert_eq!(
        product_service::get_by_id(&state, created.id).await?,
        Lookup::Absent
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 2).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs
    sqlx::query("TRUNCATE TABLE products RESTART IDENTITY")
        .execute(&pool)
        .await?;

    Ok(AppState::with_orm(orm_from_pool(pool)))
}
