use product_catalog::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    seed_products(&pool).await?;
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Ferris Mug", Some("Coffee tastes better with Ferris"), 12.0, "Kitchen"),
        ("Axum Hoodie", Some("Warm hoodie for Rustaceans"), 55.0, "Apparel"),
        ("Rust Sticker Pack", None, 5.0, "Accessories"),
        ("E-book: Async Rust", Some("Learn async Rust patterns"), 25.0, "Books"),
    ];

    let mut inserted = 0;
    for (name, desc, price, category) in products {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, category)
            SELECT $1, $2, $3, $4
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)
            "#,
        )
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(category)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!("Seeded products ({inserted} new)");
    Ok(())
}
