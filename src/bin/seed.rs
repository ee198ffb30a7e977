use restaurant_orders_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    services::auth_service::ensure_staff_user,
};

const DISHES: &[(&str, &str, i64, &str)] = &[
    ("Poulet yassa", "Poulet mariné au citron et aux oignons", 1350, "Plats"),
    ("Mafé de bœuf", "Sauce arachide, riz blanc", 1450, "Plats"),
    ("Thieboudienne", "Riz au poisson et légumes", 1550, "Plats"),
    ("Accras de morue", "Six pièces, sauce piquante", 650, "Entrées"),
    ("Pastels au thon", "Quatre pièces", 600, "Entrées"),
    ("Thiakry", "Semoule de mil, lait caillé", 450, "Desserts"),
];

const EXTRAS: &[(&str, i64)] = &[
    ("Alloco", 350),
    ("Riz supplémentaire", 250),
    ("Sauce piment", 100),
    ("Jus de bissap", 300),
    ("Jus de gingembre", 300),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 1).await?;
    run_migrations(&pool).await?;

    let email = std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    let admin_id = ensure_staff_user(&pool, &email, &password).await?;

    let dishes = seed_dishes(&pool).await?;
    let extras = seed_extras(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, dishes added: {dishes}, extras added: {extras}");
    Ok(())
}

async fn seed_dishes(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for (name, description, price, category) in DISHES {
        let result = sqlx::query(
            r#"
            INSERT INTO dishes (name, description, price, category, available)
            VALUES ($1, $2, $3, $4, TRUE)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

async fn seed_extras(pool: &sqlx::PgPool) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for (name, price) in EXTRAS {
        let result = sqlx::query(
            r#"
            INSERT INTO extras (name, price, available)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(price)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}
