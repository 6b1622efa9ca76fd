//! Database seeder for Edgevest development and testing.
//!
//! Seeds demo investment packages and a test user for local development.
//! System settings are seeded by the initial migration.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use edgevest_db::entities::{
    investment_packages,
    sea_orm_active_enums::{AccountStatus, RiskLevel},
    users,
};

/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = edgevest_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test user...");
    seed_test_user(&db).await;

    println!("Seeding investment packages...");
    seed_packages(&db).await;

    println!("Seeding complete!");
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

async fn seed_test_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(test_user_id())
        .one(db)
        .await
        .expect("query test user")
        .is_some()
    {
        println!("  test user already exists, skipping");
        return;
    }

    let now = Utc::now().into();
    users::ActiveModel {
        id: Set(test_user_id()),
        email: Set("demo@edgevest.example".to_string()),
        first_name: Set("Demo".to_string()),
        last_name: Set("Investor".to_string()),
        account_balance: Set(dec!(10000)),
        total_invested: Set(Decimal::ZERO),
        total_profit: Set(Decimal::ZERO),
        account_status: Set(AccountStatus::Active),
        referred_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert test user");
}

async fn seed_packages(db: &DatabaseConnection) {
    let existing = investment_packages::Entity::find()
        .all(db)
        .await
        .expect("query packages");
    if !existing.is_empty() {
        println!("  packages already exist, skipping");
        return;
    }

    let packages = [
        ("Starter Plan", dec!(100), dec!(1000), dec!(5), 30, RiskLevel::Low),
        ("Growth Fund", dec!(500), dec!(10000), dec!(12), 90, RiskLevel::Medium),
        ("Aggressive Yield", dec!(1000), dec!(50000), dec!(25), 180, RiskLevel::High),
    ];

    let now = Utc::now();
    for (name, min_amount, max_amount, return_rate, duration_days, risk_level) in packages {
        investment_packages::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(Some(format!(
                "{return_rate}% return over {duration_days} days"
            ))),
            min_amount: Set(min_amount),
            max_amount: Set(max_amount),
            return_rate: Set(return_rate),
            duration_days: Set(duration_days),
            risk_level: Set(risk_level),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("insert package");
    }
}
