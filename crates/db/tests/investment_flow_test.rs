//! Integration tests for the investment lifecycle and maturity payout.

mod common;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};

use edgevest_db::entities::{investments, sea_orm_active_enums::InvestmentStatus};
use edgevest_db::{InvestmentRepository, StoreError, UserRepository};

use common::{create_package, create_user, setup};

#[tokio::test]
async fn investment_end_to_end_scenario() {
    let Some(db) = setup().await else { return };
    let repo = InvestmentRepository::new(db.clone());
    let users = UserRepository::new(db.clone());

    // $2000 balance, $500 into a 10% / 30-day package.
    let user = create_user(&db, dec!(2000), None).await;
    let package = create_package(&db).await;

    let (investment, _event) = repo
        .create(user.id, package.id, dec!(500))
        .await
        .expect("create investment");
    assert_eq!(investment.expected_return, dec!(50));
    assert_eq!(investment.status, InvestmentStatus::Active);

    let after_create = users.find_by_id(user.id).await.expect("reload user");
    assert_eq!(after_create.account_balance, dec!(1500));
    assert_eq!(after_create.total_invested, dec!(500));

    // Fast-forward: pretend the term elapsed.
    let mut active: investments::ActiveModel = investment.clone().into();
    active.end_date = Set((Utc::now() - Duration::hours(1)).into());
    active.update(&db).await.expect("backdate end_date");

    let now = Utc::now();
    let matured = repo.find_matured(now).await.expect("find matured");
    assert!(matured.iter().any(|row| row.id == investment.id));

    let payout = repo
        .complete_matured(investment.id, now)
        .await
        .expect("complete matured")
        .expect("payout produced");
    assert_eq!(payout.payout, dec!(550));

    let after_payout = users.find_by_id(user.id).await.expect("reload user");
    assert_eq!(after_payout.account_balance, dec!(2050));
    assert_eq!(after_payout.total_invested, dec!(0));
    assert_eq!(after_payout.total_profit, dec!(50));

    // Second run: the guard sees a completed row and does nothing.
    let rerun = repo
        .complete_matured(investment.id, now)
        .await
        .expect("rerun batch");
    assert!(rerun.is_none());

    let unchanged = users.find_by_id(user.id).await.expect("reload user");
    assert_eq!(unchanged.account_balance, dec!(2050));
}

#[tokio::test]
async fn investment_bounds_and_balance_enforced() {
    let Some(db) = setup().await else { return };
    let repo = InvestmentRepository::new(db.clone());

    let user = create_user(&db, dec!(2000), None).await;
    let package = create_package(&db).await; // $100-$1000

    let too_low = repo.create(user.id, package.id, dec!(50)).await;
    assert!(matches!(too_low, Err(StoreError::Investment(_))));

    let too_high = repo.create(user.id, package.id, dec!(2000)).await;
    assert!(matches!(too_high, Err(StoreError::Investment(_))));

    let poor = create_user(&db, dec!(100), None).await;
    let broke = repo.create(poor.id, package.id, dec!(500)).await;
    assert!(matches!(broke, Err(StoreError::Ledger(_))));
}

#[tokio::test]
async fn cancellation_window_is_enforced() {
    let Some(db) = setup().await else { return };
    let repo = InvestmentRepository::new(db.clone());
    let users = UserRepository::new(db.clone());

    let user = create_user(&db, dec!(1000), None).await;
    let package = create_package(&db).await;

    // 23 hours old: cancellable, refund restores the balance.
    let (investment, _) = repo
        .create(user.id, package.id, dec!(300))
        .await
        .expect("create investment");
    let mut active: investments::ActiveModel = investment.clone().into();
    active.created_at = Set((Utc::now() - Duration::hours(23)).into());
    active.update(&db).await.expect("backdate created_at");

    let cancelled = repo.cancel(investment.id, user.id).await.expect("cancel");
    assert_eq!(cancelled.status, InvestmentStatus::Cancelled);

    let refreshed = users.find_by_id(user.id).await.expect("reload user");
    assert_eq!(refreshed.account_balance, dec!(1000));
    assert_eq!(refreshed.total_invested, dec!(0));

    // 25 hours old: outside the window.
    let (stale, _) = repo
        .create(user.id, package.id, dec!(300))
        .await
        .expect("create investment");
    let mut active: investments::ActiveModel = stale.clone().into();
    active.created_at = Set((Utc::now() - Duration::hours(25)).into());
    active.update(&db).await.expect("backdate created_at");

    let result = repo.cancel(stale.id, user.id).await;
    assert!(matches!(result, Err(StoreError::Investment(_))));

    // A terminal investment cannot be cancelled again.
    let again = repo.cancel(investment.id, user.id).await;
    assert!(matches!(again, Err(StoreError::Investment(_))));
}
