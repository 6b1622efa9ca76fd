//! Initial database migration.
//!
//! Creates all core tables, enums, indexes, and seed settings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: INVESTMENTS
        // ============================================================
        db.execute_unprepared(INVESTMENT_PACKAGES_SQL).await?;
        db.execute_unprepared(INVESTMENTS_SQL).await?;

        // ============================================================
        // PART 4: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT LOG & SETTINGS
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;
        db.execute_unprepared(SYSTEM_SETTINGS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_SETTINGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Transaction classification
CREATE TYPE transaction_type AS ENUM (
    'deposit',
    'withdrawal',
    'investment',
    'payout',
    'referral',
    'refund',
    'profit'
);

-- Transaction lifecycle; pending is the only non-terminal status
CREATE TYPE transaction_status AS ENUM (
    'pending',
    'completed',
    'failed',
    'cancelled'
);

-- Investment lifecycle
CREATE TYPE investment_status AS ENUM (
    'active',
    'completed',
    'cancelled'
);

-- Package risk classification
CREATE TYPE risk_level AS ENUM (
    'low',
    'medium',
    'high'
);

-- Accounts are soft-closed, never deleted
CREATE TYPE account_status AS ENUM (
    'active',
    'suspended',
    'closed'
);

-- Audit log actor category
CREATE TYPE actor_type AS ENUM (
    'user',
    'admin',
    'system'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(100) UNIQUE NOT NULL,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    account_balance DECIMAL(15,2) NOT NULL DEFAULT 0.00,
    total_invested DECIMAL(15,2) NOT NULL DEFAULT 0.00,
    total_profit DECIMAL(15,2) NOT NULL DEFAULT 0.00,
    account_status account_status NOT NULL DEFAULT 'active',
    referred_by UUID NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- The ledger invariant the business logic relies on
    CONSTRAINT users_balance_non_negative CHECK (account_balance >= 0)
);

-- Weak back-reference: referrers are never deleted, but closing an account
-- must not cascade into its referees
CREATE INDEX idx_users_referred_by ON users (referred_by);
";

const INVESTMENT_PACKAGES_SQL: &str = r"
CREATE TABLE investment_packages (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    min_amount DECIMAL(15,2) NOT NULL,
    max_amount DECIMAL(15,2) NOT NULL,
    return_rate DECIMAL(5,2) NOT NULL,
    duration_days INTEGER NOT NULL,
    risk_level risk_level NOT NULL DEFAULT 'medium',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT packages_amount_bounds CHECK (min_amount > 0 AND max_amount >= min_amount),
    CONSTRAINT packages_duration_positive CHECK (duration_days > 0)
);
";

const INVESTMENTS_SQL: &str = r"
CREATE TABLE investments (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id),
    package_id UUID NOT NULL REFERENCES investment_packages(id),
    amount DECIMAL(15,2) NOT NULL,
    expected_return DECIMAL(15,2) NOT NULL,
    current_value DECIMAL(15,2) NOT NULL,
    status investment_status NOT NULL DEFAULT 'active',
    start_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    end_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_investments_user ON investments (user_id, created_at DESC);

-- The maturity batch query: active investments past their end date
CREATE INDEX idx_investments_maturity ON investments (end_date) WHERE status = 'active';
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id),
    type transaction_type NOT NULL,
    amount DECIMAL(15,2) NOT NULL,
    currency VARCHAR(10) NOT NULL DEFAULT 'USD',
    status transaction_status NOT NULL DEFAULT 'pending',
    description TEXT,
    reference_id UUID NULL,
    payment_method TEXT,
    wallet_address TEXT,
    transaction_hash TEXT,
    notes TEXT,
    fees DECIMAL(15,2) NOT NULL DEFAULT 0.00,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT transactions_amount_positive CHECK (amount >= 0),
    CONSTRAINT transactions_fees_non_negative CHECK (fees >= 0)
);

CREATE INDEX idx_transactions_user ON transactions (user_id, created_at DESC);
CREATE INDEX idx_transactions_status ON transactions (status);

-- Webhook matching: one-time deposit addresses of pending deposits
CREATE INDEX idx_transactions_wallet_address
    ON transactions (wallet_address) WHERE status = 'pending' AND type = 'deposit';

-- At most one referral bonus per referred user, enforced by the store
-- rather than a count-based heuristic
CREATE UNIQUE INDEX uq_transactions_referral_once
    ON transactions (reference_id) WHERE type = 'referral';
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY,
    actor_type actor_type NOT NULL,
    actor_id UUID NULL,
    action VARCHAR(255) NOT NULL,
    entity_type VARCHAR(100) NOT NULL,
    entity_id UUID NULL,
    old_values JSONB,
    new_values JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_entity ON audit_logs (entity_type, entity_id, created_at DESC);
";

const SYSTEM_SETTINGS_SQL: &str = r"
CREATE TABLE system_settings (
    setting_key VARCHAR(255) PRIMARY KEY,
    setting_value TEXT NOT NULL,
    description TEXT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const SEED_SETTINGS_SQL: &str = r"
INSERT INTO system_settings (setting_key, setting_value, description) VALUES
    ('min_deposit_amount', '100', 'Minimum deposit amount in USD'),
    ('min_withdrawal_amount', '50', 'Minimum withdrawal amount in USD'),
    ('withdrawal_fee_percentage', '0.5', 'Fee charged on withdrawals, percent'),
    ('referral_bonus_percentage', '5', 'Bonus awarded to referrers on the first completed deposit, percent'),
    ('min_crypto_confirmations', '3', 'Minimum confirmations for crypto deposits'),
    ('crypto_webhook_secret', 'default-secret-change-me', 'Secret for verifying crypto webhooks')
ON CONFLICT (setting_key) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs;
DROP TABLE IF EXISTS system_settings;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS investments;
DROP TABLE IF EXISTS investment_packages;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS actor_type;
DROP TYPE IF EXISTS account_status;
DROP TYPE IF EXISTS risk_level;
DROP TYPE IF EXISTS investment_status;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_type;
";
