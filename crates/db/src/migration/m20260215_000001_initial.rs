//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the ledger core.

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
        // PART 2: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CONTACTS_SQL).await?;
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(CARDS_SQL).await?;
        db.execute_unprepared(TAGS_SQL).await?;

        // ============================================================
        // PART 3: CHECK REGISTER
        // ============================================================
        db.execute_unprepared(CHECKS_SQL).await?;

        // ============================================================
        // PART 4: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(ENTRY_TAGS_SQL).await?;
        db.execute_unprepared(ATTACHMENTS_SQL).await?;
        db.execute_unprepared(CHECK_MOVES_SQL).await?;

        // ============================================================
        // PART 5: BALANCE CHECKPOINTS
        // ============================================================
        db.execute_unprepared(BALANCE_CHECKPOINTS_SQL).await?;

        // ============================================================
        // PART 6: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

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
-- Payment method of an entry
CREATE TYPE entry_method AS ENUM (
    'cash',
    'bank',
    'pos',
    'card',
    'check'
);

-- Operation kind of an entry
CREATE TYPE entry_kind AS ENUM (
    'cash_in',
    'cash_out',
    'bank_in',
    'bank_out',
    'pos_collection',
    'pos_commission',
    'card_expense',
    'card_payment',
    'check_settlement',
    'other'
);

-- Movement direction
CREATE TYPE entry_direction AS ENUM (
    'inflow',
    'outflow'
);

-- Outflow classification
CREATE TYPE outflow_category AS ENUM (
    'salary',
    'tax',
    'fuel',
    'rent',
    'utilities',
    'supplies',
    'maintenance',
    'fees',
    'other'
);

-- Counterparty classification
CREATE TYPE contact_kind AS ENUM (
    'customer',
    'supplier',
    'other'
);

-- Check lifecycle status
CREATE TYPE check_status AS ENUM (
    'in_safe',
    'endorsed',
    'issued',
    'paid'
);

-- Check lifecycle move action
CREATE TYPE move_action AS ENUM (
    'in',
    'out',
    'issue',
    'payment'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    display_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CONTACTS_SQL: &str = r"
CREATE TABLE contacts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    kind contact_kind NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    initial_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CARDS_SQL: &str = r"
CREATE TABLE cards (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    initial_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TAGS_SQL: &str = r"
CREATE TABLE tags (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    color VARCHAR(20),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CHECKS_SQL: &str = r"
CREATE TABLE checks (
    id UUID PRIMARY KEY,
    serial_no VARCHAR(100) NOT NULL UNIQUE,
    bank_name VARCHAR(255) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    due_date DATE NOT NULL,
    status check_status NOT NULL,
    contact_id UUID REFERENCES contacts(id),
    notes TEXT,
    issuer_label VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    seq_no BIGSERIAL NOT NULL UNIQUE,
    method entry_method NOT NULL,
    kind entry_kind NOT NULL,
    direction entry_direction NOT NULL,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount > 0),
    currency CHAR(3) NOT NULL,
    effective_date DATE NOT NULL,
    recorded_at TIMESTAMPTZ NOT NULL,
    bank_account_id UUID REFERENCES bank_accounts(id),
    card_id UUID REFERENCES cards(id),
    contact_id UUID REFERENCES contacts(id),
    check_id UUID REFERENCES checks(id),
    category outflow_category,
    description TEXT,
    metadata JSONB NOT NULL DEFAULT 'null'::jsonb,
    pos_gross NUMERIC(20, 8),
    pos_commission NUMERIC(20, 8),
    pos_net NUMERIC(20, 8),
    pos_effective_rate NUMERIC(20, 10),
    linked_entry_id UUID REFERENCES ledger_entries(id) ON DELETE SET NULL,
    created_by UUID NOT NULL REFERENCES users(id),

    -- method=check rows must reference exactly one check
    CONSTRAINT check_entries_reference_check
        CHECK ((method <> 'check') OR (check_id IS NOT NULL))
);
";

const ENTRY_TAGS_SQL: &str = r"
CREATE TABLE entry_tags (
    entry_id UUID NOT NULL REFERENCES ledger_entries(id) ON DELETE CASCADE,
    tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY (entry_id, tag_id)
);
";

const ATTACHMENTS_SQL: &str = r"
CREATE TABLE attachments (
    id UUID PRIMARY KEY,
    entry_id UUID REFERENCES ledger_entries(id) ON DELETE CASCADE,
    check_id UUID REFERENCES checks(id),
    file_path TEXT NOT NULL,
    file_name VARCHAR(255) NOT NULL,
    mime_type VARCHAR(127) NOT NULL,
    byte_size BIGINT NOT NULL,
    uploaded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- owned by exactly one of entry / check
    CONSTRAINT attachment_has_one_owner
        CHECK ((entry_id IS NULL) <> (check_id IS NULL))
);
";

const CHECK_MOVES_SQL: &str = r"
CREATE TABLE check_moves (
    id UUID PRIMARY KEY,
    check_id UUID NOT NULL REFERENCES checks(id),
    action move_action NOT NULL,
    -- the audit trail outlives hard-deleted entries
    entry_id UUID REFERENCES ledger_entries(id) ON DELETE SET NULL,
    actor_id UUID NOT NULL REFERENCES users(id),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BALANCE_CHECKPOINTS_SQL: &str = r"
CREATE TABLE balance_checkpoints (
    id UUID PRIMARY KEY,
    -- NULL marks the organization-wide cash snapshot
    bank_account_id UUID REFERENCES bank_accounts(id),
    as_of DATE NOT NULL,
    balance NUMERIC(14, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const INDEXES_SQL: &str = r"
-- The report order: the running-balance prefix sum depends on it
CREATE INDEX idx_entries_report_order
    ON ledger_entries (effective_date, recorded_at, seq_no);

CREATE INDEX idx_entries_bank_account ON ledger_entries (bank_account_id)
    WHERE bank_account_id IS NOT NULL;
CREATE INDEX idx_entries_card ON ledger_entries (card_id)
    WHERE card_id IS NOT NULL;
CREATE INDEX idx_entries_check ON ledger_entries (check_id)
    WHERE check_id IS NOT NULL;
CREATE INDEX idx_entries_method ON ledger_entries (method);

CREATE INDEX idx_checks_status ON checks (status);
CREATE INDEX idx_check_moves_check ON check_moves (check_id);
CREATE INDEX idx_attachments_entry ON attachments (entry_id)
    WHERE entry_id IS NOT NULL;
CREATE INDEX idx_attachments_check ON attachments (check_id)
    WHERE check_id IS NOT NULL;
CREATE INDEX idx_checkpoints_account_date
    ON balance_checkpoints (bank_account_id, as_of DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS balance_checkpoints;
DROP TABLE IF EXISTS check_moves;
DROP TABLE IF EXISTS attachments;
DROP TABLE IF EXISTS entry_tags;
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS checks;
DROP TABLE IF EXISTS tags;
DROP TABLE IF EXISTS cards;
DROP TABLE IF EXISTS bank_accounts;
DROP TABLE IF EXISTS contacts;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS move_action;
DROP TYPE IF EXISTS check_status;
DROP TYPE IF EXISTS contact_kind;
DROP TYPE IF EXISTS outflow_category;
DROP TYPE IF EXISTS entry_kind;
DROP TYPE IF EXISTS entry_direction;
DROP TYPE IF EXISTS entry_method;
";
