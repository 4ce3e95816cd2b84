//! Initial database migration.
//!
//! Creates the media table and every resource table. Media rows are not
//! cascaded from their owners; deletes reclaim them from application code.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: MEDIA
        // ============================================================
        db.execute_unprepared(FILES_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 3: RESOURCES
        // ============================================================
        db.execute_unprepared(PETS_SQL).await?;
        db.execute_unprepared(POSTS_SQL).await?;
        db.execute_unprepared(APPOINTMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const FILES_SQL: &str = r"
CREATE TABLE files (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    path VARCHAR(255) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(32),
    avatar_id INTEGER REFERENCES files(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_created_at ON customers(created_at);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(32),
    role VARCHAR(16) NOT NULL DEFAULT 'employee' CHECK (role IN ('employee', 'admin')),
    avatar_id INTEGER REFERENCES files(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_employees_created_at ON employees(created_at);
";

const PETS_SQL: &str = r#"
CREATE TABLE pets (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    "type" VARCHAR(64) NOT NULL,
    sex VARCHAR(16) NOT NULL,
    breed VARCHAR(128) NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    avatar_id INTEGER REFERENCES files(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_pets_owner ON pets(owner_id);
CREATE INDEX idx_pets_created_at ON pets(created_at);
"#;

const POSTS_SQL: &str = r"
CREATE TABLE posts (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255),
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    midia_id INTEGER REFERENCES files(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_posts_employee ON posts(employee_id);
CREATE INDEX idx_posts_created_at ON posts(created_at);
";

const APPOINTMENTS_SQL: &str = r"
CREATE TABLE appointments (
    id SERIAL PRIMARY KEY,
    pet_id INTEGER NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    customer_id INTEGER NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    employee_id INTEGER REFERENCES employees(id) ON DELETE SET NULL,
    date TIMESTAMPTZ NOT NULL,
    service VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_appointments_customer ON appointments(customer_id);
CREATE INDEX idx_appointments_created_at ON appointments(created_at);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS appointments;
DROP TABLE IF EXISTS posts;
DROP TABLE IF EXISTS pets;
DROP TABLE IF EXISTS employees;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS files;
";
