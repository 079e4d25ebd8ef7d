// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. When `reset` is true every table is dropped
/// first, which wipes all data.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    } else {
        info!("Skipping table drop (RESET_DB not set), tables are created if they don't exist");
    }

    create_user_tables(pool).await?;
    create_badge_tables(pool).await?;
    create_course_tables(pool).await?;
    create_status_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database migration completed successfully");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in ["status_checks", "courses", "badges", "users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            google_id TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL,
            name TEXT NOT NULL,
            picture TEXT NOT NULL DEFAULT '',
            about_me TEXT NOT NULL DEFAULT '',
            age INTEGER,
            created_at TEXT NOT NULL,
            last_login TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_badge_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS badges (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            course_id INTEGER NOT NULL,
            course_title TEXT NOT NULL DEFAULT '',
            course_category TEXT NOT NULL,
            badge_name TEXT NOT NULL,
            badge_description TEXT NOT NULL,
            earned_at TEXT NOT NULL,
            quiz_score INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_course_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // tags, sessions and quiz hold JSON documents
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            duration TEXT NOT NULL,
            instructor TEXT NOT NULL,
            level TEXT NOT NULL,
            category TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            sessions TEXT NOT NULL DEFAULT '[]',
            quiz TEXT NOT NULL DEFAULT '{"questions":[]}',
            created_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            published INTEGER NOT NULL DEFAULT 0,
            views INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_status_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS status_checks (
            id TEXT PRIMARY KEY,
            client_name TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        // One badge per (user, course, category); badge creation relies on it.
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_badges_unique_award ON badges(user_id, course_id, course_category)",
        "CREATE INDEX IF NOT EXISTS idx_courses_created_by ON courses(created_by)",
        "CREATE INDEX IF NOT EXISTS idx_courses_published ON courses(published, created_at)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
