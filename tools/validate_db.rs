use anyhow::Context;
use clap::Parser;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::Row;
use std::env;

/// Reports assessment outcome links that point at deleted or missing rows.
#[derive(Parser)]
#[command(name = "validate_db")]
struct Cli {
    #[arg(long)]
    database_url: Option<String>,

    /// Soft-delete the dangling links instead of only listing them
    #[arg(long)]
    fix: bool,
}

const DANGLING_ASSESSMENT: &str = r#"
SELECT ao.id, ao.assessment_id, ao.outcome_id
FROM assessments_outcomes ao
LEFT JOIN assessments a ON a.id = ao.assessment_id AND a.delete_at = 0
WHERE ao.delete_at = 0 AND a.id IS NULL
"#;

const DANGLING_OUTCOME: &str = r#"
SELECT ao.id, ao.assessment_id, ao.outcome_id
FROM assessments_outcomes ao
LEFT JOIN learning_outcomes o ON o.id = ao.outcome_id AND o.delete_at = 0
WHERE ao.delete_at = 0 AND o.id IS NULL
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let db_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .context("DATABASE_URL must be set or passed with --database-url")?;

    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    let now = chrono::Utc::now().timestamp();
    let mut fixed = 0u64;

    for (label, statement) in [
        ("deleted assessment", DANGLING_ASSESSMENT),
        ("deleted outcome", DANGLING_OUTCOME),
    ] {
        let rows = sqlx::query(statement).fetch_all(&pool).await?;

        println!("Links to a {}: {}", label, rows.len());
        for r in rows.iter() {
            let id: i64 = r.get("id");
            let assessment_id: String = r.get("assessment_id");
            let outcome_id: String = r.get("outcome_id");
            println!(
                "id: {}, assessment: {}, outcome: {}",
                id, assessment_id, outcome_id
            );
            if cli.fix {
                let result = sqlx::query(
                    "UPDATE assessments_outcomes SET delete_at = ? WHERE id = ? AND delete_at = 0",
                )
                .bind(now)
                .bind(id)
                .execute(&pool)
                .await?;
                fixed += result.rows_affected();
            }
        }
    }

    if cli.fix {
        println!("Soft-deleted {} links", fixed);
    }

    Ok(())
}
