use {
    clap::Subcommand,
    lintel_analysis::{AnalysisRecord, AnalysisRepository, SqliteAnalysisRepository},
    lintel_config::LintelConfig,
    std::io::Write,
};

#[derive(Subcommand)]
pub enum DbAction {
    /// Create the database file and the `analyses` table if missing.
    Migrate,
    /// Print stored analyses as JSON lines, most recent first.
    List {
        /// Print at most this many records.
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn handle_db(action: DbAction, config: &LintelConfig) -> anyhow::Result<()> {
    match action {
        DbAction::Migrate => run_migrations(config).await,
        DbAction::List { limit } => list_records(config, limit).await,
    }
}

async fn run_migrations(config: &LintelConfig) -> anyhow::Result<()> {
    let path = &config.database.path;
    let pool = lintel_analysis::connect(path).await?;
    lintel_analysis::initialize(&pool).await?;
    let count = SqliteAnalysisRepository::new(pool.clone()).count().await?;
    pool.close().await;

    println!("Database ready: {} ({count} analyses)", path.display());
    Ok(())
}

async fn list_records(config: &LintelConfig, limit: Option<usize>) -> anyhow::Result<()> {
    let path = &config.database.path;
    if !path.exists() {
        eprintln!("Database not found: {}", path.display());
        return Ok(());
    }

    let pool = lintel_analysis::connect(path).await?;
    let records = SqliteAnalysisRepository::new(pool.clone()).list_all().await;
    pool.close().await;

    let mut stdout = std::io::stdout().lock();
    write_json_lines(&mut stdout, &records?, limit)?;
    Ok(())
}

fn write_json_lines(
    out: &mut impl Write,
    records: &[AnalysisRecord],
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let take = limit.unwrap_or(records.len());
    for record in records.iter().take(take) {
        serde_json::to_writer(&mut *out, record)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}
