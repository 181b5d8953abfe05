//! `skillmap` command-line entry point.
//!
//! # Responsibility
//! - Load settings, start logging, open the store.
//! - Expose import/list/show/record over the core service.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use skillmap_core::db::open_db;
use skillmap_core::{
    import_skills_json, init_logging, Employee, JsonTableSource, Settings, Skills,
    SkillsListQuery, SkillsService, SqliteEmployeeRepository, SqliteSkillsRepository,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skillmap")]
#[command(version, about = "Employee skills store backed by SQLite and employee.json")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file
    #[arg(long, global = true, default_value = "skillmap.toml")]
    config: PathBuf,

    /// Database path, overrides settings and SKILLMAP_DB
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the `/skills` array of employee.json into the database
    Import {
        /// Directory holding employee.json; defaults to `json.base_dir`
        dir: Option<PathBuf>,
    },
    /// List stored skills
    List {
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        min_rating: Option<i32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show the skills row of one employee
    Show { employee_id: i64 },
    /// Record a skill for an employee, creating the employee if needed
    Record {
        employee_id: i64,
        #[arg(long = "type")]
        kind: String,
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the core library version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    if let Some(db) = cli.db {
        settings.store.db_path = db;
    }

    if let Some(dir) = settings.logging.dir.as_deref() {
        init_logging(&settings.logging.level, dir).context("starting file logging")?;
    }

    if let Commands::Version = cli.command {
        println!("skillmap_core version={}", skillmap_core::core_version());
        return Ok(());
    }

    let mut conn = open_db(&settings.store.db_path).with_context(|| {
        format!("opening database {}", settings.store.db_path.display())
    })?;

    if let Commands::Import { dir } = &cli.command {
        let base_dir = dir.clone().unwrap_or_else(|| settings.json.base_dir.clone());
        let source = JsonTableSource::for_skills(base_dir)?;
        let report = import_skills_json(&mut conn, &source)
            .with_context(|| format!("importing {}", source.endpoint_path().display()))?;
        info!(
            "event=cli_import module=cli status=ok skills_saved={}",
            report.skills_saved
        );
        println!(
            "employees_created={} employees_renamed={} skills_saved={} skipped={}",
            report.employees_created,
            report.employees_renamed,
            report.skills_saved,
            report.skipped_without_employee
        );
        return Ok(());
    }

    let service = SkillsService::new(
        SqliteEmployeeRepository::try_new(&conn)?,
        SqliteSkillsRepository::try_new(&conn)?,
    );

    match cli.command {
        Commands::List {
            kind,
            min_rating,
            limit,
            offset,
        } => {
            let query = SkillsListQuery {
                kind,
                min_rating,
                limit,
                offset,
            };
            for skills in service.list(&query)? {
                print_row(&skills);
            }
        }
        Commands::Show { employee_id } => match service.skills_for(employee_id)? {
            Some(skills) => print_row(&skills),
            None => println!("no skills for employee {employee_id}"),
        },
        Commands::Record {
            employee_id,
            kind,
            rating,
            name,
        } => {
            let employee = Employee {
                id: employee_id,
                name,
            };
            let skills = service.record_skill(employee.into_ref(), kind, rating)?;
            print_row(&skills);
        }
        Commands::Import { .. } | Commands::Version => {}
    }

    Ok(())
}

fn print_row(skills: &Skills) {
    match skills.employee() {
        Some(employee) => println!(
            "{}\t{}\t{skills}",
            employee.id,
            employee.name.as_deref().unwrap_or("-")
        ),
        None => println!("-\t-\t{skills}"),
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
