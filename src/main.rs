//! Spork - render SQL queries built from typed expression trees

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use log::info;
use spork::document::{render_expression_json, QueryDocument};
use spork::expression::{col, current_row, lag, lit, unbounded_preceding, Window};
use spork::query::{Dataset, Entity, Join, Query, Selection};
use std::path::PathBuf;

/// Spork - a composable SQL query builder
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the built-in demonstration query
    Demo {
        /// Print the query document as JSON instead of SQL
        #[arg(long)]
        json: bool,
    },

    /// Render a JSON query document
    Render {
        /// Path to the document
        path: PathBuf,
    },

    /// Render a single JSON-serialized expression
    Expr {
        /// Expression as JSON text
        json: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Demo { json } => {
            let document = QueryDocument::new(demo_query()?);
            if json {
                println!("{}", document.to_json()?);
            } else {
                println!("{}", document.render()?);
            }
        }
        Command::Render { path } => {
            info!("Rendering {}", path.display());
            let document = QueryDocument::from_path(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            println!("{}", document.render().context("Failed to render query")?);
        }
        Command::Expr { json } => {
            println!(
                "{}",
                render_expression_json(&json).context("Failed to render expression")?
            );
        }
    }

    Ok(())
}

/// Builds the demonstration query
fn demo_query() -> Result<Query> {
    let selection1 = Selection::new([col("Thing").alias("Thang"), col("JustTheName")]);
    let selection2 = Selection::new([
        col("AddedColumns"),
        col("CastedColumn").cast("integer"),
        lit(1000).cast("timestamp"),
    ]);

    let window = Window::new()
        .partition_by("AircraftID")
        .order_by("UpdatedUTC", None)
        .rows_between(unbounded_preceding(), current_row() - 1)
        .context("Invalid window frame")?;
    let window_selection = Selection::new([lag(
        "ValidTo",
        Some(1),
        Some(lit("2024-05-25T00:21:21").cast("timestamp")),
    )
    .over(window)]);

    let on = col("SomeID").eq(col("SomeOtherID")) | !col("ThisAndThat").lt(col("SuchAndSuch"));
    let dataset = Dataset::new(Entity::new("Fully.Qualified.Ref").alias("fqr"))
        .join(Join::new(Entity::new("SomeDim").alias("sd"), on));

    Ok(Query::new()
        .select(selection1 + selection2 + window_selection)
        .from(dataset)
        .group_by([col("fqr.Thing"), col("fqr.thang").cast("decimal")])
        .order_by([col("DescThis").desc()]))
}
