use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use relevance_search::{
    Aggregate, Connective, DialectKind, FuzzySearch, MatcherSelector, RatingBoost, ScoreBreakdown,
    ScoreRequest, SelectQuery, WeightProfile,
};
use serde::Serialize;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "relevance")]
#[command(about = "Compile fuzzy relevance scores into SQL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Weight profile (TOML or JSON) overlaid on the builtin one
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// SQL dialect (mysql, postgres); defaults to the profile's
    #[arg(long, global = true)]
    dialect: Option<DialectKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the relevance expression for one field
    Compile(CompileArgs),

    /// Score a sample text in memory, matcher by matcher
    Explain(ExplainArgs),

    /// Print a complete SELECT filtered and ordered by relevance
    Query(QueryArgs),
}

#[derive(Args)]
struct MatcherArgs {
    /// Add the extended matchers to the standard ones
    #[arg(long, conflicts_with = "matchers")]
    extended: bool,

    /// Use only these matchers, e.g. --matcher exact=100 (repeatable)
    #[arg(long = "matcher", value_name = "KIND=WEIGHT")]
    matchers: Vec<String>,
}

impl MatcherArgs {
    fn selector(&self) -> Result<MatcherSelector> {
        MatcherSelector::parse(self.extended, &self.matchers).context("Invalid --matcher list")
    }
}

#[derive(Args)]
struct CompileArgs {
    /// Column to score, optionally qualified (table.column)
    #[arg(long)]
    field: String,

    /// Search value
    #[arg(long)]
    value: String,

    #[command(flatten)]
    matchers: MatcherArgs,

    /// Wrap the score in an aggregate function (max, min, sum, avg)
    #[arg(long)]
    aggregate: Option<Aggregate>,

    /// Table holding the rating column
    #[arg(long, requires = "rating_column")]
    rating_table: Option<String>,

    /// Numeric column added as a normalized boost
    #[arg(long, requires = "rating_table")]
    rating_column: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExplainArgs {
    /// Field value to score; omitted means NULL
    #[arg(long)]
    text: Option<String>,

    /// Search value
    #[arg(long)]
    value: String,

    #[command(flatten)]
    matchers: MatcherArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct QueryArgs {
    /// Table to select from
    #[arg(long)]
    table: String,

    /// Column to score (repeatable)
    #[arg(long = "field", required = true)]
    fields: Vec<String>,

    /// Search value
    #[arg(long)]
    value: String,

    #[command(flatten)]
    matchers: MatcherArgs,

    /// Keep rows that match any field instead of all of them
    #[arg(long)]
    any: bool,

    /// Minimum relevance every field must reach
    #[arg(long, conflicts_with = "any")]
    min_relevance: Option<u32>,

    /// Do not order by relevance
    #[arg(long)]
    no_order: bool,

    /// Group rows by this expression (repeatable); required with --matcher,
    /// whose scores are aggregated with MAX
    #[arg(long = "group-by", value_name = "EXPR")]
    group_by: Vec<String>,

    #[arg(long)]
    limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct CompileOutput {
    alias: String,
    sql: String,
    select: String,
}

#[derive(Serialize)]
struct QueryOutput {
    sql: String,
    aliases: Vec<String>,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Compile(args) => args.json,
        Commands::Explain(args) => args.json,
        Commands::Query(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let search = build_search(&cli)?;
    match cli.command {
        Commands::Compile(args) => run_compile(&search, args),
        Commands::Explain(args) => run_explain(&search, args),
        Commands::Query(args) => run_query(&search, args),
    }
}

fn build_search(cli: &Cli) -> Result<FuzzySearch> {
    let profile = match &cli.profile {
        Some(path) => WeightProfile::from_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => WeightProfile::builtin(),
    };
    log::debug!("Using weight profile '{}'", profile.name());

    let search = FuzzySearch::new(profile);
    Ok(match cli.dialect {
        Some(kind) => search.with_dialect(kind),
        None => search,
    })
}

fn run_compile(search: &FuzzySearch, args: CompileArgs) -> Result<()> {
    let mut request = ScoreRequest::new(args.field.as_str(), args.value.as_str())
        .with_selector(args.matchers.selector()?);
    if let Some(aggregate) = args.aggregate {
        request = request.with_aggregate(aggregate);
    }
    if let (Some(table), Some(column)) = (&args.rating_table, &args.rating_column) {
        let rating = RatingBoost::new(table, column).context("Invalid rating column")?;
        request = request.with_rating(rating);
    }

    let expression = search
        .score(&request)
        .with_context(|| format!("Failed to compile relevance for '{}'", args.field))?;

    if args.json {
        let output = CompileOutput {
            alias: expression.alias().to_string(),
            sql: expression.sql().to_string(),
            select: expression.to_sql(),
        };
        print_stdout(&serde_json::to_string_pretty(&output)?)
    } else {
        print_stdout(&expression.to_sql())
    }
}

fn run_explain(search: &FuzzySearch, args: ExplainArgs) -> Result<()> {
    let selector = args.matchers.selector()?;
    let breakdown = search.explain(args.text.as_deref(), &args.value, &selector)?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&breakdown)?)
    } else {
        print_stdout(&render_breakdown(&breakdown))
    }
}

fn render_breakdown(breakdown: &ScoreBreakdown) -> String {
    let width = breakdown
        .matchers
        .iter()
        .map(|m| m.kind.as_str().len())
        .max()
        .unwrap_or(0)
        .max("total".len());

    let mut lines = Vec::with_capacity(breakdown.matchers.len() + 1);
    for m in &breakdown.matchers {
        lines.push(format!(
            "{:<width$}  {:>4} / {:<4}",
            m.kind.as_str(),
            m.score,
            m.weight
        ));
    }
    lines.push(format!("{:<width$}  {:>4}", "total", breakdown.total));
    lines.join("\n")
}

fn run_query(search: &FuzzySearch, args: QueryArgs) -> Result<()> {
    let selector = args.matchers.selector()?;
    if matches!(selector, MatcherSelector::Custom(_)) && args.group_by.is_empty() {
        anyhow::bail!(
            "--matcher scores are aggregated with MAX; pass --group-by to keep one row per group"
        );
    }

    let mut query = SelectQuery::new(&args.table).context("Invalid --table")?;
    for expression in &args.group_by {
        query = query.group_by(expression.as_str());
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    let connective = if args.any {
        Connective::Or
    } else {
        Connective::And
    };
    let mut aliases = Vec::with_capacity(args.fields.len());
    search
        .scope(&mut query, |scope| {
            for field in &args.fields {
                let request = ScoreRequest::new(field.as_str(), args.value.as_str())
                    .with_selector(selector.clone());
                let expression = scope.apply(&request, connective)?;
                aliases.push(expression.alias().to_string());
            }
            Ok(())
        })
        .context("Failed to build query")?;

    if let Some(minimum) = args.min_relevance {
        for field in &args.fields {
            search.with_minimum_relevance(&mut query, field, minimum)?;
        }
    }
    if !args.no_order {
        let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
        search.order_by_fuzzy(&mut query, &fields)?;
    }

    let sql = query.to_sql(search.dialect());
    if args.json {
        print_stdout(&serde_json::to_string_pretty(&QueryOutput { sql, aliases })?)
    } else {
        print_stdout(&sql)
    }
}
