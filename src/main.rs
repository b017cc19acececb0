use anyhow::Result;
use clap::{Parser, Subcommand};
use cityzilla::config::BuildConfig;
use cityzilla::pipeline;
use cityzilla::query::{parse_query, search};
use cityzilla_index::ShardReader;
use cityzilla_index::shardjson::JsonShardReader;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(version, about = "Cityzilla: static prefix-search index for communes")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Полная пересборка индекса (по умолчанию: из CZ_* переменных)
    Build {
        /// JSON-конфиг; поверх него: флаги ниже
        #[arg(long)]
        config: Option<String>,
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        out: Option<String>,
        #[arg(long, default_value_t = false)]
        pretty: bool,
        /// Запустить REPL по готовому индексу
        #[arg(long)]
        repl: bool,
    },
    /// Поиск по уже записанному каталогу индекса
    Search {
        #[arg(long)]
        dir: String,
        #[arg(long)]
        q: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Build {
            config,
            input,
            out,
            pretty,
            repl,
        } => {
            let mut cfg = match config {
                Some(p) => BuildConfig::from_json_file(p)?,
                None => BuildConfig::from_env(),
            };
            if let Some(i) = input {
                cfg.input_path = i;
            }
            if let Some(o) = out {
                cfg.output_dir = o;
            }
            cfg.pretty |= pretty;

            pipeline::run(&cfg)?;
            if repl {
                run_repl(Path::new(&cfg.output_dir))?;
            }
        }
        Cmd::Search { dir, q, limit } => {
            let reader = JsonShardReader::open_dir(Path::new(&dir))?;
            let mut query = parse_query(&q)?;
            if let Some(l) = limit {
                query.limit = l.max(1);
            }
            print_hits(&reader, &search(&reader, &query));
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_repl(dir: &Path) -> Result<()> {
    use std::io::{Write, stdin, stdout};
    let reader = JsonShardReader::open_dir(dir)?;
    tracing::info!(
        dir = %reader.dir().display(),
        grams = reader.gram_count(),
        cities = reader.city_count(),
        "index loaded"
    );
    let mut input = String::new();
    loop {
        input.clear();
        print!("query> ");
        stdout().flush().ok();
        if stdin().read_line(&mut input).is_err() {
            break;
        }
        let s = input.trim();
        if s.is_empty() || s == ":q" || s == ":quit" {
            break;
        }
        match parse_query(s) {
            Ok(q) => print_hits(&reader, &search(&reader, &q)),
            Err(e) => println!("parse error: {e}"),
        }
    }
    Ok(())
}

fn print_hits(reader: &JsonShardReader, hits: &[cityzilla_index::RankedHit]) {
    for (rank, h) in hits.iter().enumerate() {
        let slug = reader.city(h.0).map(|c| c.slug.as_str()).unwrap_or("-");
        println!("{}\t{}\t{}\t{}\t{}", rank + 1, h.0, h.1, h.2, slug);
    }
}
