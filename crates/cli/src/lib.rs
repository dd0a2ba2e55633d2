use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::Project;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use taxonomy_corpus::KeywordStats;
use taxonomy_graph::{Classifier, ClassificationNode, Coverage, TopicChain, TopicHierarchyNode};

mod config;
mod html;
mod render;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
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
#[command(name = "taxonomy")]
#[command(about = "Build a topic classification tree from keyword-tagged papers", long_about = None)]
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
}

#[derive(Subcommand)]
enum Commands {
    /// Build the classification tree for the configured topic
    Classify(ClassifyArgs),

    /// Print the topic hierarchy and every paper's topic chains
    Topics(TopicsArgs),

    /// List keywords with their paper counts and co-occurring keywords
    #[command(name = "inspect-keywords")]
    InspectKeywords(InspectArgs),
}

#[derive(Args)]
struct ClassifyArgs {
    /// Project config file (JSON or TOML)
    #[arg(long)]
    config: PathBuf,

    /// Directory for the HTML tree (created if missing)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TopicsArgs {
    /// Project config file (JSON or TOML)
    #[arg(long)]
    config: PathBuf,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Project config file (JSON or TOML)
    #[arg(long)]
    config: PathBuf,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    topic: &'a str,
    coverage: Coverage,
    coverage_ratio: f64,
    missed_papers: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<PathBuf>,
    tree: &'a ClassificationNode,
}

#[derive(Serialize)]
struct PaperChains<'a> {
    reference_index: u32,
    title: &'a str,
    chains: Vec<&'a TopicChain>,
}

#[derive(Serialize)]
struct TopicsOutput<'a> {
    hierarchy: &'a TopicHierarchyNode,
    papers: Vec<PaperChains<'a>>,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    total_papers: usize,
    keywords: &'a [KeywordStats],
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Classify(args) => args.json,
        Commands::Topics(args) => args.json,
        Commands::InspectKeywords(args) => args.json,
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

    match cli.command {
        Commands::Classify(args) => run_classify(args)?,
        Commands::Topics(args) => run_topics(args)?,
        Commands::InspectKeywords(args) => run_inspect(args)?,
    }

    Ok(())
}

fn classifier(project: &Project) -> Result<Classifier> {
    Classifier::new(project.config.classification(), project.priorities())
        .context("Invalid classification settings")
}

fn run_classify(args: ClassifyArgs) -> Result<()> {
    let project = Project::open(&args.config)?;
    let classification = classifier(&project)?
        .classify(&project.corpus.index)
        .context("Failed to build classification tree")?;

    let html = match &args.out {
        Some(dir) => Some(html::write_page(
            dir,
            &classification.tree,
            &project.corpus.index,
        )?),
        None => None,
    };

    if args.json {
        let output = ClassifyOutput {
            topic: &classification.tree.topic,
            coverage: classification.coverage,
            coverage_ratio: classification.coverage.ratio(),
            missed_papers: project
                .corpus
                .missed
                .iter()
                .map(|p| p.reference_index)
                .collect(),
            html,
            tree: &classification.tree,
        };
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&output)?))?;
    } else {
        let mut text =
            render::render_coverage(&classification.tree.topic, &classification.coverage);
        text.push_str("================\n");
        text.push_str(&render::render_classification_tree(&classification.tree));
        if let Some(path) = html {
            text.push_str(&format!("HTML: {}\n", path.display()));
        }
        print_stdout(&text)?;
    }

    Ok(())
}

fn run_topics(args: TopicsArgs) -> Result<()> {
    let project = Project::open(&args.config)?;
    let classifier = classifier(&project)?;
    let hierarchy = classifier.topic_tree(&project.corpus.index);
    let chains = taxonomy_graph::collect_per_paper_chains(&hierarchy);

    if args.json {
        let papers = chains
            .iter()
            .map(|(paper, paper_chains)| {
                let mut ordered: Vec<&TopicChain> = paper_chains.iter().collect();
                ordered.sort_by_key(|chain| chain.len());
                PaperChains {
                    reference_index: paper.reference_index,
                    title: paper.display_title(),
                    chains: ordered,
                }
            })
            .collect();
        let output = TopicsOutput {
            hierarchy: &hierarchy,
            papers,
        };
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&output)?))?;
    } else {
        let mut text = render::render_topic_tree(&hierarchy);
        text.push_str("================\n");
        text.push_str(&render::render_paper_chains(&chains));
        print_stdout(&text)?;
    }

    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let project = Project::open(&args.config)?;
    let stats = project.corpus.index.keyword_stats();

    if args.json {
        let output = InspectOutput {
            total_papers: project.corpus.index.len(),
            keywords: &stats,
        };
        print_stdout(&format!("{}\n", serde_json::to_string_pretty(&output)?))?;
    } else {
        print_stdout(&render::render_keyword_stats(&stats))?;
    }

    Ok(())
}
