use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use jobscout::extractor::{analyze_document, ExtractionResult, Extractor};
use jobscout::fetcher::webdriver::WebDriverBrowser;
use jobscout::fetcher::{Document, FetchOptions, Fetcher};
use jobscout::settings::Settings;
use jobscout::tracker::{self, ApplicationEmail};
use jobscout::{db, gap};

#[derive(Parser)]
#[command(name = "jobscout", about = "Job posting scraper and keyword extractor")]
struct Cli {
    /// Settings file (default: ./jobscout.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape job URLs and print their keywords
    Extract {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Browsers running in parallel
        #[arg(short, long)]
        workers: Option<usize>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scrape every bookmarked URL and store its skills
    Sync {
        #[arg(short, long)]
        workers: Option<usize>,
        /// Max bookmarks to process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract keywords from saved job description files
    Analyze {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Bookmark a job URL
    Add {
        url: String,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Compare bookmarked job skills against a resume
    Gap {
        /// Resume as PDF, DOCX or plain text
        resume: PathBuf,
    },
    /// Read company, role and status from a recruiter email
    Classify {
        #[arg(short, long)]
        subject: String,
        #[arg(long, default_value = "")]
        sender: String,
        /// File holding the email body
        body: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    elapsed_ms: u128,
    results: BTreeMap<String, ExtractionResult>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    info!(?settings, "Loaded settings");

    let result = match cli.command {
        Commands::Extract { urls, workers, json } => {
            let extractor = build_extractor(&settings)?;
            let workers = workers.unwrap_or(settings.workers);
            let started = Instant::now();
            let results = extractor.extract_many(urls, workers).await;

            if json {
                print_json(&results, started)?;
            } else {
                print_summary(&results);
            }
            Ok(())
        }
        Commands::Sync { workers, limit } => {
            let conn = db::connect(&settings.database_path)?;
            db::init_schema(&conn)?;
            db::ensure_skills_column(&conn)?;
            let urls = db::fetch_job_urls(&conn, limit)?;
            if urls.is_empty() {
                println!("No job URLs found in the database.");
                return Ok(());
            }

            println!("Extracting {} job pages...", urls.len());
            let extractor = build_extractor(&settings)?;
            let results = extractor
                .extract_many(urls, workers.unwrap_or(settings.workers))
                .await;
            print_summary(&results);

            let mut saved = 0usize;
            for result in results.values().filter(|r| r.description.is_some()) {
                saved += db::save_skills(&conn, &result.url, &result.skills())?;
            }
            println!("\nSaved skills for {} of {} bookmarks.", saved, results.len());
            Ok(())
        }
        Commands::Analyze { files, json } => {
            let started = Instant::now();
            let results = analyze_files(&files, &settings)?;
            if json {
                print_json(&results, started)?;
            } else {
                print_summary(&results);
            }
            Ok(())
        }
        Commands::Add { url, title } => {
            let conn = db::connect(&settings.database_path)?;
            db::init_schema(&conn)?;
            if db::insert_bookmark(&conn, &url, title.as_deref())? == 0 {
                println!("Bookmark already exists: {}", url);
            } else {
                println!("Bookmark saved: {}", url);
            }
            Ok(())
        }
        Commands::Gap { resume } => {
            let conn = db::connect(&settings.database_path)?;
            db::init_schema(&conn)?;
            db::ensure_skills_column(&conn)?;
            let job_skills = db::fetch_job_skills(&conn)?;
            let text = gap::resume_text(&resume)?;
            print_resume_skills(&gap::extract_resume_skills(&text));
            let analysis = gap::skill_gap(&job_skills, &gap::resume_words(&text));

            println!("\nSkill gap per job link:");
            for (url, missing) in &analysis {
                println!("\nJob URL: {}", url);
                if missing.is_empty() {
                    println!("No missing skills for this job.");
                } else {
                    println!("Missing skills: {}", missing.join(", "));
                }
            }
            Ok(())
        }
        Commands::Classify {
            subject,
            sender,
            body,
            json,
        } => {
            let body = match body {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => String::new(),
            };
            let application = tracker::classify(&ApplicationEmail {
                sender,
                subject,
                body,
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&application)?);
            } else {
                let company = application.company.as_deref().unwrap_or("Unknown Company");
                println!("Company: {}", company);
                println!("Role: {}", application.role.unwrap_or("Unknown Role"));
                println!("Status: {}", application.status);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn build_extractor(settings: &Settings) -> Result<Extractor> {
    let browser = WebDriverBrowser::new(settings).context("Failed to set up webdriver client")?;
    let fetcher = Fetcher::new(Arc::new(browser), FetchOptions::from(settings));
    Ok(Extractor::new(
        fetcher,
        settings.heading_keywords.clone(),
        settings.keywords,
    ))
}

/// Run the text half of the pipeline over local files, in parallel.
fn analyze_files(
    files: &[PathBuf],
    settings: &Settings,
) -> Result<HashMap<String, ExtractionResult>> {
    files
        .par_iter()
        .map(|path| -> Result<(String, ExtractionResult)> {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let doc = Document {
                url: path.display().to_string(),
                title: None,
                body_text: Some(text).filter(|t| !t.trim().is_empty()),
            };
            let result = analyze_document(doc, &settings.heading_keywords, &settings.keywords);
            Ok((result.url.clone(), result))
        })
        .collect()
}

fn print_json(results: &HashMap<String, ExtractionResult>, started: Instant) -> Result<()> {
    let report = Report {
        generated_at: Utc::now(),
        elapsed_ms: started.elapsed().as_millis(),
        results: results
            .iter()
            .map(|(url, r)| (url.clone(), r.clone()))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_summary(results: &HashMap<String, ExtractionResult>) {
    let mut urls: Vec<&String> = results.keys().collect();
    urls.sort();

    println!("\nSummary:");
    for url in urls {
        let r = &results[url];
        if r.description.is_some() {
            println!("\nJob Title: {}", r.title.as_deref().unwrap_or("-"));
            println!("URL: {}", truncate(url, 100));
            println!("Description Keywords: {}", r.description_keywords.join(", "));
            println!("Requirements Keywords: {}", r.requirements_keywords.join(", "));
        } else {
            println!("\nFailed - {}", truncate(url, 100));
            println!("Title (if found): {}", r.title.as_deref().unwrap_or("-"));
        }
    }
}

fn print_resume_skills(skills: &gap::ResumeSkills) {
    println!("Resume skills ({}):", skills.len());
    let mut area = "";
    for t in &skills.technical {
        if t.area != area {
            area = t.area;
            println!("  {}:", area);
        }
        println!("    {}", t.skill);
    }
    if !skills.soft.is_empty() {
        println!("  soft skills: {}", skills.soft.join(", "));
    }
    if !skills.certifications.is_empty() {
        println!("  certifications: {}", skills.certifications.join(", "));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
