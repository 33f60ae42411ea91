//! An interactive assistant in the terminal, built on `recall` as a library.

#[macro_use]
extern crate tracing;

mod settings;

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use recall::SessionBuilder;
use recall::core::AgentStats;
use recall::presets::{self, PERSONAS};
use recall_openai_model::OpenAIProvider;
use tokio::io::{self, AsyncBufReadExt};

use crate::settings::Settings;

const BAR_CHAR: &str = "▎";
const FALLBACK_PERSONA: &str = "motivation";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!("loaded settings: {settings:?}");

    let provider = OpenAIProvider::new(settings.provider);
    let mut builder = SessionBuilder::with_completion_service(provider);
    if let Some(max_retries) = settings.max_retries {
        builder = builder.with_max_retries(max_retries);
    }

    let mut topic = None;
    match env::args().nth(1) {
        Some(key) => {
            let Some(persona) = presets::persona(&key).or_else(|| {
                let keys: Vec<_> = PERSONAS.iter().map(|p| p.key).collect();
                println!(
                    "Unknown persona `{key}` (available: {}), going with {FALLBACK_PERSONA}.",
                    keys.join(", ")
                );
                presets::persona(FALLBACK_PERSONA)
            }) else {
                return;
            };
            println!("{} {}", "Loading:".bright_green(), persona.name.bold());
            builder = builder.with_profile(persona.profile());
            topic = Some(persona.name);
        }
        None => {
            let router = match presets::project_skills() {
                Ok(router) => router,
                Err(err) => {
                    eprintln!("{err}");
                    return;
                }
            };
            let labels: Vec<_> = router.labels().collect();
            println!(
                "{} skills: {}",
                "PM Agent ready,".bright_green(),
                labels.join(", ")
            );
            builder = builder
                .with_profile(presets::project_manager())
                .with_router(router);
        }
    }
    println!("Ask me anything! Type `quit` when done, `/stats` or `/export <path>` any time.\n");

    let mut session = builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line == "/stats" {
            print_stats(&session.stats());
            continue;
        }
        if let Some(path) = line
            .strip_prefix("/export")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            export(&session, path.trim());
            continue;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let skill_count = session.agent().skills_used().len();
        let result = session.send_message(line).await;

        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();

        match result {
            Ok(reply) => {
                let skills = session.agent().skills_used();
                if skills.len() > skill_count {
                    if let Some(skill) = skills.last() {
                        println!(
                            "{}🔧 [Using skill: {}]",
                            BAR_CHAR.bright_yellow(),
                            skill.to_uppercase()
                        );
                    }
                }
                println!("{}🤖 {}\n", BAR_CHAR.bright_cyan(), reply.bright_white());
            }
            Err(err) => {
                println!("{}⚠️  {}\n", BAR_CHAR.bright_red(), err);
            }
        }
    }

    if let Some(topic) = topic {
        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🙏 Before you go...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        let result = session.farewell(topic).await;
        progress_bar.finish_and_clear();

        match result {
            Ok(farewell) => println!("\n{farewell}\n"),
            Err(err) => warn!("no farewell: {err}"),
        }
    }

    print_stats(&session.stats());
}

fn print_stats(stats: &AgentStats) {
    println!("{}", "Session Stats:".bold());
    println!("   Profile: {}", stats.label);
    println!("   Questions asked: {}", stats.questions);
    println!("   Messages in memory: {}", stats.turns);
    if !stats.skills_used.is_empty() {
        println!(
            "   Skills used: {} ({} unique)",
            stats.skills_used.join(", "),
            stats.unique_skills
        );
    }
    println!("   Tokens used: {}", stats.usage.total);
}

fn export(session: &recall::Session, path: &str) {
    let path = if path.is_empty() { "meeting_log.txt" } else { path };
    let result =
        File::create(path).and_then(|file| session.export(BufWriter::new(file)));
    match result {
        Ok(()) => println!("📁 Conversation exported to {path}"),
        Err(err) => {
            error!("failed to export to {path}: {err}");
            println!("{}⚠️  Could not export: {err}", BAR_CHAR.bright_red());
        }
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
