use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use console::style;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use orion_auth::IdentityClient;
use orion_core::engine::{Engine, Reply};
use orion_core::{load_main_config, load_persona, MainConfig};
use orion_memory::ChronoVault;
use orion_provider::{GeminiClient, ImagenClient};
use orion_schema::SessionIdentity;
use orion_voice::{HostSynth, SilentSpeech, Speech, VoiceProfile};

#[derive(Parser)]
#[command(name = "orion", version, about = "Orion sentient companion console")]
struct Cli {
    #[arg(
        long,
        default_value = "~/.orion",
        help = "Config root directory (contains config/ and prompts/)"
    )]
    config_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Interactive console session with Orion")]
    Chat,
    #[command(about = "Send a single command and print the reply")]
    Ask {
        #[arg(help = "Command text")]
        prompt: String,
    },
    #[command(about = "List memory fragments stored in the Chrono Vault")]
    Memories,
    #[command(about = "Validate config files")]
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Expand ~ to home directory
    if cli.config_root.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            cli.config_root = home.join(
                cli.config_root
                    .strip_prefix("~")
                    .unwrap_or(&cli.config_root),
            );
        }
    }

    let log_dir = cli.config_root.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "orion.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Validate => {
            let config = load_main_config(&cli.config_root)?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Config valid.");
            } else {
                for issue in &issues {
                    println!("- {issue}");
                }
                bail!("{} config issue(s) found", issues.len());
            }
        }
        Commands::Chat => {
            let mut engine = bootstrap(&cli.config_root).await?;
            run_console(&mut engine).await?;
        }
        Commands::Ask { prompt } => {
            let mut engine = bootstrap(&cli.config_root).await?;
            if let Some(reply) = engine.handle_command(&prompt).await {
                print_reply(&reply)?;
            }
        }
        Commands::Memories => {
            let engine = bootstrap(&cli.config_root).await?;
            let fragments = engine.memories().await;
            if fragments.is_empty() {
                println!("The Chrono Vault is empty.");
            } else {
                for fragment in fragments {
                    println!(
                        "{} [{}] {}",
                        fragment.created_at.to_rfc3339(),
                        fragment.kind,
                        fragment.content
                    );
                }
            }
        }
    }

    Ok(())
}

async fn bootstrap(root: &Path) -> Result<Engine> {
    let config = load_main_config(root)?;
    let persona = load_persona(root);

    let api_key = config
        .provider
        .resolve_api_key()
        .context("no API key: set provider.api_key or ORION_API_KEY")?;

    let mut gemini = GeminiClient::new(&api_key, &config.provider.completion_model);
    let mut imagen = ImagenClient::new(&api_key, &config.provider.image_model);
    if let Some(base_url) = &config.provider.base_url {
        gemini = gemini.with_base_url(base_url);
        imagen = imagen.with_base_url(base_url);
    }

    let identity = establish_identity(&config, &api_key).await;
    let vault = build_vault(&config);
    let speech = build_speech(&config);

    Ok(Engine::new(persona, gemini, imagen, vault, identity, speech))
}

/// Bootstrap failure is deliberately non-fatal: the session continues
/// anonymously and the vault stays inert.
async fn establish_identity(config: &MainConfig, api_key: &str) -> SessionIdentity {
    if !config.auth.enabled {
        return SessionIdentity::anonymous();
    }
    let mut client = IdentityClient::new(api_key);
    if let Some(base_url) = &config.auth.base_url {
        client = client.with_base_url(base_url);
    }
    match client.bootstrap(config.auth.custom_token.as_deref()).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("identity bootstrap failed, continuing anonymously: {e}");
            SessionIdentity::anonymous()
        }
    }
}

fn build_vault(config: &MainConfig) -> Option<ChronoVault> {
    if !config.vault.enabled {
        return None;
    }
    let Some(base_url) = &config.vault.base_url else {
        tracing::warn!("vault enabled but vault.base_url not set, memories disabled");
        return None;
    };
    Some(
        ChronoVault::new(base_url, &config.app.app_id)
            .with_poll_interval(Duration::from_secs(config.vault.poll_interval_secs.max(1))),
    )
}

fn build_speech(config: &MainConfig) -> Box<dyn Speech> {
    if !config.voice.enabled {
        return Box::new(SilentSpeech);
    }
    let profile = VoiceProfile {
        voice: config.voice.voice.clone(),
        locale: config.voice.locale.clone(),
    };
    if let Some(program) = &config.voice.program {
        return Box::new(HostSynth::new(program, profile));
    }
    match HostSynth::detect(profile) {
        Some(synth) => Box::new(synth),
        None => {
            tracing::warn!("no speech synthesizer found on host, voice disabled");
            Box::new(SilentSpeech)
        }
    }
}

async fn run_console(engine: &mut Engine) -> Result<()> {
    println!(
        "{}",
        style("Orion console. Type /quit to exit, /reset to recalibrate.").dim()
    );
    println!("{}", style(orion_core::GREETING).cyan());

    let stdin = std::io::stdin();
    loop {
        print!("{} ", style("Commander>").green().bold());
        std::io::stdout().flush()?;
        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "/quit" | "quit" | "exit" => break,
            "/reset" => {
                println!("{}", style(engine.reset()).cyan());
                continue;
            }
            "/clear-logs" => {
                println!("{}", style(engine.clear_logs()).cyan());
                continue;
            }
            "/logs" => {
                for entry in engine.logs().entries() {
                    println!(
                        "{} {} {}",
                        style(entry.at.format("%H:%M:%S")).dim(),
                        style(format!("{}:", entry.sender)).bold(),
                        entry.message
                    );
                }
                continue;
            }
            "/memories" => {
                let fragments = engine.memories().await;
                if fragments.is_empty() {
                    println!("The Chrono Vault is empty.");
                }
                for fragment in fragments {
                    println!(
                        "{} [{}] {}",
                        style(fragment.created_at.to_rfc3339()).dim(),
                        fragment.kind,
                        fragment.content
                    );
                }
                continue;
            }
            _ => {}
        }

        if let Some(reply) = engine.handle_command(input).await {
            print_reply(&reply)?;
        }
    }

    Ok(())
}

fn print_reply(reply: &Reply) -> Result<()> {
    println!("{} {}", style("Orion>").cyan().bold(), reply.text);
    if let Some(image) = &reply.image {
        let filename = format!(
            "Orion_Generated_Image_{}.png",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, image)
            .with_context(|| format!("writing image to {filename}"))?;
        println!("{}", style(format!("Saved image to {filename}")).dim());
    }
    Ok(())
}
