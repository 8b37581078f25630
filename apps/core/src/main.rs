// HGPT Pro terminal driver
// Feeds stdin lines into the chat supervisor and prints the replies.

use anyhow::{Context, Result};
use hgpt_core::fs_manager::PortablePathManager;
use hgpt_core::models::{ChatEntry, ContentType, PersonaDraft};
use hgpt_core::{ChatConfig, ChatSupervisorHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const HELP: &str = "\
Команды:
  /personas              список нейросетей
  /use <id>              выбрать нейросеть
  /new <имя> [-- типы]   создать нейросеть (типы через запятую: text,image,video,code,game)
  /random                предложить имя
  /history               история чата
  /save                  сохранить последний сгенерированный файл
  /help                  эта справка
  /quit                  выход
Любой другой текст отправляется как сообщение.";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("HGPT_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Logs go to stderr so replies on stdout stay readable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_entry(entry: &ChatEntry) {
    println!("[{}] {}", entry.author_name, entry.content);
    if let Some(preview) = &entry.preview {
        println!("{}", preview);
    }
    if let Some(url) = entry.artifact_url() {
        println!("  -> {} ({})", url, entry.content_type);
    }
}

fn parse_capabilities(raw: &str) -> Result<Vec<ContentType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
                .with_context(|| format!("Unknown content type: {}", s))
        })
        .collect()
}

/// Parses `<name> [-- types]`. The name may contain spaces.
fn parse_new_persona(rest: &str) -> Result<PersonaDraft> {
    let (name, caps) = rest.split_once("--").unwrap_or((rest, ""));
    Ok(PersonaDraft::named(name.trim()).with_capabilities(parse_capabilities(caps)?))
}

async fn handle_command(
    supervisor: &ChatSupervisorHandle,
    line: &str,
    last_saved: &mut Option<uuid::Uuid>,
) -> Result<bool> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "/quit" | "/exit" => return Ok(false),
        "/help" => println!("{}", HELP),
        "/personas" => {
            let catalog = supervisor.personas().await?;
            for persona in &catalog.personas {
                let marker = if persona.id == catalog.selected_id { "*" } else { " " };
                let badges: Vec<&str> = persona.capabilities.iter().map(|c| c.badge()).collect();
                println!(
                    "{} {:<20} {} [{}]",
                    marker,
                    persona.id,
                    persona.display_name,
                    badges.join(", ")
                );
            }
        }
        "/use" => {
            let persona = supervisor.select_persona(rest.to_string()).await?;
            println!("Выбрана нейросеть: {}", persona.display_name);
        }
        "/new" => {
            let draft = parse_new_persona(rest)?;
            let persona = supervisor.create_persona(draft).await?;
            if let Some(greeting) = supervisor.history().await?.last() {
                print_entry(greeting);
            }
            info!(persona = %persona.id, "Persona ready");
        }
        "/random" => println!("{}", PersonaDraft::random_name(&mut rand::thread_rng())),
        "/history" => {
            for entry in supervisor.history().await? {
                print_entry(&entry);
            }
        }
        "/save" => match last_saved {
            Some(id) => {
                let path = supervisor.save_entry(*id).await?;
                println!("Сохранено: {}", path.display());
            }
            None => println!("Нет файлов для сохранения."),
        },
        _ => {
            let entry = supervisor.process_message(line.to_string()).await?;
            if entry.artifact.is_some() {
                *last_saved = Some(entry.id);
            }
            print_entry(&entry);
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    if let Err(e) = PortablePathManager::init() {
        error!("Failed to initialize data directories: {}", e);
    }

    let config = ChatConfig::from_env().context("Invalid configuration")?;
    info!(
        delay_ms = config.response_delay_ms,
        policy = ?config.capability_policy,
        downloads = ?config.downloads_dir,
        "Starting HGPT Pro chat"
    );

    let supervisor = ChatSupervisorHandle::new(config).context("Failed to start chat supervisor")?;
    for entry in supervisor.history().await? {
        print_entry(&entry);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_saved = None;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = if line.starts_with('/') { line } else { "" };
        match handle_command(&supervisor, line, &mut last_saved).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!(command, "Command failed: {:#}", e);
                println!("Ошибка: {}", e);
            }
        }
    }

    supervisor.shutdown().await.ok();
    Ok(())
}
