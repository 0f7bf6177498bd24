use std::fmt;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rod_contracts::chat::{
    parse_intent, ChatSession, ContentKind, RequestRouter, CHAT_HELP_COMMANDS,
};
use rod_contracts::events::EventWriter;
use rod_contracts::profile::{ImageStyle, Industry, OnboardingWizard, Purpose, UserProfile};
use rod_contracts::theme::{Theme, ThemeStore};
use rod_engine::{
    api_key, default_artifact_path, StudioClient, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "rod", version, about = "ROD Studio chat client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat(ChatArgs),
    Ask(AskArgs),
}

#[derive(Debug, Parser)]
struct ChatArgs {
    #[arg(long, default_value = "rod-studio")]
    out: PathBuf,
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
    text_model: String,
    #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
    image_model: String,
    #[arg(long)]
    skip_onboarding: bool,
}

#[derive(Debug, Parser)]
struct AskArgs {
    #[arg(long)]
    prompt: String,
    #[arg(long, default_value = "rod-studio")]
    out: PathBuf,
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
    text_model: String,
    #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
    image_model: String,
}

const MISSING_KEY_MESSAGE: &str = "Missing API key. Set OPENAI_API_KEY in your environment.";

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("rod error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Chat(args) => {
            run_chat(args)?;
            Ok(0)
        }
        Command::Ask(args) => run_ask(args),
    }
}

fn run_chat(args: ChatArgs) -> Result<()> {
    fs::create_dir_all(&args.out)?;
    let events_path = args
        .events
        .clone()
        .unwrap_or_else(|| args.out.join("events.jsonl"));

    let mut session = ChatSession::new();
    let events = EventWriter::new(&events_path, session.id());
    let theme_store = ThemeStore::new(&args.out);
    let mut theme = theme_store.load();
    events.emit_json(
        "session_started",
        json!({
            "out_dir": args.out.to_string_lossy(),
            "theme": theme.as_str(),
            "text_model": args.text_model.as_str(),
            "image_model": args.image_model.as_str(),
        }),
    )?;

    let stdin = io::stdin();
    let profile = if args.skip_onboarding {
        UserProfile::default()
    } else {
        run_onboarding(&stdin)?
    };

    let router = RequestRouter::new();
    let client = api_key().map(|key| {
        StudioClient::new(
            key,
            Some(args.text_model.clone()),
            Some(args.image_model.clone()),
        )
    });

    println!("ROD Studio chat started ({} theme). Type /help for commands.", theme.as_str());

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let input = line.trim_end_matches(['\n', '\r']);
        let intent = parse_intent(input);
        match intent.action.as_str() {
            "noop" => continue,
            "help" => {
                println!("Commands: {}", CHAT_HELP_COMMANDS.join(" "));
            }
            "quit" => break,
            "new_chat" => {
                session.clear();
                events.emit_json("conversation_cleared", json!({}))?;
                println!("Started a new chat.");
            }
            "set_theme" => {
                match resolve_theme(intent.command_args.get("theme"), theme) {
                    Some(next) => {
                        theme = next;
                        theme_store.save(theme)?;
                        events.emit_json("theme_changed", json!({ "theme": theme.as_str() }))?;
                        println!("Theme: {}", theme.as_str());
                    }
                    None => println!("/theme takes dark or light (or no value to toggle)"),
                }
            }
            "show_profile" => print_profile(&profile),
            "retry" => {
                let Some(prompt) = session.last_prompt().map(str::to_string) else {
                    println!("Nothing to retry yet.");
                    continue;
                };
                match client.as_ref() {
                    Some(client) => {
                        submit_prompt(&prompt, &mut session, &router, client, &profile, &events)?;
                    }
                    None => println!("Error: {MISSING_KEY_MESSAGE}"),
                }
            }
            "save_artifact" => {
                let Some(content) = session.last_image().map(|m| m.content.clone()) else {
                    println!("No image to save yet.");
                    continue;
                };
                let Some(client) = client.as_ref() else {
                    println!("Error: {MISSING_KEY_MESSAGE}");
                    continue;
                };
                let dest = value_as_non_empty_string(intent.command_args.get("path"))
                    .map(PathBuf::from)
                    .unwrap_or_else(|| default_artifact_path(&args.out));
                match client.save_artifact(&content, &dest) {
                    Ok(()) => {
                        events.emit_json(
                            "artifact_saved",
                            json!({ "path": dest.to_string_lossy() }),
                        )?;
                        println!("Saved image to {}", dest.display());
                    }
                    Err(err) => println!("Error: {err:#}"),
                }
            }
            "send" => {
                let prompt = intent.prompt.clone().unwrap_or_default();
                match client.as_ref() {
                    Some(client) => {
                        submit_prompt(&prompt, &mut session, &router, client, &profile, &events)?;
                    }
                    None => println!("Error: {MISSING_KEY_MESSAGE}"),
                }
            }
            "unknown" => {
                let command = intent
                    .command_args
                    .get("command")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                println!("Unknown command /{command}. Type /help for commands.");
            }
            _ => {}
        }
    }
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<i32> {
    fs::create_dir_all(&args.out)?;
    let events_path = args
        .events
        .clone()
        .unwrap_or_else(|| args.out.join("events.jsonl"));

    let mut session = ChatSession::new();
    let events = EventWriter::new(&events_path, session.id());
    events.emit_json(
        "session_started",
        json!({
            "out_dir": args.out.to_string_lossy(),
            "one_shot": true,
        }),
    )?;

    let Some(key) = api_key() else {
        println!("Error: {MISSING_KEY_MESSAGE}");
        return Ok(1);
    };
    let client = StudioClient::new(key, Some(args.text_model), Some(args.image_model));
    let router = RequestRouter::new();
    let profile = UserProfile::default();

    let appended = submit_prompt(
        &args.prompt,
        &mut session,
        &router,
        &client,
        &profile,
        &events,
    )?;
    Ok(if appended { 0 } else { 1 })
}

/// One full pass of the submission state machine: begin, exactly one
/// provider call chosen by the router, then complete or fail. Returns
/// whether an assistant message was appended.
fn submit_prompt(
    text: &str,
    session: &mut ChatSession,
    router: &RequestRouter,
    client: &StudioClient,
    profile: &UserProfile,
    events: &EventWriter,
) -> Result<bool> {
    let prompt = match session.begin(text) {
        Ok(prompt) => prompt,
        Err(rejection) => {
            println!("Error: {rejection}");
            return Ok(false);
        }
    };

    let image_request = router.is_image_request(&prompt);
    events.emit_json(
        "prompt_submitted",
        json!({
            "prompt": prompt.as_str(),
            "mode": if image_request { "image" } else { "text" },
        }),
    )?;

    if image_request {
        match client.generate_image(&prompt, profile) {
            Ok(reply) => {
                events.emit_json(
                    "image_generated",
                    json!({
                        "prompt": reply.prompt.as_str(),
                        "is_url": !reply.content.starts_with("data:"),
                    }),
                )?;
                println!("[image] {}", reply.content);
                println!("  prompt: {}", reply.prompt);
                session.complete(ContentKind::Image, reply.content, Some(reply.prompt));
            }
            Err(err) => return record_failure(session, events, &err),
        }
    } else {
        match client.chat_completion(&prompt, profile) {
            Ok(content) => {
                events.emit_json("chat_completed", json!({ "chars": content.len() }))?;
                println!("Rod: {content}");
                session.complete(ContentKind::Text, content, None);
            }
            Err(err) => return record_failure(session, events, &err),
        }
    }
    Ok(true)
}

fn record_failure(
    session: &mut ChatSession,
    events: &EventWriter,
    err: &anyhow::Error,
) -> Result<bool> {
    let message = format!("{err:#}");
    session.fail(message.clone());
    events.emit_json("submission_failed", json!({ "error": message.as_str() }))?;
    println!("Error: {message}");
    Ok(false)
}

/// `/theme` with no value toggles; `dark`/`light` set; anything else is
/// rejected so the preference never drifts to a third state.
fn resolve_theme(arg: Option<&Value>, current: Theme) -> Option<Theme> {
    match arg.and_then(Value::as_str) {
        None => Some(current.toggle()),
        Some(raw) => Theme::parse(raw),
    }
}

fn print_profile(profile: &UserProfile) {
    if *profile == UserProfile::default() {
        println!("No profile set (onboarding was skipped).");
        return;
    }
    println!("Name: {}", profile.name);
    println!(
        "Industry: {}",
        profile
            .industry
            .map(|industry| industry.label())
            .unwrap_or("-")
    );
    println!("Niche: {}", profile.niche);
    println!(
        "Purpose: {}",
        profile.purpose.map(|purpose| purpose.label()).unwrap_or("-")
    );
    println!("Goals: {}", profile.goals);
    println!(
        "Image style: {}",
        profile.image_style.map(|style| style.label()).unwrap_or("-")
    );
}

/// 4-step wizard over stdin. A blank name on step 1 (or EOF anywhere)
/// skips setup and leaves the profile empty.
fn run_onboarding(stdin: &io::Stdin) -> Result<UserProfile> {
    let mut wizard = OnboardingWizard::new();
    println!("Welcome to ROD Studio. Let's personalize your experience.");
    println!("(Press Enter on an empty name to skip setup.)");

    while !wizard.is_complete() {
        let advanced = match wizard.step() {
            1 => {
                let Some(name) = prompt_line(stdin, "Your name: ")? else {
                    wizard.skip();
                    break;
                };
                if name.trim().is_empty() {
                    wizard.skip();
                    break;
                }
                wizard.set_name(&name);
                wizard.next()
            }
            2 => {
                let Some(industry) =
                    prompt_choice(stdin, "What industry are you in?", Industry::ALL)?
                else {
                    wizard.skip();
                    break;
                };
                wizard.set_industry(industry);
                let Some(niche) = prompt_line(stdin, "Your specific niche or focus: ")? else {
                    wizard.skip();
                    break;
                };
                wizard.set_niche(&niche);
                wizard.next()
            }
            3 => {
                let Some(purpose) =
                    prompt_choice(stdin, "Primary purpose for images?", Purpose::ALL)?
                else {
                    wizard.skip();
                    break;
                };
                wizard.set_purpose(purpose);
                let Some(goals) = prompt_line(stdin, "What are your main goals? ")? else {
                    wizard.skip();
                    break;
                };
                wizard.set_goals(&goals);
                wizard.next()
            }
            _ => {
                let Some(style) =
                    prompt_choice(stdin, "Choose your image style:", ImageStyle::ALL)?
                else {
                    wizard.skip();
                    break;
                };
                wizard.set_image_style(style);
                wizard.next()
            }
        };
        if !advanced {
            println!("That step needs an answer before moving on.");
        }
    }

    let profile = wizard.finish();
    if profile == UserProfile::default() {
        println!("Setup skipped.");
    } else {
        println!("Thanks, {}! You're all set.", profile.name);
    }
    Ok(profile)
}

/// Reads one trimmed line; `None` on EOF.
fn prompt_line(stdin: &io::Stdin, label: &str) -> Result<Option<String>> {
    loop {
        print!("{label}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            return Ok(None);
        }
        return Ok(Some(line.trim().to_string()));
    }
}

/// Numbered selection over a fixed option list; `None` on EOF.
fn prompt_choice<T: Copy + fmt::Display>(
    stdin: &io::Stdin,
    label: &str,
    options: &[T],
) -> Result<Option<T>> {
    println!("{label}");
    for (idx, option) in options.iter().enumerate() {
        println!("  {}. {}", idx + 1, option);
    }
    loop {
        let Some(raw) = prompt_line(stdin, "Select a number: ")? else {
            return Ok(None);
        };
        if let Ok(pick) = raw.parse::<usize>() {
            if (1..=options.len()).contains(&pick) {
                return Ok(Some(options[pick - 1]));
            }
        }
        println!("Enter a number between 1 and {}.", options.len());
    }
}

fn value_as_non_empty_string(value: Option<&Value>) -> Option<String> {
    let raw = value?.as_str()?.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
