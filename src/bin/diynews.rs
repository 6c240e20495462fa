use anyhow::{Context, Result, anyhow, bail};
use chrono::{Datelike, Local, Utc};
use diynews::cli::{self, AccountsCommand, Command, Invocation};
use diynews::client::{SyncClient, SyncOutcome, SyncStatus};
use diynews::config::Config;
use diynews::context::{AppContext, StandardContext};
use diynews::export::events_to_ics;
use diynews::feed;
use diynews::model::Subscription;
use diynews::state::{AppState, View};
use diynews::storage::{self, LocalStorage, SubscriptionRegistry};
use diynews::views::{self, RenderOptions};
use rust_i18n::t;
use simplelog::{
    ColorChoice, CombinedLogger, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::env;
use std::io::IsTerminal;
use std::time::Duration;

rust_i18n::i18n!("locales", fallback = "en");

const SYNC_POLL: Duration = Duration::from_secs(2);
const SYNC_MAX_POLLS: u32 = 150;

fn init_logging(ctx: &dyn AppContext, verbose: bool) {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = ctx.get_log_path()
        && let Ok(file) = std::fs::File::create(&path)
    {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            simplelog::Config::default(),
            file,
        ));
    }
    // Only fails when a logger is already installed.
    let _ = CombinedLogger::init(loggers);
}

fn require_user(state: &AppState) -> Result<String> {
    state
        .user_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No user: pass --user <uid> or set user_id in the config file"))
}

fn print_status(status: &SyncStatus) {
    if status.is_running {
        println!("{}", t!("sync_running"));
    } else {
        println!("{}", t!("sync_idle"));
    }
    if let Some(last_run) = &status.last_run {
        println!("  last run: {}", last_run);
    }
    if let Some(result) = &status.last_result {
        println!("  {}", result.message);
        let s = &result.stats;
        println!(
            "  collected {} / new {} / saved {} / schedules {}",
            s.collected, s.new, s.saved, s.schedules
        );
    }
    if let Some(err) = &status.error {
        println!("  error: {}", err);
    }
}

async fn run(inv: Invocation) -> Result<()> {
    if inv.command == Command::Help {
        cli::print_help("diynews");
        return Ok(());
    }
    let ctx = StandardContext::new(inv.root.clone());
    init_logging(&ctx, inv.verbose);

    if let Ok(path) = Config::get_path_string(&ctx) {
        log::debug!("Config file: {}", path);
    }
    let config = Config::load_or_default(&ctx)?;
    let locale = config.resolved_locale();
    rust_i18n::set_locale(&locale);

    let today = Local::now().date_naive();
    let mut state = AppState::new(today, config.derive_options(today.year()));
    if let Some(uid) = inv.user.clone().or_else(|| config.user_id.clone()) {
        state.sign_in(&uid, None);
    }
    let opts = RenderOptions {
        locale: locale.clone(),
        now: Utc::now(),
        color: std::io::stdout().is_terminal(),
        highlight_count: config.highlight_count,
    };

    // Loaded for every view command; bookmarks only make sense on loaded posts.
    let load = |state: &mut AppState| -> Result<()> {
        let posts = LocalStorage::load_posts(&ctx, state.user_id())?;
        log::debug!("Loaded {} posts", posts.len());
        state.set_posts(posts);
        for id in &inv.bookmarks {
            if !state.is_bookmarked(id) {
                state.toggle_bookmark(id);
            }
        }
        Ok(())
    };

    match inv.command.clone() {
        Command::Help => {}
        Command::Feed {
            category,
            bookmarked_only,
        } => {
            load(&mut state)?;
            if state.user.is_none() {
                log::warn!("No user configured, the feed is empty");
            }
            state.set_category(category);
            if bookmarked_only {
                state.set_view(View::Bookmarks);
                print!("{}", views::render_bookmarks(&state, &opts));
            } else {
                print!("{}", views::render_feed(&state, &opts));
            }
        }
        Command::Calendar { month, select } => {
            load(&mut state)?;
            state.set_view(View::Calendar);
            if let Some(date) = select {
                state.select_date(date);
            }
            if let Some(month) = month {
                state.show_month(month);
            }
            print!("{}", views::render_month(&state.month_grid(), &opts));
            if let Some(date) = state.selected_date {
                println!();
                print!(
                    "{}",
                    views::render_day_events(date, &state.selected_events(), &opts)
                );
            }
        }
        Command::Events { date } => {
            load(&mut state)?;
            state.select_date(date.unwrap_or(today));
            let date = state.selected_date.unwrap_or(today);
            print!(
                "{}",
                views::render_day_events(date, &state.selected_events(), &opts)
            );
        }
        Command::ExportIcs => {
            load(&mut state)?;
            print!("{}", events_to_ics(&state.scheduled_events()));
        }
        Command::Import { path } => {
            let uid = require_user(&state)?;
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records = storage::parse_record_export(&json)?;
            let posts = feed::query_posts(&records, Some(&uid), config.feed_limit);
            LocalStorage::save_posts(&ctx, Some(&uid), &posts)?;
            let count = posts.len();
            println!("{}", t!("posts_imported", count = count));
        }
        Command::Delete { id } => {
            let uid = require_user(&state)?;
            load(&mut state)?;
            if state.delete_post(&id).is_none() {
                bail!("No post with id '{}'", id);
            }
            LocalStorage::save_posts(&ctx, Some(&uid), &state.posts)?;
            println!("{}", t!("post_deleted", id = id));
        }
        Command::Accounts(sub) => {
            let uid = require_user(&state)?;
            state.set_view(View::Accounts);
            match sub {
                AccountsCommand::List => {
                    let subs = SubscriptionRegistry::for_user(&ctx, &uid)?;
                    print!("{}", views::render_accounts(&subs, &locale));
                }
                AccountsCommand::Add { name, url } => {
                    let sub = Subscription::from_url(&uid, &name, &url).map_err(|e| anyhow!(e))?;
                    log::info!("Following {} as {:?}", sub.account_id, sub.platform);
                    SubscriptionRegistry::add(&ctx, sub)?;
                    println!("{}", t!("account_added", name = name));
                }
                AccountsCommand::Remove { id } => {
                    let owned = SubscriptionRegistry::for_user(&ctx, &uid)?
                        .iter()
                        .any(|s| s.id == id);
                    if !owned {
                        bail!("No followed account with id '{}'", id);
                    }
                    if let Some(removed) = SubscriptionRegistry::remove(&ctx, &id)? {
                        let name = removed.name;
                        println!("{}", t!("account_removed", name = name));
                    }
                }
            }
        }
        Command::Sync { wait } => {
            let client = SyncClient::new(&config.sync_url).map_err(|e| anyhow!(e))?;
            if !state.begin_sync() {
                return Ok(());
            }
            let outcome = client.trigger().await;
            let result = match outcome {
                Ok(SyncOutcome::Started(_)) => {
                    println!("{}", t!("sync_started"));
                    if wait {
                        client
                            .wait_until_idle(SYNC_POLL, SYNC_MAX_POLLS)
                            .await
                            .map(|status| {
                                let message = status
                                    .last_result
                                    .as_ref()
                                    .map(|r| r.message.clone())
                                    .unwrap_or_default();
                                println!("{}", t!("sync_finished", message = message));
                            })
                    } else {
                        Ok(())
                    }
                }
                Ok(SyncOutcome::AlreadyRunning(_)) => {
                    println!("{}", t!("sync_already_running"));
                    Ok(())
                }
                Err(e) => Err(e),
            };
            state.finish_sync();
            result.map_err(|e| anyhow!(e))?;
        }
        Command::Status => {
            let client = SyncClient::new(&config.sync_url).map_err(|e| anyhow!(e))?;
            let status = client.status().await.map_err(|e| anyhow!(e))?;
            print_status(&status);
        }
        Command::Health => {
            let client = SyncClient::new(&config.sync_url).map_err(|e| anyhow!(e))?;
            let health = client.health().await.map_err(|e| anyhow!(e))?;
            println!("{} ({})", t!("health_ok"), health.message);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let inv = match cli::parse_args(&args) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("See 'diynews --help'.");
            std::process::exit(2);
        }
    };
    run(inv).await
}
