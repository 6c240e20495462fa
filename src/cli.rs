// File: ./src/cli.rs
//! Command-line parsing and help for the `diynews` binary.
use crate::model::Category;
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsCommand {
    List,
    Add { name: String, url: String },
    Remove { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Feed {
        category: Category,
        bookmarked_only: bool,
    },
    Calendar {
        month: Option<NaiveDate>,
        select: Option<NaiveDate>,
    },
    Events {
        date: Option<NaiveDate>,
    },
    ExportIcs,
    Import {
        path: PathBuf,
    },
    Delete {
        id: String,
    },
    Accounts(AccountsCommand),
    Sync {
        wait: bool,
    },
    Status,
    Health,
    Help,
}

/// A parsed command line: global flags plus one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub user: Option<String>,
    /// Post ids bookmarked for this run.
    pub bookmarks: Vec<String>,
    pub command: Command,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month '{}', expected YYYY-MM", raw))
}

/// Parses `args` without the program name. No arguments means `feed`.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut root = None;
    let mut verbose = false;
    let mut user = None;
    let mut bookmarks = Vec::new();
    let mut positional: Vec<String> = Vec::new();

    let mut category = Category::All;
    let mut bookmarked_only = false;
    let mut month = None;
    let mut date = None;
    let mut wait = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => positional.insert(0, "help".to_string()),
            "-r" | "--root" => root = Some(PathBuf::from(take_value(args, &mut i, arg)?)),
            "-v" | "--verbose" => verbose = true,
            "-u" | "--user" => user = Some(take_value(args, &mut i, arg)?),
            "-b" | "--bookmark" => bookmarks.push(take_value(args, &mut i, arg)?),
            "-c" | "--category" => {
                category = take_value(args, &mut i, arg)?
                    .parse()
                    .map_err(|e: String| anyhow!(e))?
            }
            "--bookmarked" => bookmarked_only = true,
            "-m" | "--month" => month = Some(parse_month(&take_value(args, &mut i, arg)?)?),
            "-d" | "--date" => date = Some(parse_date(&take_value(args, &mut i, arg)?)?),
            "-w" | "--wait" => wait = true,
            s if s.starts_with('-') => bail!("Unknown option '{}'", s),
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    let name = positional.first().map(String::as_str).unwrap_or("feed");
    let rest = positional.get(1..).unwrap_or_default();

    let command = match name {
        "help" => Command::Help,
        "feed" => Command::Feed {
            category,
            bookmarked_only,
        },
        "calendar" => Command::Calendar {
            month,
            select: date,
        },
        "events" => Command::Events { date },
        "export-ics" => Command::ExportIcs,
        "import" => {
            let path = rest
                .first()
                .ok_or_else(|| anyhow!("Usage: diynews import <posts.json>"))?;
            Command::Import {
                path: PathBuf::from(path),
            }
        }
        "delete" => {
            let id = rest
                .first()
                .ok_or_else(|| anyhow!("Usage: diynews delete <post-id>"))?;
            Command::Delete { id: id.clone() }
        }
        "accounts" => Command::Accounts(match rest {
            [] => AccountsCommand::List,
            [sub] if sub == "list" => AccountsCommand::List,
            [sub, name, url] if sub == "add" => AccountsCommand::Add {
                name: name.clone(),
                url: url.clone(),
            },
            [sub, id] if sub == "remove" => AccountsCommand::Remove { id: id.clone() },
            _ => bail!("Usage: diynews accounts [list | add <name> <url> | remove <id>]"),
        }),
        "sync" => Command::Sync { wait },
        "status" => Command::Status,
        "health" => Command::Health,
        other => bail!("Unknown command '{}'. See 'diynews --help'.", other),
    };

    Ok(Invocation {
        root,
        verbose,
        user,
        bookmarks,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "diynews v{} - Followed accounts, their posts and the dates they mention",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [COMMAND]", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    feed                         Posts, newest first, with highlights (default)");
    println!("    calendar                     Month grid with event dots");
    println!("    events                       Events of the selected day");
    println!("    export-ics                   All events as iCalendar on stdout");
    println!("    import <posts.json>          Replace the local post snapshot");
    println!("    delete <post-id>             Remove a post from the snapshot");
    println!("    accounts list                Followed accounts");
    println!("    accounts add <name> <url>    Follow a Twitter, YouTube or blog URL");
    println!("    accounts remove <id>         Unfollow");
    println!("    sync [--wait]                Ask the backend to collect new posts");
    println!("    status                       Backend sync status");
    println!("    health                       Backend liveness check");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>            Use a different directory for config and data.");
    println!("    -u, --user <uid>             Act as this user (overrides config user_id).");
    println!("    -b, --bookmark <post-id>     Bookmark a post for this run (repeatable).");
    println!("    -c, --category <name>        Feed filter: all, twitter, youtube, blog.");
    println!("        --bookmarked             Feed shows bookmarked posts only.");
    println!("    -m, --month <YYYY-MM>        Month shown by 'calendar'.");
    println!("    -d, --date <YYYY-MM-DD>      Selected day for 'calendar' and 'events'.");
    println!("    -w, --wait                   'sync' polls status until the run ends.");
    println!("    -v, --verbose                Debug logging.");
    println!("    -h, --help                   Show this help message.");
    println!();
    println!("EXAMPLES:");
    println!("    {} import export.json --user alice", binary_name);
    println!("    {} calendar --month 2025-03 --date 2025-03-15", binary_name);
    println!("    {} export-ics -b post-1 > events.ics", binary_name);
}
