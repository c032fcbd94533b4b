use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{CreateUser, Engine, EngineError, TOP_WISHES_LIMIT};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "giftshare_admin")]
#[command(about = "Admin utilities for GiftShare (bootstrap and inspect users/wishes)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./giftshare.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Wish(Wish),
    Session(Session),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user, prompting for the password.
    Create(UserCreateArgs),
    /// Search users by username or email.
    Find(UserFindArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    about: Option<String>,
}

#[derive(Args, Debug)]
struct UserFindArgs {
    #[arg(long)]
    query: String,
}

#[derive(Args, Debug)]
struct Wish {
    #[command(subcommand)]
    command: WishCommand,
}

#[derive(Subcommand, Debug)]
enum WishCommand {
    /// Print the most copied wishes.
    Top,
}

#[derive(Args, Debug)]
struct Session {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Remove expired sessions.
    Purge,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("The password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_password_twice()?;

            let created = engine
                .create_user(CreateUser {
                    username: args.username,
                    email: args.email,
                    password,
                    about: args.about,
                    avatar: None,
                })
                .await;
            match created {
                Ok(user) => println!("created user: {} (id {})", user.username, user.id),
                Err(err @ (EngineError::ExistingKey(_) | EngineError::InvalidInput(_))) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::User(User {
            command: UserCommand::Find(args),
        }) => {
            let users = engine.find_users(&args.query).await?;
            if users.is_empty() {
                println!("no users match {:?}", args.query);
            }
            for user in users {
                println!("{:>6}  {:<24} {}", user.id, user.username, user.email);
            }
        }
        Command::Wish(Wish {
            command: WishCommand::Top,
        }) => {
            let wishes = engine.top_wishes(None).await?;
            println!("top {} wishes:", TOP_WISHES_LIMIT);
            for wish in wishes {
                println!(
                    "{:>6}  copied {:>4}  {:>10}  {} ({})",
                    wish.id, wish.copied, wish.price, wish.name, wish.owner.username
                );
            }
        }
        Command::Session(Session {
            command: SessionCommand::Purge,
        }) => {
            let purged = engine.purge_expired_sessions().await?;
            println!("removed {purged} expired sessions");
        }
    }

    Ok(())
}
