//! Interactive and script-mode shell. Slash commands go to the chat
//! router exactly as they would over a real transport; a few bare words
//! (`user`, `digest`, `help`, `exit`) manage the local session.

use std::{
    io::{self, BufRead},
    sync::Arc,
};

use rustyline::{error::ReadlineError, DefaultEditor};
use shell_words::split;
use thiserror::Error;

use fintrack_config::{ConfigError, ConfigManager};
use fintrack_core::{Clock, CoreError, FinanceStore};
use fintrack_domain::User;
use fintrack_storage_json::JsonStore;

use crate::bot::{
    link::RedeemOutcome, CommandRouter, DigestJob, LinkService, StdoutSender,
};
use crate::cli::output;
use crate::cli::system_clock::SystemClock;
use crate::utils;

const PROMPT: &str = "fintrack> ";

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

enum LoopControl {
    Continue,
    Exit,
}

struct ShellContext {
    store: Arc<JsonStore>,
    router: CommandRouter,
    links: LinkService,
    digest: DigestJob,
    chat_id: i64,
}

impl ShellContext {
    fn new() -> Result<Self, CliError> {
        let base = utils::base_dir();
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let store = Arc::new(JsonStore::open(base.join("data").join("fintrack.json"))?);
        let store_dyn: Arc<dyn FinanceStore> = store.clone();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let router = CommandRouter::new(store_dyn.clone(), clock.clone(), config.clone());
        let links = LinkService::new(store_dyn.clone(), clock.clone());
        let digest = DigestJob::new(
            store_dyn,
            clock,
            Arc::new(StdoutSender),
            config.digest_hour,
            config.currency_symbol.clone(),
        );

        // Resume the first linked identity so a restarted shell keeps its
        // chat; a fresh store starts on chat 1.
        let chat_id = store
            .snapshot()?
            .users
            .iter()
            .find(|user| user.telegram_linked)
            .and_then(|user| user.telegram_id)
            .unwrap_or(1);

        Ok(Self {
            store,
            router,
            links,
            digest,
            chat_id,
        })
    }

    fn handle_line(&mut self, line: &str) -> Result<LoopControl, CliError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(LoopControl::Continue);
        }
        if trimmed.starts_with('/') {
            output::reply(&self.router.handle(self.chat_id, trimmed));
            return Ok(LoopControl::Continue);
        }

        let tokens = match split(trimmed) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((head, args)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        match head.to_lowercase().as_str() {
            "exit" | "quit" => Ok(LoopControl::Exit),
            "help" => {
                self.print_help();
                Ok(LoopControl::Continue)
            }
            "user" => {
                match args {
                    [name] => self.switch_user(name)?,
                    _ => output::warning("Usage: user <name>"),
                }
                Ok(LoopControl::Continue)
            }
            "digest" => {
                let delivered = self.digest.run_once();
                output::info(&format!("Digest delivered to {delivered} recipient(s)."));
                Ok(LoopControl::Continue)
            }
            other => {
                output::warning(&format!("Unknown shell command `{other}`. Type `help`."));
                Ok(LoopControl::Continue)
            }
        }
    }

    /// Creates the account on first use, then links it to this shell's
    /// chat through the regular token flow.
    fn switch_user(&mut self, name: &str) -> Result<(), CliError> {
        let user = match self.store.user_by_name(name)? {
            Some(user) => user,
            None => {
                let user = User::new(name);
                self.store.add_user(user.clone())?;
                output::info(&format!("Created user `{}`.", user.username));
                user
            }
        };

        if user.telegram_linked {
            if let Some(chat_id) = user.telegram_id {
                self.chat_id = chat_id;
                output::info(&format!(
                    "Speaking as {} (chat {}).",
                    user.username, chat_id
                ));
                return Ok(());
            }
        }

        let token = self.links.issue(user.id)?;
        let chat_id = self.next_chat_id()?;
        match self.links.redeem(&token.token, chat_id)? {
            RedeemOutcome::Linked(user) => {
                self.chat_id = chat_id;
                output::info(&format!(
                    "✅ {} linked to this chat (chat {}).",
                    user.username, chat_id
                ));
            }
            RedeemOutcome::Expired | RedeemOutcome::UnknownToken => {
                output::warning("Link token could not be redeemed.");
            }
        }
        Ok(())
    }

    fn next_chat_id(&self) -> Result<i64, CliError> {
        let snapshot = self.store.snapshot()?;
        let max = snapshot
            .users
            .iter()
            .filter_map(|user| user.telegram_id)
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    fn print_help(&self) {
        output::info("Shell commands:");
        output::info("  user <name>   Create/select a user and link this chat");
        output::info("  digest        Deliver the daily digest batch now");
        output::info("  help          Show this help");
        output::info("  exit          Leave the shell");
        output::info("Anything starting with `/` goes to the assistant, e.g. /help");
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os("FINTRACK_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new()?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    output::info("fintrack shell. Type `help` for commands.");
    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match context.handle_line(trimmed)? {
                    LoopControl::Continue => {}
                    LoopControl::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match context.handle_line(&line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(())
}
