//! Text command grammar for the chat interface.

use std::fmt;

use shell_words::split;

/// Every slash command the router understands, used for suggestions and
/// the help text.
pub const KNOWN_COMMANDS: &[&str] = &[
    "/start",
    "/today",
    "/week",
    "/report",
    "/detail",
    "/compare",
    "/comparemonth",
    "/add",
    "/createcategory",
    "/newcategory",
    "/budget",
    "/setbudget",
    "/help",
    "/menu",
];

/// A parsed chat command. Argument payloads stay as raw strings; numeric
/// validation happens at the service boundary so errors map to the right
/// replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start { token: Option<String> },
    Today,
    Week,
    Report,
    Detail,
    CompareWeek,
    CompareMonth,
    Add {
        amount: String,
        category: String,
        description: String,
    },
    AddUsage,
    CreateCategory { name: String, kind: String },
    CreateCategoryUsage,
    NewCategoryHelp,
    Budget { income: String, expense: String },
    BudgetUsage,
    SetBudgetHelp,
    Help,
    Menu,
    Unknown { command: String },
}

impl BotCommand {
    pub fn parse(text: &str) -> Result<Self, CommandParseError> {
        let tokens = split(text.trim()).map_err(|err| CommandParseError(err.to_string()))?;
        let Some((head, args)) = tokens.split_first() else {
            return Err(CommandParseError("empty message".into()));
        };
        let command = head.to_lowercase();
        if !command.starts_with('/') {
            return Ok(BotCommand::Unknown { command });
        }
        let parsed = match command.as_str() {
            "/start" => BotCommand::Start {
                token: args.first().cloned(),
            },
            "/today" => BotCommand::Today,
            "/week" => BotCommand::Week,
            "/report" => BotCommand::Report,
            "/detail" => BotCommand::Detail,
            "/compare" => BotCommand::CompareWeek,
            "/comparemonth" => BotCommand::CompareMonth,
            "/add" => match args {
                [amount, category, rest @ ..] => BotCommand::Add {
                    amount: amount.clone(),
                    category: category.clone(),
                    description: rest.join(" "),
                },
                _ => BotCommand::AddUsage,
            },
            "/createcategory" => match args {
                [name, kind] => BotCommand::CreateCategory {
                    name: name.clone(),
                    kind: kind.clone(),
                },
                _ => BotCommand::CreateCategoryUsage,
            },
            "/newcategory" => BotCommand::NewCategoryHelp,
            "/budget" => match args {
                [income, expense] => BotCommand::Budget {
                    income: income.clone(),
                    expense: expense.clone(),
                },
                _ => BotCommand::BudgetUsage,
            },
            "/setbudget" => BotCommand::SetBudgetHelp,
            "/help" => BotCommand::Help,
            "/menu" => BotCommand::Menu,
            _ => BotCommand::Unknown { command },
        };
        Ok(parsed)
    }

    /// The closest known command by edit distance, for "did you mean".
    pub fn suggest(command: &str) -> Option<&'static str> {
        let needle = command.to_lowercase();
        let (best, distance) = KNOWN_COMMANDS
            .iter()
            .map(|known| (*known, strsim::levenshtein(known, &needle)))
            .min_by_key(|&(_, distance)| distance)?;
        (distance <= 3).then_some(best)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParseError(pub String);

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CommandParseError {}
