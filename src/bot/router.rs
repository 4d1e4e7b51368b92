//! Maps parsed chat commands onto the core services and renders replies.

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;

use fintrack_config::Config;
use fintrack_core::{
    format, AnalysisOptions, BudgetService, CategoryIndex, CategoryService, Clock, CoreError,
    FinanceStore, ReportService, Result, TransactionService,
};
use fintrack_domain::{BudgetMonth, BudgetReport, CategoryKind, DateWindow, User};

use crate::bot::command::BotCommand;
use crate::bot::link::{LinkService, RedeemOutcome};

const COMMAND_SUMMARY: &str = "Available commands:\n\
/today - Report for today\n\
/week - Report for the week\n\
/add <amount> <category> [note] - Record an operation\n\
/report - Monthly budget report\n\
/budget <income> <expense> - Set this month's budget\n\
/help - Help";

/// Executes chat commands for a given chat id and returns the reply text.
///
/// Every command goes through the same core services the web layer uses;
/// the router only parses, dispatches, and formats.
pub struct CommandRouter {
    store: Arc<dyn FinanceStore>,
    clock: Arc<dyn Clock>,
    config: Config,
    links: LinkService,
}

impl CommandRouter {
    pub fn new(store: Arc<dyn FinanceStore>, clock: Arc<dyn Clock>, config: Config) -> Self {
        let links = LinkService::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            config,
            links,
        }
    }

    /// Handles one incoming message. Never panics and never leaks internal
    /// error detail; every outcome is a short human-readable reply.
    pub fn handle(&self, chat_id: i64, text: &str) -> String {
        match BotCommand::parse(text) {
            Ok(command) => self
                .dispatch(chat_id, command)
                .unwrap_or_else(|err| self.error_reply(err)),
            Err(err) => format!("❌ {err}"),
        }
    }

    fn dispatch(&self, chat_id: i64, command: BotCommand) -> Result<String> {
        let today = self.clock.today();
        match command {
            BotCommand::Start { token } => self.start(chat_id, token),
            BotCommand::Today => {
                let user = self.require_user(chat_id)?;
                let totals = ReportService::today_report(self.store.as_ref(), user.id, today)?;
                Ok(format!(
                    "📊 Report for today:\nIncome: {}\nExpenses: {}",
                    self.amount(totals.income),
                    self.amount(totals.expense),
                ))
            }
            BotCommand::Week => {
                let user = self.require_user(chat_id)?;
                let totals = ReportService::week_report(self.store.as_ref(), user.id, today)?;
                Ok(format!(
                    "📈 Spending over the last week: {}",
                    self.amount(totals.expense)
                ))
            }
            BotCommand::Report => {
                let user = self.require_user(chat_id)?;
                let report = ReportService::monthly_report_with(
                    self.store.as_ref(),
                    user.id,
                    BudgetMonth::of(today),
                    today,
                    &self.options(),
                )?;
                Ok(self.render_report(&report))
            }
            BotCommand::Detail => {
                let user = self.require_user(chat_id)?;
                let lines = ReportService::expenses_by_category(
                    self.store.as_ref(),
                    user.id,
                    DateWindow::single_day(today),
                )?;
                let mut reply = format!(
                    "📊 Detailed report for today ({}):\n",
                    format::format_date(today)
                );
                if lines.is_empty() {
                    reply.push_str("No spending today.");
                } else {
                    for line in lines {
                        reply.push_str(&format!("• {}: {}\n", line.name, self.amount(line.total)));
                    }
                    reply.truncate(reply.trim_end().len());
                }
                Ok(reply)
            }
            BotCommand::CompareWeek => {
                let user = self.require_user(chat_id)?;
                let current = DateWindow::trailing(7, today);
                let previous = DateWindow {
                    start: current.start - Duration::days(7),
                    end: current.start,
                };
                let comparison = ReportService::compare_expense_windows(
                    self.store.as_ref(),
                    user.id,
                    current,
                    previous,
                )?;
                Ok(self.render_comparison(
                    "📈 Compared with the previous week:",
                    "This week",
                    "Last week",
                    comparison.current,
                    comparison.previous,
                ))
            }
            BotCommand::CompareMonth => {
                let user = self.require_user(chat_id)?;
                let month = BudgetMonth::of(today);
                let comparison = ReportService::compare_expense_windows(
                    self.store.as_ref(),
                    user.id,
                    month.window(),
                    month.previous().window(),
                )?;
                Ok(self.render_comparison(
                    "📅 Compared with the previous month:",
                    "This month",
                    "Last month",
                    comparison.current,
                    comparison.previous,
                ))
            }
            BotCommand::Add {
                amount,
                category,
                description,
            } => {
                let user = self.require_user(chat_id)?;
                let amount = TransactionService::parse_amount(&amount)?;
                match TransactionService::record(
                    self.store.as_ref(),
                    user.id,
                    amount,
                    today,
                    &category,
                    &description,
                ) {
                    Ok((transaction, resolved)) => Ok(format!(
                        "✅ Recorded: {} ({})",
                        self.amount(transaction.amount),
                        resolved.name
                    )),
                    Err(CoreError::CategoryNotFound(_)) => {
                        Ok(self.category_not_found_reply(&user, &category)?)
                    }
                    Err(err) => Err(err),
                }
            }
            BotCommand::AddUsage => Ok("To record an operation use:\n\
                 /add <amount> <category> [note]\n\n\
                 Example:\n/add 500 Food lunch"
                .into()),
            BotCommand::CreateCategory { name, kind } => {
                let user = self.require_user(chat_id)?;
                let Some(kind) = CategoryKind::parse(&kind) else {
                    return Ok("❌ Invalid kind. Use: income or expense".into());
                };
                let category =
                    CategoryService::create(self.store.as_ref(), user.id, &name, kind, None)?;
                Ok(format!("✅ Category '{}' added!", category.name))
            }
            BotCommand::CreateCategoryUsage => {
                Ok("❌ Usage: /createcategory <name> <income|expense>".into())
            }
            BotCommand::NewCategoryHelp => Ok("📝 To create a category use:\n\
                 /createcategory <name> <kind>\n\n\
                 The kind is one of:\n\
                 income - for earnings\n\
                 expense - for spending\n\n\
                 Example:\n/createcategory Transport expense"
                .into()),
            BotCommand::Budget { income, expense } => {
                let user = self.require_user(chat_id)?;
                let planned_income = BudgetService::parse_plan(&income)?;
                let planned_expense = BudgetService::parse_plan(&expense)?;
                let month = BudgetMonth::of(today);
                let budget = BudgetService::set_plan(
                    self.store.as_ref(),
                    user.id,
                    month,
                    planned_income,
                    planned_expense,
                )?;
                let report = ReportService::monthly_report_with(
                    self.store.as_ref(),
                    user.id,
                    month,
                    today,
                    &self.options(),
                )?;
                let mut reply = format!(
                    "✅ Budget for {} saved:\nIncome: {}\nExpenses: {}\n\n📊 Budget analysis:",
                    budget.month,
                    self.amount(budget.planned_income),
                    self.amount(budget.planned_expense),
                );
                for recommendation in &report.recommendations {
                    reply.push('\n');
                    reply.push_str(&recommendation.to_string());
                }
                Ok(reply)
            }
            BotCommand::BudgetUsage => Ok("❌ Usage: /budget <income> <expense>\n\
                 Example: /budget 50000 35000"
                .into()),
            BotCommand::SetBudgetHelp => Ok("📝 To set this month's budget use:\n\
                 /budget <income> <expense>\n\n\
                 Example:\n/budget 50000 35000"
                .into()),
            BotCommand::Help => Ok([
                "📚 Bot help:",
                "",
                "📌 /today - Spending report for today",
                "📌 /week - Spending report for the week",
                "📌 /add <amount> <category> [note] - Record an operation",
                "    Example: /add 500 Food lunch",
                "📌 /report - Monthly budget report with recommendations",
                "📌 /detail - Today's spending by category",
                "📌 /compare - Compare with the previous week",
                "📌 /comparemonth - Compare with the previous month",
                "📌 /createcategory <name> <income|expense> - Add a category",
                "📌 /budget <income> <expense> - Set this month's budget",
                "📌 /menu - Show the command menu",
                "",
                "💡 Tip: amounts accept decimals, e.g. /add 120.50 Food coffee",
            ]
            .join("\n")),
            BotCommand::Menu => Ok(format!("Main commands:\n{COMMAND_SUMMARY}")),
            BotCommand::Unknown { command } => {
                let mut reply = format!("❓ Unknown command {command}.");
                if let Some(suggestion) = BotCommand::suggest(&command) {
                    reply.push_str(&format!(" Did you mean {suggestion}?"));
                }
                reply.push_str("\nSend /help for the list of commands.");
                Ok(reply)
            }
        }
    }

    fn start(&self, chat_id: i64, token: Option<String>) -> Result<String> {
        if let Some(user) = self.store.user_by_telegram(chat_id)? {
            if user.telegram_linked {
                return Ok(format!(
                    "👋 Welcome back, {}!\n\n{}",
                    user.username, COMMAND_SUMMARY
                ));
            }
        }
        if let Some(token) = token {
            return Ok(match self.links.redeem(&token, chat_id)? {
                RedeemOutcome::Linked(_) => format!(
                    "✅ Account linked successfully!\n\n{COMMAND_SUMMARY}"
                ),
                RedeemOutcome::Expired => {
                    "❌ This link has expired. Generate a new one on the site.".into()
                }
                RedeemOutcome::UnknownToken => self.greeting(),
            });
        }
        Ok(self.greeting())
    }

    fn greeting(&self) -> String {
        format!(
            "👋 Hi! I am your finance assistant.\n\n{COMMAND_SUMMARY}"
        )
    }

    fn render_report(&self, report: &BudgetReport) -> String {
        let mut reply = format!(
            "📊 Report for {}:\nIncome: {}\nExpenses: {}\nBalance: {}",
            report.month,
            self.amount(report.total_income()),
            self.amount(report.total_expense()),
            self.amount(report.totals.balance()),
        );
        if let Some(comparison) = &report.comparison {
            reply.push_str(&format!(
                "\nPlanned income: {}\nPlanned expenses: {}",
                self.amount(comparison.planned_income),
                self.amount(comparison.planned_expense),
            ));
        }
        reply.push_str("\n\n📊 Recommendations:");
        for recommendation in &report.recommendations {
            reply.push('\n');
            reply.push_str(&recommendation.to_string());
        }
        reply
    }

    fn render_comparison(
        &self,
        title: &str,
        current_label: &str,
        previous_label: &str,
        current: Decimal,
        previous: Decimal,
    ) -> String {
        let mut reply = format!(
            "{title}\n{current_label}: {}\n{previous_label}: {}\n",
            self.amount(current),
            self.amount(previous),
        );
        let diff = current - previous;
        if diff > Decimal::ZERO {
            reply.push_str(&format!("You spent {} more. 💸", self.amount(diff)));
        } else if diff < Decimal::ZERO {
            reply.push_str(&format!("You saved {}! 🎉", self.amount(diff.abs())));
        } else {
            reply.push_str("Spending is unchanged. 🟰");
        }
        reply
    }

    fn category_not_found_reply(&self, user: &User, entered: &str) -> Result<String> {
        let index = CategoryIndex::build(self.store.categories_for(user.id)?);
        let mut reply = format!("❌ Category '{entered}' not found.\n");
        if index.is_empty() {
            reply.push_str("You have no categories yet. Create one with /createcategory.");
        } else {
            let available: Vec<&str> = index.names().collect();
            reply.push_str(&format!("Available categories: {}", available.join(", ")));
            if let Some(suggestion) = index.suggest(entered) {
                reply.push_str(&format!("\nDid you mean '{suggestion}'?"));
            }
        }
        Ok(reply)
    }

    fn require_user(&self, chat_id: i64) -> Result<User> {
        self.store
            .user_by_telegram(chat_id)?
            .filter(|user| user.telegram_linked)
            .ok_or(CoreError::NotLinked)
    }

    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            top_categories: self.config.top_categories,
            large_expense_threshold: self.config.large_expense_threshold,
            currency_symbol: self.config.currency_symbol.clone(),
        }
    }

    fn amount(&self, value: Decimal) -> String {
        format::format_amount(value, &self.config.currency_symbol)
    }

    fn error_reply(&self, err: CoreError) -> String {
        match err {
            CoreError::NotLinked => {
                "❌ Your account is not linked. Open the site and connect your chat.".into()
            }
            CoreError::InvalidAmount(message) => format!("❌ Invalid amount: {message}."),
            CoreError::CategoryNotFound(name) => format!("❌ Category '{name}' not found."),
            CoreError::Validation(message) => format!("❌ {message}."),
            CoreError::Storage(detail) | CoreError::Serde(detail) => {
                tracing::error!(error = %detail, "command failed on storage");
                "❌ Something went wrong. Please try again later.".into()
            }
        }
    }
}
