//! Command-line front end over a portfolio file.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    billing::{compute_statistics, renewal_state, RenewalState},
    config::{Config, ConfigManager},
    core::{
        services::{ServiceError, SubscriptionService},
        Clock, FixedClock, Portfolio, SystemClock,
    },
    errors::{ConfigError, StoreError},
    storage::json_backend::{load_portfolio_from_path, save_portfolio_to_path},
    utils::build_info,
};

const USAGE: &str = "\
Usage: subtrack_cli <command> [arguments] [--today YYYY-MM-DD]

Commands:
  stats   <file>                 Per-subscription statistics and portfolio totals
  options <file> <id>            Manual renewal choices for a subscription
  renew   <file> <id> <count>    Renew a subscription for <count> cycles and save
  refresh <file>                 Roll due auto-renewing subscriptions forward and save
  version                        Build information
  help                           This message";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Stats { file: PathBuf },
    Options { file: PathBuf, id: Uuid },
    Renew { file: PathBuf, id: Uuid, count: u32 },
    Refresh { file: PathBuf },
    Version,
    Help,
}

/// Parsed invocation: the command plus an optional `--today` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub today: Option<NaiveDate>,
}

impl Invocation {
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = Vec::new();
        let mut today = None;
        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            if arg == "--today" {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage("`--today` needs a date".into()))?;
                today = Some(parse_date(&value)?);
            } else if let Some(value) = arg.strip_prefix("--today=") {
                today = Some(parse_date(value)?);
            } else {
                positional.push(arg);
            }
        }

        let mut words = positional.into_iter();
        let name = words.next().unwrap_or_else(|| "help".into());
        let rest: Vec<String> = words.collect();
        let command = match (name.as_str(), rest.as_slice()) {
            ("stats", [file]) => Command::Stats { file: file.into() },
            ("options", [file, id]) => Command::Options {
                file: file.into(),
                id: parse_id(id)?,
            },
            ("renew", [file, id, count]) => Command::Renew {
                file: file.into(),
                id: parse_id(id)?,
                count: count
                    .parse()
                    .map_err(|_| CliError::Usage(format!("invalid cycle count `{}`", count)))?,
            },
            ("refresh", [file]) => Command::Refresh { file: file.into() },
            ("version" | "--version", []) => Command::Version,
            ("help" | "--help" | "-h", _) => Command::Help,
            (other, _) => {
                return Err(CliError::Usage(format!(
                    "unknown command or wrong arguments for `{}`",
                    other
                )))
            }
        };
        Ok(Self { command, today })
    }
}

/// Entry point used by the `subtrack_cli` binary.
pub fn run_cli() -> Result<(), CliError> {
    let invocation = Invocation::parse(std::env::args().skip(1))?;
    let config = ConfigManager::new()?.load()?;
    let clock: Box<dyn Clock> = match invocation.today {
        Some(day) => Box::new(FixedClock::new(day)),
        None => Box::new(SystemClock),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&invocation.command, &config, clock.as_ref(), &mut out)
}

pub fn execute(
    command: &Command,
    config: &Config,
    clock: &dyn Clock,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let today = clock.today();
    match command {
        Command::Stats { file } => {
            let portfolio = load_portfolio_from_path(file, config.fallback_cycle)?;
            render_stats(&portfolio, config, today, out)?;
        }
        Command::Options { file, id } => {
            let portfolio = load_portfolio_from_path(file, config.fallback_cycle)?;
            let options = SubscriptionService::renewal_options(&portfolio, *id, today)?;
            for option in options {
                writeln!(
                    out,
                    "{:<10} {:>12}  renews until {}",
                    option.label,
                    money(option.total_cost, config),
                    option.new_renewal_date
                )?;
            }
        }
        Command::Renew { file, id, count } => {
            let mut portfolio = load_portfolio_from_path(file, config.fallback_cycle)?;
            let next = SubscriptionService::renew(&mut portfolio, *id, *count, today)?;
            save_portfolio_to_path(&portfolio, file)?;
            writeln!(out, "Renewed until {}", next)?;
        }
        Command::Refresh { file } => {
            let mut portfolio = load_portfolio_from_path(file, config.fallback_cycle)?;
            let changed = SubscriptionService::refresh_auto_renewals(&mut portfolio, today);
            if changed > 0 {
                save_portfolio_to_path(&portfolio, file)?;
            }
            writeln!(out, "Refreshed {} auto-renewing subscription(s)", changed)?;
        }
        Command::Version => {
            writeln!(out, "{}", build_info::current().summary())?;
        }
        Command::Help => {
            writeln!(out, "{}", USAGE)?;
        }
    }
    Ok(())
}

fn render_stats(
    portfolio: &Portfolio,
    config: &Config,
    today: NaiveDate,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out, "{} as of {}", portfolio.name.bold(), today)?;
    for record in &portfolio.records {
        let state = renewal_state(record, today);
        let badge = match state {
            RenewalState::Overdue => "OVERDUE".red().bold(),
            RenewalState::Paused => "PAUSED".yellow(),
            RenewalState::Future => "FUTURE".cyan(),
            RenewalState::Active => "ACTIVE".green(),
        };
        if record.one_time {
            writeln!(
                out,
                "  {:<24} {:<8} one-time {} since {}",
                record.name,
                badge,
                money(record.price, config),
                record.start_date
            )?;
            continue;
        }
        let stats = compute_statistics(record, today);
        writeln!(
            out,
            "  {:<24} {:<8} next {} ({} days)  spent {} over {}  ~{}/month",
            record.name,
            badge,
            record.next_renewal_date,
            stats.days_until_renewal,
            money(stats.accumulated_cost, config),
            stats.accumulated_duration_label,
            money(stats.average_monthly_cost, config)
        )?;
    }
    let totals = SubscriptionService::summary(portfolio, today);
    writeln!(
        out,
        "Subscriptions: {} (active {}, overdue {}, paused {})",
        totals.total_subscriptions, totals.active_count, totals.overdue_count, totals.paused_count
    )?;
    writeln!(
        out,
        "Recurring: {}/day, {}/month",
        money(totals.total_daily_cost, config),
        money(totals.total_monthly_cost, config)
    )?;
    writeln!(
        out,
        "One-time: {} total, {}/day",
        money(totals.one_time_purchase_total_value, config),
        money(totals.one_time_purchase_daily_value, config)
    )?;
    writeln!(out, "Total spent: {}", money(totals.total_cost, config))
}

fn money(amount: Decimal, config: &Config) -> String {
    format!(
        "{} {}",
        amount.round_dp(config.currency_precision),
        config.currency
    )
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::InvalidDate(value.to_string()))
}

fn parse_id(value: &str) -> Result<Uuid, CliError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| CliError::Usage(format!("invalid subscription id `{}`", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::CycleDefinition;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_commands_and_today_override() {
        let id = Uuid::new_v4();
        let invocation = Invocation::parse([
            "renew".to_string(),
            "subs.json".to_string(),
            id.to_string(),
            "3".to_string(),
            "--today".to_string(),
            "2024-06-01".to_string(),
        ])
        .unwrap();
        assert_eq!(
            invocation.command,
            Command::Renew {
                file: "subs.json".into(),
                id,
                count: 3
            }
        );
        assert_eq!(invocation.today, Some(date(2024, 6, 1)));

        let invocation = Invocation::parse(["stats", "a.json", "--today=2024-01-02"]).unwrap();
        assert_eq!(invocation.today, Some(date(2024, 1, 2)));
    }

    #[test]
    fn no_arguments_means_help() {
        let invocation = Invocation::parse(Vec::<String>::new()).unwrap();
        assert_eq!(invocation.command, Command::Help);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Invocation::parse(["stats", "a.json", "--today", "06/01/2024"]),
            Err(CliError::InvalidDate(_))
        ));
        assert!(matches!(
            Invocation::parse(["options", "a.json", "not-a-uuid"]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            Invocation::parse(["launch"]),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn stats_render_totals() {
        colored::control::set_override(false);
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("subs.json");
        let mut portfolio = Portfolio::new("Home");
        SubscriptionService::add(
            &mut portfolio,
            "Music",
            Decimal::new(999, 2),
            CycleDefinition::monthly(),
            date(2024, 1, 15),
            date(2024, 1, 15),
        )
        .unwrap();
        save_portfolio_to_path(&portfolio, &path).unwrap();

        let mut out = Vec::new();
        execute(
            &Command::Stats { file: path },
            &Config::default(),
            &FixedClock::new(date(2024, 4, 20)),
            &mut out,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("OVERDUE"), "{text}");
        assert!(text.contains("spent 39.96 USD over 3 months 5 days"), "{text}");
        assert!(text.contains("Subscriptions: 1 (active 1, overdue 1, paused 0)"));
        assert!(text.contains("Total spent: 39.96 USD"));
    }
}
