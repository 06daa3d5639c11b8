use std::path::Path;

use tracing::{debug, error};

use crate::config::AppConfig;
use crate::data::csv_io::{export_csv, load_rows_csv};
use crate::data::input::{coerce_amount, coerce_count};
use crate::format::{format_achievement, format_amount, format_rate, Locale};
use crate::server;
use crate::server::api::TierResponse;
use crate::session::{Session, Summary};

pub const USAGE: &str = "usage: commission <serve|calc|distribute|tier|state>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Calc,
    Distribute,
    Tier,
    State,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("calc") => Some(Command::Calc),
        Some("distribute") => Some(Command::Distribute),
        Some("tier") => Some(Command::Tier),
        Some("state") => Some(Command::State),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    debug!(?command, ?config, "dispatching command");

    match command {
        Command::Serve => handle_serve(&config),
        Command::Calc => handle_calc(args, config.locale),
        Command::Distribute => handle_distribute(args),
        Command::Tier => handle_tier(args),
        Command::State => handle_state(args, &config),
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            error!(error = %err, "server error");
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_calc(args: &[String], locale: Locale) -> i32 {
    let (Some(path), Some(percent)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: commission calc <rows.csv> <achievement-percent> [outlet-target] [--table]");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == "--table");

    let rows = match load_rows_csv(Path::new(path)) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("calc failed: {err}");
            return 1;
        }
    };

    let mut session = Session {
        rows,
        ..Session::default()
    };
    session.set_achievement_percent(coerce_amount(percent));
    if let Some(target) = args.get(4).filter(|arg| !arg.starts_with("--")) {
        session.set_outlet_target(coerce_amount(target));
    }
    session.suggest_count = session.rows.len();

    let summary = session.summary();
    if as_table {
        print!("{}", render_table(&session, &summary, locale));
        return 0;
    }
    print_json(&summary)
}

fn handle_distribute(args: &[String]) -> i32 {
    let (Some(path), Some(target), Some(count)) = (args.get(2), args.get(3), args.get(4)) else {
        eprintln!("usage: commission distribute <rows.csv> <outlet-target> <employee-count>");
        return 2;
    };

    let rows = match load_rows_csv(Path::new(path)) {
        Ok(rows) => rows,
        Err(err) => {
            eprintln!("distribute failed: {err}");
            return 1;
        }
    };

    let mut session = Session {
        rows,
        ..Session::default()
    };
    session.set_outlet_target(coerce_amount(target));
    session.suggest_count = coerce_count(count);
    if let Err(err) = session.distribute_to_count() {
        eprintln!("distribute failed: {err}");
        return 1;
    }

    match export_csv(&session.rows) {
        Ok(csv) => {
            println!("{csv}");
            0
        }
        Err(err) => {
            eprintln!("distribute failed: {err}");
            1
        }
    }
}

fn handle_tier(args: &[String]) -> i32 {
    let Some(percent) = args.get(2) else {
        eprintln!("usage: commission tier <achievement-percent>");
        return 2;
    };
    print_json(&TierResponse::for_percent(coerce_amount(percent)))
}

fn handle_state(args: &[String], config: &AppConfig) -> i32 {
    let store = config.state_store();
    match args.get(2).map(String::as_str) {
        Some("show") => match store.load() {
            Ok(session) => print_json(&session),
            Err(err) => {
                eprintln!("state load failed: {err}");
                1
            }
        },
        Some("clear") => match store.clear() {
            Ok(removed) => {
                println!("cleared {removed} record(s) from {}", store.dir().display());
                0
            }
            Err(err) => {
                eprintln!("state clear failed: {err}");
                1
            }
        },
        _ => {
            eprintln!("usage: commission state <show|clear>");
            2
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

/// Tab-separated rows followed by a totals block.
pub fn render_table(session: &Session, summary: &Summary, locale: Locale) -> String {
    let mut out = String::from("#\tname\tsales\ttarget\tachievement\trate\tcommission\n");
    for (index, (row, result)) in session.rows.iter().zip(&summary.totals.rows).enumerate() {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            index + 1,
            row.name,
            format_amount(row.sales, locale),
            format_amount(row.target, locale),
            format_achievement(result.achievement),
            format_rate(result.rate),
            format_amount(result.commission, locale),
        ));
    }
    let totals = &summary.totals;
    out.push_str(&format!("outlet_rate\t{}\n", format_rate(summary.outlet_rate)));
    out.push_str(&format!("total_sales\t{}\n", format_amount(totals.total_sales, locale)));
    out.push_str(&format!("total_targets\t{}\n", format_amount(totals.total_targets, locale)));
    out.push_str(&format!("outlet_diff\t{}\n", format_amount(summary.outlet_diff, locale)));
    out.push_str(&format!("avg_achievement\t{}\n", format_achievement(totals.avg_achievement)));
    out.push_str(&format!("avg_rate\t{}\n", format_rate(totals.avg_rate)));
    out.push_str(&format!(
        "total_commission\t{}\n",
        format_amount(totals.total_commission, locale)
    ));
    out
}
