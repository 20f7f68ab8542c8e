//! Command definitions and handlers.
//!
//! Handlers return the one-line notification (or rendered view) to print;
//! failures bubble up as `anyhow` errors and are shown by `main`.

use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::PathBuf;
use timetable_core::{
    default_log_level, format_hour_label, parse_clock_input, ClockTime, Entry, EntryColor,
    EntryDraft, PersistenceBackend, TimetableStore, HOURS_PER_DAY,
};

pub fn command() -> Command {
    Command::new("timetable")
        .version(timetable_core::core_version())
        .about("Plan your day: a 24-hour timetable with homework notes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the timetable database and logs"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .default_value(default_log_level())
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .subcommand(
            Command::new("add")
                .about("Add an entry")
                .arg(subject_arg().required(true))
                .arg(clock_arg("start").required(true))
                .arg(clock_arg("end").help("End time (defaults to the next full hour)"))
                .arg(homework_arg()),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit an entry; omitted fields keep their value")
                .arg(Arg::new("id").required(true))
                .arg(subject_arg())
                .arg(clock_arg("start"))
                .arg(clock_arg("end"))
                .arg(homework_arg().help("Homework note (empty string clears it)")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an entry")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("list").about("List entries").arg(
                Arg::new("hour")
                    .long("hour")
                    .value_parser(value_parser!(u8).range(0..i64::from(HOURS_PER_DAY)))
                    .help("Only entries starting in this hour (0-23)"),
            ),
        )
        .subcommand(
            Command::new("grid").about("Show the 24-hour grid").arg(
                Arg::new("compact")
                    .long("compact")
                    .action(ArgAction::SetTrue)
                    .help("Hide hours without entries"),
            ),
        )
        .subcommand(Command::new("stats").about("Show summary counts"))
        .subcommand(
            Command::new("export")
                .about("Write a JSON backup named timetable-YYYY-MM-DD.json")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .value_name("DIR")
                        .value_parser(value_parser!(PathBuf))
                        .help("Target directory (defaults to the current directory)"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all entries with a JSON backup")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("clear").about("Delete all entries"))
}

/// Runs the selected subcommand against `store`.
pub fn dispatch<B: PersistenceBackend>(
    store: &mut TimetableStore<B>,
    matches: &ArgMatches,
) -> Result<String> {
    match matches.subcommand() {
        Some(("add", args)) => add(store, args),
        Some(("edit", args)) => edit(store, args),
        Some(("delete", args)) => {
            let id = required_str(args, "id")?;
            let removed = store.delete(id)?;
            Ok(format!("Entry deleted: {}", removed.subject()))
        }
        Some(("list", args)) => {
            let entries: Vec<&Entry> = match args.get_one::<u8>("hour") {
                Some(hour) => store.entries_for_hour(*hour),
                None => store.entries().iter().collect(),
            };
            Ok(render_list(&entries))
        }
        Some(("grid", args)) => Ok(render_grid(store.entries(), args.get_flag("compact"))),
        Some(("stats", _)) => Ok(render_stats(store)),
        Some(("export", args)) => {
            let dir = match args.get_one::<PathBuf>("dir") {
                Some(dir) => dir.clone(),
                None => std::env::current_dir().context("Failed to read current directory")?,
            };
            let path = store.export_to_dir(&dir)?;
            Ok(format!("Timetable exported to {}", path.display()))
        }
        Some(("import", args)) => {
            let path = args
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow!("missing import file"))?;
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let imported = store.import_json(&contents)?;
            Ok(format!("Timetable imported ({imported} entries)"))
        }
        Some(("clear", _)) => {
            let removed = store.clear_all()?;
            Ok(format!("All entries cleared ({removed} removed)"))
        }
        Some((other, _)) => Err(anyhow!("unknown command `{other}`")),
        None => Err(anyhow!("no command given")),
    }
}

fn add<B: PersistenceBackend>(store: &mut TimetableStore<B>, args: &ArgMatches) -> Result<String> {
    let subject = required_str(args, "subject")?;
    let start = *args
        .get_one::<ClockTime>("start")
        .ok_or_else(|| anyhow!("missing start time"))?;
    let end = args
        .get_one::<ClockTime>("end")
        .copied()
        .unwrap_or_else(|| start.default_end());

    let mut draft = EntryDraft::new(subject, start, end);
    draft.homework = args.get_one::<String>("homework").cloned();

    let entry = store.add(draft)?;
    Ok(format!(
        "Entry added: {} {} ({})",
        entry.subject(),
        entry.time_range_label(),
        entry.id()
    ))
}

fn edit<B: PersistenceBackend>(store: &mut TimetableStore<B>, args: &ArgMatches) -> Result<String> {
    let id = required_str(args, "id")?;
    let mut draft = store
        .get(id)
        .map(Entry::to_draft)
        .ok_or_else(|| anyhow!("entry not found: {id}"))?;

    if let Some(subject) = args.get_one::<String>("subject") {
        draft.subject = subject.clone();
    }
    if let Some(start) = args.get_one::<ClockTime>("start") {
        draft.start = *start;
    }
    if let Some(end) = args.get_one::<ClockTime>("end") {
        draft.end = *end;
    }
    if let Some(homework) = args.get_one::<String>("homework") {
        draft.homework = Some(homework.clone());
    }

    let entry = store.edit(id, draft)?;
    Ok(format!(
        "Entry updated: {} {}",
        entry.subject(),
        entry.time_range_label()
    ))
}

/// One line per entry: id, time range, subject, category and homework.
pub fn render_list(entries: &[&Entry]) -> String {
    if entries.is_empty() {
        return "No entries.".to_string();
    }
    entries
        .iter()
        .map(|entry| format!("{}  {}", entry.id(), describe(entry)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hour rows from 12 AM to 11 PM with the entries that start in each hour.
pub fn render_grid(entries: &[Entry], compact: bool) -> String {
    let mut lines = Vec::new();
    for hour in 0..HOURS_PER_DAY {
        let label = format_hour_label(hour);
        let bucket: Vec<&Entry> = entries.iter().filter(|entry| entry.hour() == hour).collect();
        if bucket.is_empty() {
            if !compact {
                lines.push(format!("{label:>5} |"));
            }
            continue;
        }
        for (index, entry) in bucket.iter().enumerate() {
            let gutter = if index == 0 { label.as_str() } else { "" };
            lines.push(format!("{gutter:>5} | {}", describe(entry)));
        }
    }
    if lines.is_empty() {
        return "No entries.".to_string();
    }
    lines.join("\n")
}

fn render_stats<B: PersistenceBackend>(store: &TimetableStore<B>) -> String {
    let stats = store.stats();
    let mut lines = vec![
        format!("Total entries: {}", stats.total),
        format!("With homework: {}", stats.with_homework),
    ];
    lines.extend(
        EntryColor::ALL
            .iter()
            .map(|color| format!("{color}: {}", stats.count(*color))),
    );
    lines.join("\n")
}

fn describe(entry: &Entry) -> String {
    let mut line = format!(
        "{}  {} [{}]",
        entry.time_range_label(),
        entry.subject(),
        entry.color()
    );
    if let Some(homework) = entry.homework() {
        line.push_str(&format!("  homework: {homework}"));
    }
    line
}

fn required_str<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument `{name}`"))
}

fn subject_arg() -> Arg {
    Arg::new("subject").long("subject").short('s').value_name("SUBJECT")
}

fn homework_arg() -> Arg {
    Arg::new("homework").long("homework").value_name("TEXT")
}

fn clock_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("TIME")
        .value_parser(parse_clock_arg)
        .help("Time such as 9, 9:30, 14:45 or 2pm")
}

fn parse_clock_arg(value: &str) -> Result<ClockTime, String> {
    parse_clock_input(value).ok_or_else(|| format!("invalid time `{value}`"))
}
