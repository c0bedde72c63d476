use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lane_store::{LaneStore, StoreError};
use crate::model::board::Board;
use crate::model::task::{Task, TaskError, TaskRecord};
use crate::ops::task_ops::{self, TaskUpdate};
use crate::ops::{import, stats};
use crate::parse::convert_legacy_tags;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let store = open_store(cli.config.as_deref(), cli.base_dir.as_deref())?;

    match cli.command {
        // Read commands
        Commands::List(args) => cmd_list(&store, args, json),
        Commands::Show(args) => cmd_show(&store, args, json),
        Commands::Lanes => cmd_lanes(&store, json),
        Commands::Stats => cmd_stats(&store, json),

        // Write commands
        Commands::Add(args) => cmd_add(&store, args, json),
        Commands::AddJson(args) => cmd_add_json(&store, args, json),
        Commands::Update(args) => cmd_update(&store, args, json),
        Commands::Mv(args) => cmd_mv(&store, args),
        Commands::AddLane(args) => cmd_add_lane(&store, args),

        // Maintenance
        Commands::Split => cmd_split(&store, json),
        Commands::Import(args) => cmd_import(&store, args, json),
        Commands::EmptyTrash => cmd_empty_trash(&store),
        Commands::MigrateTags(args) => cmd_migrate_tags(&store, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the config, apply the `-C` override and open the board.
fn open_store(config_path: Option<&str>, base_dir: Option<&str>) -> Result<LaneStore, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let mut config = config_io::resolve_config(config_path.map(Path::new), &cwd)?;
    if let Some(dir) = base_dir {
        config.base_dir = PathBuf::from(dir);
    }
    Ok(LaneStore::open(&config)?)
}

fn find_task(board: &Board, title: &str) -> Result<Task, TaskError> {
    task_ops::find_task(board, title)
        .cloned()
        .ok_or_else(|| TaskError::NotFound(title.to_string()))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &LaneStore, args: ListArgs, json: bool) -> CmdResult {
    let board = store.load_board()?;
    let pattern = args
        .search
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| format!("invalid search pattern: {}", e))?;
    let tasks = task_ops::filter_tasks(
        &board,
        args.lane.as_deref(),
        args.tag.as_deref(),
        pattern.as_ref(),
    );

    if json {
        return print_json(&TaskListJson {
            count: tasks.len(),
            tasks: tasks.iter().map(|t| task_to_json(t, store)).collect(),
            filters: FiltersJson {
                lane: args.lane,
                tag: args.tag,
                search: args.search,
            },
        });
    }

    if tasks.is_empty() {
        println!("no tasks");
    }
    for line in format_task_list(&tasks) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_show(store: &LaneStore, args: ShowArgs, json: bool) -> CmdResult {
    let board = store.load_board()?;
    let task = find_task(&board, &args.title)?;
    if json {
        return print_json(&task_to_json(&task, store));
    }
    for line in format_task_detail(&task) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_lanes(store: &LaneStore, json: bool) -> CmdResult {
    let board = store.load_board()?;
    if json {
        return print_json(&lanes_to_json(&board));
    }
    for (name, tasks) in &board.lanes {
        println!("{} ({})", name, tasks.len());
    }
    Ok(())
}

fn cmd_stats(store: &LaneStore, json: bool) -> CmdResult {
    let board = store.load_board()?;
    let stats = stats::board_stats(&board);
    if json {
        return print_json(&stats);
    }
    for line in format_stats(&stats) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &LaneStore, args: AddArgs, json: bool) -> CmdResult {
    task_ops::validate_title(&args.title)?;
    let mut task = Task::new(args.title, args.content, args.lane);
    if !args.tags.is_empty() {
        task.tags = Some(
            args.tags
                .iter()
                .map(|t| task_ops::validate_tag(t))
                .collect::<Result<Vec<_>, _>>()?,
        );
    }
    if let Some(ref due) = args.due {
        task.due_date = task_ops::parse_due_arg(due)?;
    }
    create_task(store, task, json)
}

fn cmd_add_json(store: &LaneStore, args: AddJsonArgs, json: bool) -> CmdResult {
    let record: TaskRecord =
        serde_json::from_str(&args.json).map_err(|e| format!("invalid JSON: {}", e))?;
    let task = Task::from_record(record)?;
    task_ops::validate_task(&task)?;
    create_task(store, task, json)
}

fn create_task(store: &LaneStore, task: Task, json: bool) -> CmdResult {
    store.create(&task)?;
    if json {
        return print_json(&task_to_json(&task, store));
    }
    println!("created task '{}' in lane '{}'", task.title, task.lane);
    Ok(())
}

fn cmd_update(store: &LaneStore, args: UpdateArgs, json: bool) -> CmdResult {
    let board = store.load_board()?;
    let mut task = find_task(&board, &args.title)?;
    let old_location = task.location();

    task_ops::apply_update(
        &mut task,
        TaskUpdate {
            content: args.content,
            tags: args.tags,
            title: args.new_title,
            due_date: args.due,
        },
    )?;

    if task.location() == old_location {
        store.write(&task)?;
    } else {
        store.create(&task)?;
        store.remove(&old_location)?;
    }

    if json {
        return print_json(&task_to_json(&task, store));
    }
    println!("updated task '{}'", task.title);
    Ok(())
}

fn cmd_mv(store: &LaneStore, args: MvArgs) -> CmdResult {
    let from = store.move_task(&args.title, &args.lane)?;
    println!("moved task '{}' from '{}' to '{}'", args.title, from, args.lane);
    Ok(())
}

fn cmd_add_lane(store: &LaneStore, args: AddLaneArgs) -> CmdResult {
    store.add_lane(&args.name)?;
    println!("added lane: {}", args.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

fn cmd_split(store: &LaneStore, json: bool) -> CmdResult {
    let report = store.split_all()?;
    let total_after = store.load_board()?.total_tasks();

    if json {
        let message = if report.originals.is_empty() {
            "no tasks found with [[split]] marker"
        } else {
            "split operation completed"
        };
        return print_json(&SplitJson {
            message: message.to_string(),
            tasks_split: report.originals.len(),
            original_tasks: report.originals,
            total_tasks_after: total_after,
        });
    }

    if report.originals.is_empty() {
        println!("no tasks found with [[split]] marker");
        return Ok(());
    }
    println!(
        "split {} tasks into {} fragments; originals moved to trash",
        report.originals.len(),
        report.fragments.len()
    );
    for location in &report.fragments {
        println!("  {}", location.display());
    }
    Ok(())
}

fn cmd_import(store: &LaneStore, args: ImportArgs, json: bool) -> CmdResult {
    let file = fs::File::open(&args.file).map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let result = import::import_csv(file)?;

    let mut skipped: Vec<(usize, String)> = result
        .skipped
        .iter()
        .map(|(row, e)| (*row, e.to_string()))
        .collect();
    let mut created = Vec::new();
    for (row, task) in result.tasks {
        match store.create(&task) {
            Ok(_) => created.push(task),
            Err(e @ StoreError::TaskExists { .. }) => {
                tracing::warn!(row, error = %e, "skipping CSV row");
                skipped.push((row, e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }
    skipped.sort_by_key(|(row, _)| *row);

    if json {
        return print_json(&ImportJson {
            created: created.iter().map(|t| task_to_json(t, store)).collect(),
            skipped: skipped
                .into_iter()
                .map(|(row, reason)| SkippedRowJson { row, reason })
                .collect(),
        });
    }

    println!("imported {} tasks from {}", created.len(), args.file);
    for task in &created {
        println!("  {}/{}", task.lane, task.title);
    }
    for (row, reason) in &skipped {
        println!("  skipped row {}: {}", row, reason);
    }
    Ok(())
}

fn cmd_empty_trash(store: &LaneStore) -> CmdResult {
    let removed = store.empty_trash()?;
    println!("removed {} files from trash", removed);
    Ok(())
}

fn cmd_migrate_tags(store: &LaneStore, args: MigrateTagsArgs) -> CmdResult {
    let mut converted = 0;
    for lane in store.lane_names()? {
        for (text, location) in store.read_all(&lane)? {
            let Some(new_text) = convert_legacy_tags(&text) else {
                continue;
            };
            converted += 1;
            if args.dry_run {
                println!("would convert {}", location.display());
                continue;
            }
            store.write_text(&location.with_extension("md.bak"), &text)?;
            store.write_text(&location, &new_text)?;
            println!("converted {}", location.display());
        }
    }
    let verb = if args.dry_run { "would convert" } else { "converted" };
    println!("{} {} files", verb, converted);
    Ok(())
}
