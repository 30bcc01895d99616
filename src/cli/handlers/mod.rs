use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, Overrides};
use crate::io::remote::Remote;
use crate::io::rest::RestClient;
use crate::ops::cache::EntityCache;
use crate::ops::outcome::Outcome;
use crate::ops::query::{self, ListOptions, TemporalFilter};
use crate::ops::resolve::Named;
use crate::ops::task_ops::{self, CreateTask, ReminderStatus, TaskTarget, UpdateTask};
use crate::ops::{label_ops, project_ops, section_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Global flags every command reads
struct Context {
    json: bool,
    display: ViewOptions,
    project: Option<String>,
    section: Option<String>,
    subtasks: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let settings = config_io::load_settings(Overrides {
        api_key: cli.api_key.clone(),
        strip_emojis: cli.strip_emojis,
    })?;
    log::debug!("api {} sync {}", settings.api_url, settings.sync_url);
    let client = RestClient::new(
        &settings.token,
        &settings.api_url,
        &settings.sync_url,
        settings.timeout,
    )?;

    let ctx = Context {
        json: cli.json,
        display: ViewOptions {
            show_ids: cli.ids,
            strip_emojis: settings.strip_emojis,
        },
        project: cli.project,
        section: cli.section,
        subtasks: cli.subtasks,
    };
    run(&client, &ctx, cli.command)
}

fn run(remote: &dyn Remote, ctx: &Context, command: Commands) -> CmdResult {
    let mut cache = EntityCache::new(remote);
    let cache = &mut cache;
    match command {
        Commands::Task(cmd) => match cmd.action {
            TaskAction::List(args) => {
                let temporal = TemporalFilter {
                    today: args.today,
                    overdue: args.overdue,
                    recurring: args.recurring,
                };
                cmd_task_list(cache, ctx, temporal)
            }
            TaskAction::Today => cmd_task_list(cache, ctx, TemporalFilter::due_now()),
            TaskAction::Create(args) => cmd_task_create(cache, ctx, args),
            TaskAction::Update(args) => cmd_task_update(cache, ctx, args),
            TaskAction::Done(args) => cmd_task_done(cache, ctx, args),
            TaskAction::Delete(args) => cmd_task_delete(cache, ctx, args),
        },
        Commands::Project(cmd) => cmd_project(cache, ctx, cmd.action),
        Commands::Section(cmd) => cmd_section(cache, ctx, cmd.action),
        Commands::Label(cmd) => cmd_label(cache, ctx, cmd.action),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unwrap an outcome at the command boundary. Unresolvable scopes become
/// errors; duplicates and missing targets are reported and end the command
/// successfully.
fn settle<T>(outcome: Outcome<T>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Done(v) => Ok(Some(v)),
        Outcome::Soft(soft) if soft.is_user_error() => Err(soft.to_string().into()),
        Outcome::Soft(soft) => {
            println!("{}", soft);
            Ok(None)
        }
    }
}

fn print_entities<T: Named>(items: &[T], ctx: &Context, what: &str) -> CmdResult {
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entities_to_json(items, ctx.display))?
        );
    } else if items.is_empty() {
        println!("no {} found", what);
    } else {
        for line in format_entity_table(items, ctx.display) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

fn cmd_task_list(cache: &mut EntityCache<'_>, ctx: &Context, temporal: TemporalFilter) -> CmdResult {
    let opts = ListOptions {
        project: ctx.project.clone(),
        section: ctx.section.clone(),
        include_subtasks: ctx.subtasks,
        temporal,
    };
    let today = Local::now().date_naive();
    let Some(view) = settle(query::list_tasks(cache, &opts, today)?)? else {
        return Ok(());
    };

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view_to_json(&view, ctx.display))?
        );
    } else if view.rows.is_empty() {
        println!("no tasks found");
    } else {
        for line in format_task_table(&view, ctx.display) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_task_create(cache: &mut EntityCache<'_>, ctx: &Context, args: TaskCreateArgs) -> CmdResult {
    let req = CreateTask {
        content: args.content,
        project: ctx.project.clone(),
        section: ctx.section.clone(),
        priority: args.priority,
        due: args.due,
        reminder: args.reminder,
        force: args.force,
    };
    let Some(created) = settle(task_ops::create_task(cache, &req)?)? else {
        return Ok(());
    };

    println!(
        "created task '{}' (ID: {})",
        created.task.content, created.task.id
    );
    match created.reminder {
        ReminderStatus::NotRequested => {}
        ReminderStatus::Added => println!("reminder added"),
        ReminderStatus::Failed(e) => {
            eprintln!("warning: task created, but adding the reminder failed: {}", e)
        }
    }
    Ok(())
}

fn cmd_task_update(cache: &mut EntityCache<'_>, ctx: &Context, args: TaskUpdateArgs) -> CmdResult {
    if args.new_content.is_none() && args.priority.is_none() && args.due.is_none() {
        return Err("nothing to update: pass --new-content, --priority or --due".into());
    }
    let req = UpdateTask {
        content: args.content,
        project: ctx.project.clone(),
        new_content: args.new_content,
        priority: args.priority,
        due: args.due,
    };
    if let Some(task) = settle(task_ops::update_task(cache, &req)?)? {
        println!("updated task '{}' (ID: {})", task.content, task.id);
    }
    Ok(())
}

fn cmd_task_done(cache: &mut EntityCache<'_>, ctx: &Context, args: TaskContentArg) -> CmdResult {
    let target = TaskTarget {
        content: args.content,
        project: ctx.project.clone(),
    };
    if let Some(task) = settle(task_ops::close_task(cache, &target)?)? {
        println!("completed task '{}' (ID: {})", task.content, task.id);
    }
    Ok(())
}

fn cmd_task_delete(cache: &mut EntityCache<'_>, ctx: &Context, args: TaskContentArg) -> CmdResult {
    let target = TaskTarget {
        content: args.content,
        project: ctx.project.clone(),
    };
    if let Some(task) = settle(task_ops::delete_task(cache, &target)?)? {
        println!("deleted task '{}' (ID: {})", task.content, task.id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projects, sections, labels
// ---------------------------------------------------------------------------

fn cmd_project(cache: &mut EntityCache<'_>, ctx: &Context, action: EntityAction) -> CmdResult {
    match action {
        EntityAction::List => print_entities(&project_ops::list_projects(cache)?, ctx, "projects"),
        EntityAction::Create(args) => {
            if let Some(p) = settle(project_ops::create_project(cache, &args.name)?)? {
                println!("created project '{}' (ID: {})", p.name, p.id);
            }
            Ok(())
        }
        EntityAction::Update(args) => {
            if let Some(p) = settle(project_ops::update_project(cache, &args.name, &args.new_name)?)? {
                println!("renamed project '{}' to '{}' (ID: {})", args.name, p.name, p.id);
            }
            Ok(())
        }
        EntityAction::Delete(args) => {
            if let Some(p) = settle(project_ops::delete_project(cache, &args.name)?)? {
                println!("deleted project '{}' (ID: {})", p.name, p.id);
            }
            Ok(())
        }
    }
}

fn cmd_section(cache: &mut EntityCache<'_>, ctx: &Context, action: EntityAction) -> CmdResult {
    let project = ctx.project.as_deref();
    match action {
        EntityAction::List => {
            if let Some(sections) = settle(section_ops::list_sections(cache, project)?)? {
                print_entities(&sections, ctx, "sections")?;
            }
            Ok(())
        }
        EntityAction::Create(args) => {
            if let Some(s) = settle(section_ops::create_section(cache, project, &args.name)?)? {
                println!("created section '{}' (ID: {})", s.name, s.id);
            }
            Ok(())
        }
        EntityAction::Update(args) => {
            let out = section_ops::update_section(cache, project, &args.name, &args.new_name)?;
            if let Some(s) = settle(out)? {
                println!("renamed section '{}' to '{}' (ID: {})", args.name, s.name, s.id);
            }
            Ok(())
        }
        EntityAction::Delete(args) => {
            if let Some(s) = settle(section_ops::delete_section(cache, project, &args.name)?)? {
                println!("deleted section '{}' (ID: {})", s.name, s.id);
            }
            Ok(())
        }
    }
}

fn cmd_label(cache: &mut EntityCache<'_>, ctx: &Context, action: EntityAction) -> CmdResult {
    match action {
        EntityAction::List => print_entities(&label_ops::list_labels(cache)?, ctx, "labels"),
        EntityAction::Create(args) => {
            if let Some(l) = settle(label_ops::create_label(cache, &args.name)?)? {
                println!("created label '{}' (ID: {})", l.name, l.id);
            }
            Ok(())
        }
        EntityAction::Update(args) => {
            if let Some(l) = settle(label_ops::update_label(cache, &args.name, &args.new_name)?)? {
                println!("renamed label '{}' to '{}' (ID: {})", args.name, l.name, l.id);
            }
            Ok(())
        }
        EntityAction::Delete(args) => {
            if let Some(l) = settle(label_ops::delete_label(cache, &args.name)?)? {
                println!("deleted label '{}' (ID: {})", l.name, l.id);
            }
            Ok(())
        }
    }
}
