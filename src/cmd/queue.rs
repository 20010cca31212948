//! Queue inspection and task transition commands.

use anyhow::Result;
use std::path::Path;

use agent_factory::queue::{QueueName, TaskBoard};

pub fn cmd_queue_status(project_dir: &Path, json: bool) -> Result<()> {
    let board = TaskBoard::open(project_dir);
    let counts = board.queue_counts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!();
    println!("{}", console::style("Queue Status").bold());
    println!();
    for (queue, count) in &counts {
        println!("- {queue}: {count}");
    }

    let in_progress = board.list_tasks(QueueName::InProgress)?;
    if !in_progress.is_empty() {
        println!();
        println!("{}", console::style("In Progress").bold());
        for task in &in_progress {
            println!("- {}: {} [{}]", task.filename, task.title, task.assigned);
        }
    }

    let review = board.list_tasks(QueueName::Review)?;
    if !review.is_empty() {
        println!();
        println!("{}", console::style("In Review").bold());
        for task in &review {
            println!("- {}: {}", task.filename, task.title);
        }
    }
    println!();
    Ok(())
}

pub fn cmd_queue_list(project_dir: &Path, queue: QueueName, json: bool) -> Result<()> {
    let tasks = TaskBoard::open(project_dir).list_tasks(queue)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    println!();
    println!(
        "{}",
        console::style(format!("{queue} ({} tasks)", tasks.len())).bold()
    );
    println!();
    for task in &tasks {
        let mut line = format!("- {}: {}", task.filename, task.title);
        if !task.assigned.is_empty() && task.assigned != "none" {
            line.push_str(&format!(" [{}]", task.assigned));
        }
        if !task.domain.is_empty() {
            line.push_str(&format!(" ({})", task.domain));
        }
        println!("{line}");
    }
    if tasks.is_empty() {
        println!("No tasks in this queue.");
    }
    println!();
    Ok(())
}

pub fn cmd_task_claim(project_dir: &Path, filename: &str, worker: Option<&str>) -> Result<()> {
    let worker = TaskBoard::open(project_dir).claim(filename, worker)?;
    println!("Task {filename} claimed by {worker} and moved to in-progress.");
    Ok(())
}

pub fn cmd_task_submit(project_dir: &Path, filename: &str) -> Result<()> {
    TaskBoard::open(project_dir).submit(filename)?;
    println!("Task {filename} submitted for review.");
    Ok(())
}

pub fn cmd_task_reject(project_dir: &Path, filename: &str, reason: Option<&str>) -> Result<()> {
    TaskBoard::open(project_dir).reject(filename)?;
    match reason {
        Some(reason) => println!("Task {filename} rejected: {reason}"),
        None => println!("Task {filename} rejected and returned to todo."),
    }
    Ok(())
}

pub fn cmd_task_done(project_dir: &Path, filename: &str) -> Result<()> {
    TaskBoard::open(project_dir).done(filename)?;
    println!("Task {filename} approved and moved to done.");
    Ok(())
}

pub fn cmd_task_return(project_dir: &Path, filename: &str) -> Result<()> {
    TaskBoard::open(project_dir).return_task(filename)?;
    println!("Task {filename} returned to todo.");
    Ok(())
}
