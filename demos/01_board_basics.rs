//! Example 01: Board Basics
//!
//! This example walks through create, edit, move, query and delete on a
//! board persisted to a JSONL slot.
//!
//! Run with: cargo run --example 01_board_basics

use chrono::Duration;
use eyre::Result;
use sprintboard::{Clock, JsonlSlot, Priority, SortOrder, Status, SystemClock, TaskFilter, TaskInput, TaskStore};

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let store_path = temp_dir.path().to_path_buf();

    println!("SprintBoard Basics Example");
    println!("==========================\n");
    println!("Store path: {}\n", store_path.display());

    let mut store = TaskStore::open(JsonlSlot::open(&store_path)?, SystemClock);
    let today = SystemClock.today();

    // CREATE
    println!("1. CREATE - Adding three tasks...");
    let api = store.create(
        &TaskInput::new("Design REST endpoints", today + Duration::days(3))
            .priority(Priority::P1)
            .tags("API, backend, api"),
    )?;
    let docs = store.create(&TaskInput::new("Update onboarding docs", today + Duration::days(7)).tags("docs"))?;
    let ui = store.create(
        &TaskInput::new("Polish settings page", today + Duration::days(3))
            .priority(Priority::P3)
            .tags("ui, frontend"),
    )?;
    println!("   Created {} tasks; tags on first: {:?}\n", store.len(), api.tags);

    // VALIDATION
    println!("2. VALIDATION - Rejected inputs...");
    for input in [
        TaskInput::new("Tiny", today),
        TaskInput::new("design rest ENDPOINTS", today + Duration::days(3)),
        TaskInput::new("Back to the past", today - Duration::days(1)),
    ] {
        match store.create(&input) {
            Ok(task) => println!("   Unexpectedly created {}", task.id),
            Err(e) => println!("   {:?} -> {}", input.title, e),
        }
    }
    println!();

    // EDIT
    println!("3. EDIT - Renaming the docs task...");
    let mut form = store.begin_edit(&docs.id)?;
    form.title = "Rewrite onboarding docs".to_string();
    let docs = store.submit(&form)?;
    println!("   Now titled: {}\n", docs.title);

    // MOVE
    println!("4. MOVE - Dragging cards across columns...");
    store.move_to(&api.id, Status::InProgress, false)?;
    store.move_to(&ui.id, Status::Done, false)?;
    for status in Status::ALL {
        let projection = store.query(&TaskFilter::default());
        let titles: Vec<&str> = projection.column(status).map(|v| v.task.title.as_str()).collect();
        println!("   {:<12} {:?}", status.as_str(), titles);
    }
    println!();

    // QUERY
    println!("5. QUERY - Filters and ordering...");
    let newest_first = store.query(&TaskFilter::default().sort(SortOrder::Desc));
    for view in newest_first.iter() {
        println!("   {} {} ({})", view.task.due_date, view.task.title, view.task.priority);
    }
    let p1 = store.query(&TaskFilter::default().priority(Priority::P1));
    println!("   P1 tasks: {}", p1.len());
    println!("   Tags in use: {:?}\n", store.distinct_tags());

    // DELETE
    println!("6. DELETE - Removing the settings task...");
    store.delete(&ui.id)?;
    println!("   Remaining tasks: {}\n", store.len());

    // Reopen from disk
    let reopened = TaskStore::open(JsonlSlot::open(&store_path)?, SystemClock);
    println!("Reopened store has {} tasks", reopened.len());

    println!("\nExample complete!");
    Ok(())
}
