//! Example 02: Overdue Workflow
//!
//! This example uses a settable clock to show how a task becomes overdue as
//! time passes, and how moving it to Done needs an explicit confirmation.
//!
//! Run with: cargo run --example 02_overdue_workflow

use chrono::NaiveDate;
use eyre::{Result, eyre};
use sprintboard::{FixedClock, MemorySlot, Record, Status, StoreError, Task, TaskFilter, TaskInput, TaskStore};

fn main() -> Result<()> {
    println!("SprintBoard Overdue Workflow Example");
    println!("====================================\n");

    let day = NaiveDate::from_ymd_opt(2025, 3, 3).ok_or_else(|| eyre!("invalid date"))?;
    let clock = FixedClock::on(day);
    let mut store = TaskStore::open(MemorySlot::new(), &clock);

    let task = store.create(&TaskInput::new("File quarterly report", day))?;
    println!("1. Created {:?} due {} (today is {})", task.title, task.due_date, store.today());

    clock.advance_days(2);
    let overdue: Vec<String> = store
        .query(&TaskFilter::default())
        .iter()
        .filter(|v| v.overdue)
        .map(|v| v.task.title.clone())
        .collect();
    println!("2. Two days later (today is {}), overdue: {:?}", store.today(), overdue);

    println!("3. Moving to Done without confirmation...");
    match store.move_to(&task.id, Status::Done, false) {
        Err(StoreError::Blocked { reason, .. }) => println!("   Blocked: {}", reason),
        Err(e) => return Err(e.into()),
        Ok(_) => println!("   Unexpectedly moved"),
    }
    println!("   Status is still {}", store.get(&task.id).map(|t| t.status).unwrap_or_default());

    println!("4. Moving again after the user confirms...");
    let done = store.move_to(&task.id, Status::Done, true)?;
    println!("   Status is now {}; overdue = {}", done.status, store.is_overdue(&done));

    println!("\n5. Persisted slot content:");
    if let Some(raw) = store.slot().raw(Task::collection_name()) {
        print!("{}", raw);
    }

    println!("\nExample complete!");
    Ok(())
}
