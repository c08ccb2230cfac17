//! Demo: Basic task operations
//!
//! Creates, edits, toggles and deletes tasks in a file-backed store, then
//! shows the sorted view and status counts.
//!
//! Run with: cargo run --example basic_usage

use eyre::Result;
use tasktracker::{FileBackend, Priority, StatusFilter, TaskDraft, TaskPatch, TaskStore, ViewQuery};

fn main() -> Result<()> {
    // Create a temporary directory for this demo
    let temp_dir = tempfile::tempdir()?;
    let store_path = temp_dir.path().to_path_buf();

    println!("TaskTracker Basic Usage Demo");
    println!("============================\n");
    println!("Store path: {}\n", store_path.display());

    let mut store = TaskStore::open(FileBackend::open(&store_path)?);

    // CREATE: drafts go through validation first, like a form would
    println!("1. CREATE - Adding three tasks...");
    let milk = store.create(TaskDraft::new("Buy milk", "groceries for the week").validate()?);
    let rent = store.create(
        TaskDraft::new("Pay rent", "transfer to landlord")
            .priority(Priority::High)
            .validate()?,
    );
    let plants = store.create(
        TaskDraft::new("Water plants", "both balconies")
            .priority(Priority::Low)
            .validate()?,
    );
    println!("   Created {}, {}, {}\n", milk.id, rent.id, plants.id);

    // Validation failures never reach the store
    println!("2. VALIDATE - Rejecting a too-short title...");
    match TaskDraft::new("ok", "description").validate() {
        Ok(_) => println!("   Unexpectedly valid"),
        Err(e) => println!("   Rejected: {}\n", e),
    }

    // UPDATE + TOGGLE
    println!("3. UPDATE - Raising milk to high priority and completing rent...");
    store.update(
        &milk.id,
        TaskPatch {
            priority: Some(Priority::High),
            ..TaskPatch::default()
        },
    );
    store.toggle_complete(&rent.id);
    println!();

    // VIEW: pending first, then priority, then newest
    println!("4. VIEW - All tasks in display order:");
    for task in store.view(&ViewQuery::default()) {
        let mark = if task.completed { "x" } else { " " };
        println!("   [{}] {:<6} {}", mark, task.priority, task.title);
    }
    let counts = store.counts();
    println!(
        "   all: {}  pending: {}  completed: {}\n",
        counts.all, counts.pending, counts.completed
    );

    println!("5. SEARCH - Pending tasks mentioning 'BALCON':");
    for task in store.view(&ViewQuery::new(StatusFilter::Pending, "BALCON")) {
        println!("   - {}", task.title);
    }
    println!();

    // DELETE
    println!("6. DELETE - Removing the plants task...");
    store.delete(&plants.id);

    // Reopen to show the collection was persisted
    let reopened = TaskStore::open(FileBackend::open(&store_path)?);
    println!("   Reopened store holds {} tasks\n", reopened.len());

    println!("Demo complete!");
    Ok(())
}
