//! Demo: Backup and restore through the JSON document
//!
//! Exports one store, imports the document into another, and shows how
//! malformed documents and incomplete entries are handled.
//!
//! Run with: cargo run --example import_export

use eyre::Result;
use tasktracker::{
    MemoryBackend, Priority, TaskDraft, TaskStore, default_export_file_name, export_document, import_document,
};

fn main() -> Result<()> {
    println!("TaskTracker Import/Export Demo");
    println!("==============================\n");

    let mut source = TaskStore::open(MemoryBackend::new());
    source.create(TaskDraft::new("Renew passport", "book an appointment").priority(Priority::High));
    source.create(TaskDraft::new("Call Bob", "about the weekend"));

    println!("1. EXPORT - {} would contain:", default_export_file_name());
    let document = export_document(source.tasks())?;
    println!("{}\n", document);

    println!("2. IMPORT - Restoring into a fresh store...");
    let mut target = TaskStore::open(MemoryBackend::new());
    let tasks = import_document(&document)?;
    target.replace_all(tasks);
    println!("   Imported {} tasks\n", target.len());

    println!("3. IMPORT - Entries missing required fields are dropped...");
    let partial = r#"[{"id":"1","title":"x"},{"id":"2","title":"Complete","description":"has every field"}]"#;
    let tasks = import_document(partial)?;
    println!("   {} of 2 entries kept\n", tasks.len());

    println!("4. IMPORT - A non-array document is rejected...");
    match import_document(r#"{"not":"an array"}"#) {
        Ok(tasks) => println!("   Unexpectedly imported {} tasks", tasks.len()),
        Err(e) => println!("   {}", e),
    }
    println!("   Target still holds {} tasks\n", target.len());

    println!("Demo complete!");
    Ok(())
}
