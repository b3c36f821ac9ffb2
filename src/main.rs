//! `ticketlog` (tl) - local task tracker backed by an append-only JSONL log.
//!
//! Tasks are appended as JSON lines; current state is the last line per ID.
//! No daemon, no database, no background processes.

use ticketlog::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
