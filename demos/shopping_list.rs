//! Example: two clients editing one shopping list through a shared store.
//!
//! Run with `RUST_LOG=sibling_kit=debug` to also see the store's own events.

use sibling_kit::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn show(session: &ClientSession<&str, &str>) {
    let Some(stored) = session.last_stored() else {
        return;
    };
    info!(
        client = session.name(),
        version = %stored.last_version,
        entry = ?stored.entry.versions(),
        local = ?session.local_value(),
        "after add"
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let store = VersionStore::new();
    let mut c1 = ClientSession::new("C1");
    let mut c2 = ClientSession::new("C2");

    c1.add(&store, "list", "milk").expect("in-memory store");
    show(&c1);

    // C2 has never read the list, so its write is a blind sibling
    c2.add(&store, "list", "eggs").expect("in-memory store");
    show(&c2);

    c1.add(&store, "list", "flour").expect("in-memory store");
    show(&c1);

    // Base is version 3, so version 2 gets overwritten in place
    c1.add(&store, "list", "bacon").expect("in-memory store");
    show(&c1);

    c2.add(&store, "list", "ham").expect("in-memory store");
    show(&c2);

    let entry = store.get(&"list").expect("list was written");
    info!(
        siblings = entry.len(),
        merged = ?SetUnion.merge_entry(&entry),
        "final state"
    );
}
