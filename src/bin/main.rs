use std::env;

use cordyceps_splay::SplayTree;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SPLAY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cordyceps_splay=debug,info"
        } else {
            "info"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() {
    init_tracing();

    let mut tree = SplayTree::new();

    tree.insert(5);
    tree.assert_invariants();
    info!(traversal = %tree.post_order_string(), "a5");

    tree.insert(3);
    tree.assert_invariants();
    info!(traversal = %tree.post_order_string(), "a3");

    tree.insert(8);
    tree.assert_invariants();
    info!(traversal = %tree.post_order_string(), "a8");

    let found = tree.search(3);
    tree.assert_invariants();
    info!(found, traversal = %tree.post_order_string(), "f3");

    for key in [1, 2, 4, 6, 7, 9] {
        tree.insert(key);
        tree.assert_invariants();
    }
    info!(traversal = %tree.post_order_string(), size = tree.size(), "filled");

    let removed = tree.remove(8);
    tree.assert_invariants();
    info!(removed, traversal = %tree.post_order_string(), size = tree.size(), "r8");

    println!("{}", tree.post_order_string());
    println!("{}", tree.stats());

    drop(tree);
}
