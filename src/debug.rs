use core::{fmt, ptr::NonNull};
use std::collections::VecDeque;

use crate::{key_of, links, SplayNode, SplayTree};

impl SplayTree {
    /// Writes the tree shape as a Graphviz digraph, one rank per tree level.
    ///
    /// Missing children are drawn as points so left and right stay distinguishable.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            // Duplicate keys are allowed, so nodes are named by visit order instead of by key.
            Node(NonNull<SplayNode>, usize),
            Missing(usize),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root, 0));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut next_id = 1;
        let mut missing = 0;
        let mut edges = String::new();

        loop {
            use fmt::Write;
            let remaining = queue.len();
            if remaining == 0 {
                break;
            }

            write!(w, "{{rank=same; ")?;

            let level: Vec<Item> = queue.drain(..remaining).collect();

            for item in level {
                let (node, id) = match item {
                    Item::Node(node, id) => (node, id),
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let key = unsafe { key_of(node) };
                write!(w, "\"graph{name}-{id}\" [label=\"{key}\"]; ")?;

                for child in unsafe { [links(node).left(), links(node).right()] } {
                    match child {
                        Some(child) => {
                            queue.push_back(Item::Node(child, next_id));
                            writeln!(edges, "\"graph{name}-{id}\" -> \"graph{name}-{next_id}\";")?;
                            next_id += 1;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                edges,
                                "\"graph{name}-{id}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&edges)?;

        w.write_str(" }\n}")
    }
}
