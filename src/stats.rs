use core::fmt;

/// Running operation counters kept by a [`SplayTree`](crate::SplayTree).
///
/// - `compares` grows by two for every zig-zig or zig-zag step, plus one for every rotation that
///   rewrites a grandparent's child link.
/// - `zig_zigs` and `zig_zags` grow by one per step, regardless of the two rotations each issues.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SplayStats {
    pub compares: u64,
    pub zig_zigs: u64,
    pub zig_zags: u64,
}

impl SplayStats {
    pub const fn new() -> Self {
        SplayStats {
            compares: 0,
            zig_zigs: 0,
            zig_zags: 0,
        }
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for SplayStats {
    /// Renders one counter per line, e.g. `3 compares`, `1 Zig-Zig`, `0 Zig-Zags`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} compare{}", self.compares, plural(self.compares))?;
        writeln!(f, "{} Zig-Zig{}", self.zig_zigs, plural(self.zig_zigs))?;
        write!(f, "{} Zig-Zag{}", self.zig_zags, plural(self.zig_zags))
    }
}
