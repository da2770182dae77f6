/*!
# Ackermann Table

A table of the values of Ackermann's function `A(i, j)` that are at most a
given bound `N`, together with the inverse lookups used by the split-findmin
structure: superelement sizes are `2 * A(i, level)` and the level of a
superelement is the largest `j` with `2 * A(i, j)` not exceeding the number of
still unprocessed elements.

The recurrence is `A(i, 0) = 2` for every `i`, `A(1, 1) = 2`,
`A(1, j) = 2 * A(1, j - 1)` and `A(i, j) = A(i - 1, A(i, j - 1))`, so row 1
holds the powers of two and row 2 the iterated powers `2↑↑(j + 1)`. Rows are
filled until their first entry exceeds `N`; because `A` explodes, only a
handful of rows ever materialize. Row indices below the filled range simply
read as absent, which the split-findmin recursion relies on when its list
index drops beneath the table.
*/

use std::collections::HashMap;

/// Table of Ackermann values up to a fixed bound.
#[derive(Debug)]
pub struct AckermannTable {
    table: HashMap<(i64, i64), u64>,
}

impl AckermannTable {
    /// Builds the table of all values `A(i, j) <= maximum_table_value`.
    pub fn new(maximum_table_value: u64) -> Self {
        let mut this = Self {
            table: HashMap::new(),
        };
        this.fill(maximum_table_value);
        this
    }

    fn fill(&mut self, maximum_table_value: u64) {
        let mut i: i64 = 1;
        let mut j: i64 = 2;

        self.set_value(1, 1, 2);

        loop {
            let new_value = if i == 1 {
                self.get_value(1, j - 1).map(|v| v * 2)
            } else {
                self.get_value(i, j - 1)
                    .and_then(|arg| self.get_value(i - 1, arg as i64))
            };

            match new_value {
                Some(v) if v <= maximum_table_value => {
                    self.set_value(i, j, v);
                    j += 1;
                }
                _ => {
                    if j == 1 {
                        return;
                    }
                    i += 1;
                    j = 1;
                }
            }
        }
    }

    fn set_value(&mut self, i: i64, j: i64, value: u64) {
        self.table.insert((i, j), value);
    }

    /// Returns `A(i, j)` if it is in range, with `A(i, 0) = 2` for every `i`.
    pub fn get_value(&self, i: i64, j: i64) -> Option<u64> {
        if j == 0 {
            Some(2)
        } else {
            self.table.get(&(i, j)).copied()
        }
    }

    /// Inverse lookup.
    ///
    /// - For `n >= 4`: the largest `j` with `2 * A(m, j) <= n` (at least 0,
    ///   since `A(m, 0) = 2`).
    /// - Otherwise, for `m >= n`: the smallest row index `i` whose entry at
    ///   `m / n` is out of range.
    /// - Otherwise `-1`.
    pub fn get_inverse(&self, m: i64, n: u64) -> i64 {
        if n >= 4 {
            let mut j: i64 = 0;
            loop {
                match self.get_value(m, j) {
                    Some(v) if 2 * v <= n => j += 1,
                    _ => return j - 1,
                }
            }
        } else if n > 0 && m >= n as i64 {
            let quotient = m / n as i64;
            let mut i: i64 = 1;
            while self.get_value(i, quotient).is_some() {
                i += 1;
            }
            i
        } else {
            -1
        }
    }
}
