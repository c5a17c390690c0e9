use pathviz_core::Pos;

/// Manhattan (L1) distance between two positions.
///
/// Admissible and consistent on a 4-connected unit-cost grid.
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}
