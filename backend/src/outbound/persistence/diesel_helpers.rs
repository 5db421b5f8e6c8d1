//! Small conversions shared by the Diesel repositories.

use pagination::PageRequest;

/// `(limit, offset)` for a SQL page query.
pub fn page_bounds(request: PageRequest) -> (i64, i64) {
    let limit = i64::from(request.limit());
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Convert a `COUNT(*)` result to the unsigned total used by [`pagination::Page`].
pub fn row_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Decode rows, stopping at the first failure.
pub fn collect_rows<R, T, E>(
    rows: Vec<R>,
    decode: impl Fn(R) -> Result<T, E>,
) -> Result<Vec<T>, E> {
    rows.into_iter().map(decode).collect()
}
