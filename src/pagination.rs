//! Display grouping for grid views and page math for the admin queue.

use itertools::Itertools;

/// Grid width for event cards on the public home page.
pub const EVENT_BATCH_SIZE: usize = 3;
/// Grid width for club cards on the public home page.
pub const CLUB_BATCH_SIZE: usize = 6;
/// Page size of the admin pending-approval queue.
pub const PENDING_PAGE_SIZE: i64 = 10;

/// Groups items into fixed-size chunks for grid display. The last chunk is
/// padded with `None` so every chunk has exactly `size` slots; a `None` is an
/// empty display slot, not an error.
pub fn batch<T>(items: Vec<T>, size: usize) -> Vec<Vec<Option<T>>> {
    assert!(size > 0, "batch size must be positive");

    let mut batches = Vec::with_capacity((items.len() + size - 1) / size);
    for chunk in &items.into_iter().chunks(size) {
        let mut slots: Vec<Option<T>> = chunk.map(Some).collect();
        slots.resize_with(size, || None);
        batches.push(slots);
    }
    batches
}

/// Number of pages for `total` items, never less than one: an empty queue
/// still renders as a single empty page.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    std::cmp::max(1, (total + per_page - 1) / per_page)
}

/// Resolves a raw `?page=` parameter to a valid page number. Missing or
/// non-numeric input falls back to the first page; anything out of range is
/// clamped to the nearest valid page.
pub fn clamp_page(requested: Option<&str>, pages: i64) -> i64 {
    requested
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .clamp(1, pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_pads_the_final_chunk() {
        let batches = batch(vec![1, 2, 3, 4, 5], 3);
        assert_eq!(
            batches,
            vec![
                vec![Some(1), Some(2), Some(3)],
                vec![Some(4), Some(5), None],
            ]
        );
    }

    #[test]
    fn batch_chunk_count_is_ceiling() {
        assert_eq!(batch::<i32>(vec![], 3).len(), 0);
        assert_eq!(batch(vec![1, 2, 3], 3).len(), 1);
        assert_eq!(batch(vec![1, 2, 3, 4], 3).len(), 2);
        assert_eq!(batch((1..=13).collect(), 6).len(), 3);
    }

    #[test]
    fn batch_preserves_order_and_items() {
        let items: Vec<i32> = (1..=7).collect();
        let flattened: Vec<i32> = batch(items.clone(), 3)
            .into_iter()
            .flatten()
            .flatten()
            .collect();
        assert_eq!(flattened, items);
    }

    #[test]
    fn page_count_has_a_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn page_clamps_to_nearest_valid() {
        assert_eq!(clamp_page(None, 5), 1);
        assert_eq!(clamp_page(Some("abc"), 5), 1);
        assert_eq!(clamp_page(Some("0"), 5), 1);
        assert_eq!(clamp_page(Some("-2"), 5), 1);
        assert_eq!(clamp_page(Some("3"), 5), 3);
        assert_eq!(clamp_page(Some("99"), 5), 5);
        // empty queue still has exactly one page
        assert_eq!(clamp_page(Some("4"), total_pages(0, 10)), 1);
    }
}
