#[cfg(test)]
mod tests {
    use crate::models::page::page_bounds;

    #[test]
    fn first_page_starts_at_offset_zero() {
        assert_eq!(page_bounds(20, 0), (21, 0));
    }

    #[test]
    fn offset_skips_whole_pages() {
        assert_eq!(page_bounds(20, 3), (21, 60));
    }

    #[test]
    fn max_page_number_does_not_overflow() {
        assert_eq!(page_bounds(20, u16::MAX), (21, 1_310_700));
    }

    #[test]
    fn max_page_size_and_number_stay_in_range() {
        let (limit, offset) = page_bounds(u16::MAX, u16::MAX);

        assert_eq!(limit, 65_536);
        assert_eq!(offset, 65_535 * 65_535);
    }
}
