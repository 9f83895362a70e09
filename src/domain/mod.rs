pub mod cdtime;
pub mod track;

/// Bytes in one raw CD-DA sector
pub const SECTOR_SIZE: u64 = 2352;

/// Rounds a payload length up to the next whole sector.
pub fn sector_align(raw: u64) -> u64 {
    raw.div_ceil(SECTOR_SIZE) * SECTOR_SIZE
}

#[cfg(test)]
mod tests {
    use super::{SECTOR_SIZE, sector_align};

    #[test]
    fn align_keeps_exact_multiples() {
        assert_eq!(sector_align(0), 0);
        assert_eq!(sector_align(SECTOR_SIZE), SECTOR_SIZE);
        assert_eq!(sector_align(SECTOR_SIZE * 300), SECTOR_SIZE * 300);
    }

    #[test]
    fn align_rounds_up_partial_sectors() {
        assert_eq!(sector_align(1), SECTOR_SIZE);
        assert_eq!(sector_align(SECTOR_SIZE - 1), SECTOR_SIZE);
        assert_eq!(sector_align(SECTOR_SIZE + 1), 2 * SECTOR_SIZE);
    }

    #[test]
    fn align_is_exact_near_u32_max() {
        // float division loses precision here
        let raw = u64::from(u32::MAX);
        let aligned = sector_align(raw);

        assert_eq!(aligned % SECTOR_SIZE, 0);
        assert!(aligned >= raw);
        assert!(aligned - raw < SECTOR_SIZE);
    }

    #[test]
    fn align_invariants_hold_for_a_range() {
        for raw in (0..20_000u64).step_by(7) {
            let aligned = sector_align(raw);
            assert_eq!(aligned % SECTOR_SIZE, 0);
            assert!(aligned >= raw);
            assert!(aligned - raw < SECTOR_SIZE);
        }
    }
}
