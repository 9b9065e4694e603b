//! Re-slice merged runs into fixed-size presentation blocks.

use chrono::Duration;

use crate::range::TimeRange;

/// Cut each run into consecutive `block_minutes` blocks starting at the run's start.
///
/// A trailing remainder shorter than one block is dropped; it is never padded
/// or carried into the next run. Output follows the order of `runs`. A zero
/// block size yields no blocks.
pub fn split_into_blocks(runs: &[TimeRange], block_minutes: u32) -> Vec<TimeRange> {
    if block_minutes == 0 {
        return Vec::new();
    }

    let step = Duration::minutes(i64::from(block_minutes));
    let mut blocks = Vec::new();

    for run in runs {
        let mut cursor = run.start();
        while cursor + step <= run.end() {
            let block_end = cursor + step;
            if let Ok(block) = TimeRange::new(cursor, block_end) {
                blocks.push(block);
            }
            cursor = block_end;
        }
    }

    blocks
}
