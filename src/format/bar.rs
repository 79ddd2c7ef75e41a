/// Fill glyphs indexed by eighths of a character cell.
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

const FULL_BLOCK: char = BLOCKS[8];

/// Renders `current / max` as a bar of exactly `width` characters with
/// eighth-of-a-cell resolution.
///
/// `max` must be non-zero.
pub fn progress_bar(current: u64, max: u64, width: usize) -> String {
    let cells = 8 * width;
    let units = (current as f64 / max as f64 * cells as f64).round_ties_even() as usize;
    let units = units.min(cells);

    let full = units / 8;
    let remainder = units % 8;

    let mut bar = String::with_capacity(width * FULL_BLOCK.len_utf8());
    bar.extend(std::iter::repeat_n(FULL_BLOCK, full));
    if full < width {
        bar.push(BLOCKS[remainder]);
    }
    bar.extend(std::iter::repeat_n(' ', width.saturating_sub(full + 1)));
    bar
}
