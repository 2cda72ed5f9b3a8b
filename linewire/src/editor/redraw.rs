use super::key::{BACKSPACE, CR};

/// Builds the redraw sequence for one edit state into `out`.
///
/// The sequence is `CR`, `erase` spaces, `CR`, the live line, then one
/// backspace per byte right of the cursor. It contains no escape codes.
pub(crate) fn render(out: &mut Vec<u8>, line: &[u8], cursor: usize, erase: usize) {
    debug_assert!(cursor <= line.len());

    out.clear();
    out.reserve(2 + erase + line.len() + (line.len() - cursor));

    out.push(CR);
    out.resize(out.len() + erase, b' ');
    out.push(CR);
    out.extend_from_slice(line);
    out.resize(out.len() + (line.len() - cursor), BACKSPACE);
}
