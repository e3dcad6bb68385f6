//! Printable source ids
//!
//! Chunk names come in three shapes:
//!
//! - `=label`: the label itself
//! - `@path`: a file, shown as ``file `path'`` keeping the tail of long paths
//! - anything else: the source text, shown as `string "first line..."`
//!
//! `bufflen` is the size of the destination buffer including its
//! terminator, so results are kept below it.

const FILE_OVERHEAD: usize = "file `...%s'".len() + 1;
const STRING_OVERHEAD: usize = "string \"%.*s...\"".len() + 1;

/// Short, single-line form of a chunk name for messages and listings
pub fn chunk_id(source: &str, bufflen: usize) -> String {
    if let Some(label) = source.strip_prefix('=') {
        return label.chars().take(bufflen.saturating_sub(1)).collect();
    }

    if let Some(path) = source.strip_prefix('@') {
        let room = bufflen.saturating_sub(FILE_OVERHEAD);
        let len = path.chars().count();
        return if len > room {
            let tail: String = path.chars().skip(len - room).collect();
            format!("file `...{}'", tail)
        } else {
            format!("file `{}'", path)
        };
    }

    let room = bufflen.saturating_sub(STRING_OVERHEAD);
    let first_line = source.split('\n').next().unwrap_or_default();
    let len = first_line.chars().count().min(room);
    let shown: String = source.chars().take(len).collect();
    if shown.len() < source.len() {
        format!("string \"{}...\"", shown)
    } else {
        format!("string \"{}\"", shown)
    }
}
