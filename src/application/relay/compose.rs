//! # Post Composition
//!
//! Splits over-length messages into an ordered sequence of chunks with
//! leading/trailing ellipsis markers, so a reader can tell the sequence is
//! continued. Every character of the input ends up in exactly one chunk.

/// Upstream's maximum post length.
pub const MAX_POST_LEN: usize = 140;

/// Room left for the `...` continuation markers on both sides.
pub const TRUNCATED_MAX: usize = MAX_POST_LEN - 6;

/// Split `text` into postable chunks. Messages that fit are returned as a
/// single chunk, unmarked. Splits happen on `char` boundaries.
pub fn split_message(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= TRUNCATED_MAX {
        return vec![text.to_string()];
    }

    let pieces: Vec<String> = chars
        .chunks(TRUNCATED_MAX)
        .map(|chunk| chunk.iter().collect())
        .collect();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if i == 0 {
                format!("{piece}...")
            } else if i == last {
                format!("...{piece}")
            } else {
                format!("...{piece}...")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip the continuation markers and stitch the chunks back together.
    fn reassemble(chunks: &[String]) -> String {
        let last = chunks.len() - 1;
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let mut s = chunk.as_str();
                if i > 0 {
                    s = s.strip_prefix("...").unwrap();
                }
                if i < last {
                    s = s.strip_suffix("...").unwrap();
                }
                s
            })
            .collect()
    }

    #[test]
    fn test_short_message_is_untouched() {
        let text = "a".repeat(TRUNCATED_MAX);
        assert_eq!(split_message(&text), vec![text.clone()]);
    }

    #[test]
    fn test_every_chunk_fits_the_limit() {
        let text = "x".repeat(1000);
        for chunk in split_message(&text) {
            assert!(chunk.chars().count() <= MAX_POST_LEN);
        }
    }

    #[test]
    fn test_chunks_cover_the_whole_message() {
        // Lengths straddling multiples of the chunk size, including the
        // short-remainder cases the historical arithmetic lost.
        for len in [
            TRUNCATED_MAX + 1,
            2 * TRUNCATED_MAX - 1,
            2 * TRUNCATED_MAX,
            2 * TRUNCATED_MAX + 1,
            5 * TRUNCATED_MAX + 17,
        ] {
            let text: String = ('a'..='z').cycle().take(len).collect();
            let chunks = split_message(&text);
            assert_eq!(reassemble(&chunks), text, "length {len}");
        }
    }

    #[test]
    fn test_continuation_markers() {
        let text = "y".repeat(3 * TRUNCATED_MAX);
        let chunks = split_message(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].ends_with("...") && !chunks[0].starts_with("..."));
        assert!(chunks[1].starts_with("...") && chunks[1].ends_with("..."));
        assert!(chunks[2].starts_with("...") && !chunks[2].ends_with("..."));
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let text = "é".repeat(TRUNCATED_MAX + 5);
        let chunks = split_message(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(reassemble(&chunks), text);
    }
}
