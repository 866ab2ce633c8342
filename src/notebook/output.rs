//! Carriage-return overwrite resolution for raw command output.
//!
//! Progress-style tools (tqdm, pip, wget) redraw one logical line many times
//! by emitting `\r` and rewriting it. The notebook renders static text, not a
//! terminal, so only the final state of each overwritten line is meaningful.

/// Resolve carriage-return overwrites in `raw`, returning display text.
///
/// Line feeds are the only hard line separators and are preserved. Within a
/// line, everything before the last `\r` is discarded — a returning cursor
/// followed by new text replaces the whole line, with no character-level
/// splicing of shorter text over longer. Pure and total: any input maps to a
/// defined output, and output containing no `\r` passes through unchanged.
pub fn resolve_overwrites(raw: &str) -> String {
    raw.split('\n')
        .map(|line| match line.rsplit_once('\r') {
            Some((_, after)) => after,
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
