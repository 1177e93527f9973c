//! Splits a raw MT message into its numbered blocks.

/// Marker that closes the text block.
const TEXT_BLOCK_END: &str = "-}";

/// The text block number. Its content may contain braces, so it is closed by `-}`.
pub const TEXT_BLOCK: u8 = 4;

/// Returns the content of block `number`, or `None` if the block marker is absent.
///
/// Blocks other than 4 end at the first `}` after the `{N:` marker. Block 4 runs
/// from `{4:` up to the last `-}` of the message.
pub fn extract_block(message: &str, number: u8) -> Option<&str> {
    let marker = format!("{{{number}:");
    let start = message.find(&marker)? + marker.len();
    let rest = &message[start..];

    let end = if number == TEXT_BLOCK {
        rest.rfind(TEXT_BLOCK_END)?
    } else {
        rest.find('}')?
    };
    Some(&rest[..end])
}
