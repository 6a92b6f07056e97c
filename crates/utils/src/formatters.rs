// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Hex formatter for use with `#[derivative(Debug(format_with = ...))]`.
///
/// Ciphertexts run to many kilobytes so anything above the threshold is elided in the middle.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", to_short_hex(data))
}

/// Render bytes as `0x..` hex, eliding the middle of long payloads.
pub fn to_short_hex(data: &[u8]) -> String {
    let hex: String = data.iter().map(|b| format!("{:02x}", b)).collect();
    truncate(hex)
}

fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len() / 2, start, end)
    }
}
