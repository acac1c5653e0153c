//! Scan Code Set 1 decoding.
//!
//! The controller forwards one Scan Code Set 1 sequence per event. Most keys
//! are a single byte whose high bit marks a release. Extended keys carry an
//! `0xE0` prefix, and two keys (Pause and Ctrl+Break) send their press and
//! release halves in one sequence. `decode` packs such a sequence into a
//! single scan code and reports whether it is a make, a break, or both.

use bitflags::bitflags;
use heapless::Vec;

const SC1_LSHIFT: u8 = 0x2A;
const SC1_RSHIFT: u8 = 0x36;
const SC1_SCROLL: u8 = 0x46;
const SC1_PREFIX_E0: u8 = 0xE0;
const SC1_PREFIX_E1: u8 = 0xE1;

/// Set on the last byte of a release sequence.
const SC1_BREAK_MASK: u8 = 0x80;

bitflags! {
    /// Make/break flags of a decoded key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScanCodeFlags: u8 {
        /// Key pressed.
        const MAKE = 1 << 0;
        /// Key released.
        const BREAK = 1 << 1;
    }
}

/// A scan code sequence reduced to a single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodedKeyEvent {
    /// Retained sequence bytes, first byte most significant, break bit cleared.
    pub scan_code: u32,
    /// Never empty.
    pub flags: ScanCodeFlags,
}

impl DecodedKeyEvent {
    /// Returns `true` if the event includes a key press.
    pub fn is_make(&self) -> bool {
        self.flags.contains(ScanCodeFlags::MAKE)
    }

    /// Returns `true` if the event includes a key release.
    pub fn is_break(&self) -> bool {
        self.flags.contains(ScanCodeFlags::BREAK)
    }

    /// The packed scan code bytes, most significant first, without leading zeros.
    pub fn bytes(&self) -> Vec<u8, 4> {
        let raw = self.scan_code.to_be_bytes();
        let first = raw.iter().position(|b| *b != 0).unwrap_or(raw.len() - 1);
        // At most four bytes go into a four byte vector.
        Vec::from_slice(&raw[first..]).unwrap_or_default()
    }
}

/// Why a payload did not produce a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing of value was left, e.g. a lone extended shift.
    EmptySequence,
    /// Not a Scan Code Set 1 shape this decoder recognizes.
    MalformedPayload,
}

/// Decodes one Scan Code Set 1 sequence.
pub fn decode(payload: &[u8]) -> Result<DecodedKeyEvent, DecodeError> {
    let Some((&first, _)) = payload.split_first() else {
        return Err(DecodeError::EmptySequence);
    };

    let mut scan_code = u32::from(first);
    let mut packed: i32 = 1;
    let mut flags = ScanCodeFlags::empty();

    for pair in payload.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);

        if prev == SC1_PREFIX_E0 {
            // Extended shifts have no effect on the key itself, drop them
            // together with their prefix.
            let sc = cur & !SC1_BREAK_MASK;
            if sc == SC1_LSHIFT || sc == SC1_RSHIFT {
                scan_code >>= 8;
                packed -= 1;
                continue;
            }
            // Extended Scroll Lock is Ctrl+Break. What follows is its release.
            if cur == SC1_SCROLL {
                scan_code = (scan_code << 8) | u32::from(cur);
                packed += 1;
                flags = ScanCodeFlags::MAKE | ScanCodeFlags::BREAK;
                break;
            }
        }
        // Second half of Pause. What follows is its release.
        if cur == SC1_PREFIX_E1 {
            flags = ScanCodeFlags::MAKE | ScanCodeFlags::BREAK;
            break;
        }
        scan_code = (scan_code << 8) | u32::from(cur);
        packed += 1;
    }

    if flags.is_empty() {
        match packed {
            1 | 2 => {
                flags = if scan_code & u32::from(SC1_BREAK_MASK) != 0 {
                    ScanCodeFlags::BREAK
                } else {
                    ScanCodeFlags::MAKE
                };
                scan_code &= !u32::from(SC1_BREAK_MASK);
            }
            i32::MIN..=0 => return Err(DecodeError::EmptySequence),
            _ => return Err(DecodeError::MalformedPayload),
        }
    }

    Ok(DecodedKeyEvent { scan_code, flags })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: ScanCodeFlags = ScanCodeFlags::MAKE.union(ScanCodeFlags::BREAK);

    fn key(scan_code: u32, flags: ScanCodeFlags) -> Result<DecodedKeyEvent, DecodeError> {
        Ok(DecodedKeyEvent { scan_code, flags })
    }

    #[test]
    fn single_byte_high_bit_selects_make_or_break() {
        for b in 0..=u8::MAX {
            let expected = if b & 0x80 == 0 {
                key(u32::from(b), ScanCodeFlags::MAKE)
            } else {
                key(u32::from(b & 0x7F), ScanCodeFlags::BREAK)
            };
            assert_eq!(decode(&[b]), expected, "byte {b:#04x}");
        }
    }

    #[test]
    fn extended_keys_keep_prefix() {
        // Left arrow.
        assert_eq!(decode(&[0xE0, 0x4B]), key(0xE04B, ScanCodeFlags::MAKE));
        assert_eq!(decode(&[0xE0, 0xCB]), key(0xE04B, ScanCodeFlags::BREAK));
    }

    #[test]
    fn lone_extended_shift_is_empty() {
        assert_eq!(decode(&[0xE0, 0x2A]), Err(DecodeError::EmptySequence));
        assert_eq!(decode(&[0xE0, 0xAA]), Err(DecodeError::EmptySequence));
        assert_eq!(decode(&[0xE0, 0x36]), Err(DecodeError::EmptySequence));
        assert_eq!(decode(&[0xE0, 0xB6]), Err(DecodeError::EmptySequence));
        assert_eq!(
            decode(&[0xE0, 0x2A, 0xE0, 0xAA]),
            Err(DecodeError::EmptySequence)
        );
    }

    #[test]
    fn print_screen_drops_fake_shift() {
        assert_eq!(
            decode(&[0xE0, 0x2A, 0xE0, 0x37]),
            key(0xE037, ScanCodeFlags::MAKE)
        );
        assert_eq!(
            decode(&[0xE0, 0xB7, 0xE0, 0xAA]),
            key(0xE037, ScanCodeFlags::BREAK)
        );
    }

    #[test]
    fn ctrl_break_reports_make_and_break() {
        assert_eq!(decode(&[0xE0, 0x46]), key(0xE046, BOTH));
        assert_eq!(decode(&[0xE0, 0x46, 0xE0, 0xC6]), key(0xE046, BOTH));
        assert_eq!(decode(&[0xE0, 0x46, 0xFF, 0x00, 0x12]), key(0xE046, BOTH));
    }

    #[test]
    fn unprefixed_scroll_lock_is_an_ordinary_key() {
        assert_eq!(decode(&[0x46]), key(0x46, ScanCodeFlags::MAKE));
        assert_eq!(decode(&[0xC6]), key(0x46, ScanCodeFlags::BREAK));
    }

    #[test]
    fn pause_stops_at_second_e1() {
        assert_eq!(
            decode(&[0xE1, 0x1D, 0x45, 0xE1, 0x9D, 0xC5]),
            key(0xE11D45, BOTH)
        );
        for x in [0x00, 0x1E, 0x9E, 0xE0, 0xE1, 0xFF] {
            assert_eq!(decode(&[x, 0xE1]), key(u32::from(x), BOTH), "x = {x:#04x}");
            assert_eq!(
                decode(&[x, 0xE1, 0x12, 0x34]),
                key(u32::from(x), BOTH),
                "x = {x:#04x}"
            );
        }
    }

    #[test]
    fn two_plain_bytes_use_the_low_byte_break_bit() {
        let event = decode(&[0x1E, 0x9E]).unwrap();
        assert_eq!(event.flags, ScanCodeFlags::BREAK);
        assert_eq!(event.scan_code, (0x1E << 8) | 0x1E);

        assert_eq!(decode(&[0x9E, 0x1E]), key(0x9E1E, ScanCodeFlags::MAKE));
    }

    #[test]
    fn three_unresolved_bytes_are_malformed() {
        assert_eq!(
            decode(&[0x1E, 0x1F, 0x20]),
            Err(DecodeError::MalformedPayload)
        );
        assert_eq!(
            decode(&[0xE0, 0x4B, 0xE0, 0xCB]),
            Err(DecodeError::MalformedPayload)
        );
    }

    #[test]
    fn empty_payload_is_empty_sequence() {
        assert_eq!(decode(&[]), Err(DecodeError::EmptySequence));
    }

    #[test]
    fn flags_never_empty_on_success() {
        let check = |payload: &[u8]| {
            if let Ok(event) = decode(payload) {
                assert!(!event.flags.is_empty(), "payload {payload:02x?}");
            }
        };

        for a in 0..=u8::MAX {
            check(&[a]);
            for b in 0..=u8::MAX {
                check(&[a, b]);
            }
        }

        const INTERESTING: [u8; 14] = [
            0x00, 0x1E, 0x2A, 0x36, 0x46, 0x7F, 0x80, 0x9E, 0xAA, 0xB6, 0xC6, 0xE0, 0xE1, 0xFF,
        ];
        for a in INTERESTING {
            for b in INTERESTING {
                for c in INTERESTING {
                    check(&[a, b, c]);
                    for d in INTERESTING {
                        check(&[a, b, c, d]);
                    }
                }
            }
        }
    }

    #[test]
    fn bytes_strip_leading_zeros() {
        let event = decode(&[0xE0, 0x46]).unwrap();
        assert_eq!(event.bytes().as_slice(), &[0xE0, 0x46]);
        assert!(event.is_make() && event.is_break());

        let event = decode(&[0x00]).unwrap();
        assert_eq!(event.bytes().as_slice(), &[0x00]);
    }
}
