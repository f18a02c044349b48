//! ASCII to keyboard usage mapping for the feedback channel.
//!
//! All status text the device "prints" on the host travels as plain
//! keystrokes, so every printable ASCII character needs a usage code.
//! The top bit of a table entry means the character is typed with Left
//! Shift held. Unmappable control characters degrade to Space; a few
//! have natural key equivalents (BS, Tab, LF, CR, DEL).

const SHIFT_BIT: u8 = 0x80;

#[rustfmt::skip]
const ASCII_TO_USAGE: [u8; 128] = [
    //        00    01    02    03    04    05    06    07    08    09    0A    0B    0C    0D    0E    0F
    /* 00 */ 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2A, 0x2B, 0x28, 0x2C, 0x2C, 0x4A, 0x2C, 0x2C,
    /* 10 */ 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C, 0x2C,
    //                !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    /* 20 */ 0x2C, 0x9E, 0x2C, 0xA0, 0xA1, 0xA2, 0xA4, 0x34, 0xA6, 0xA7, 0xA5, 0xAE, 0x36, 0x2D, 0x37, 0x38,
    //          0     1     2     3     4     5     6     7     8     9     :     ;     <     =     >     ?
    /* 30 */ 0x27, 0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0xB3, 0x33, 0xB6, 0x2E, 0xB7, 0xB8,
    //          @     A     B     C     D     E     F     G     H     I     J     K     L     M     N     O
    /* 40 */ 0x9F, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x8D, 0x8E, 0x8F, 0x90, 0x91, 0x92,
    //          P     Q     R     S     T     U     V     W     X     Y     Z     [     \     ]     ^     _
    /* 50 */ 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0x9B, 0x9C, 0x9D, 0x2F, 0x31, 0x30, 0xA3, 0xAD,
    //          `     a     b     c     d     e     f     g     h     i     j     k     l     m     n     o
    /* 60 */ 0x35, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12,
    //          p     q     r     s     t     u     v     w     x     y     z     {     |     }     ~   DEL
    /* 70 */ 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0xAF, 0xB1, 0xB0, 0xB2, 0x2A,
];

/// Key code and shift flag for an ASCII character. Bytes above 0x7F map
/// to Space.
pub fn usage_for_ascii(ch: u8) -> (u8, bool) {
    let entry = if (ch as usize) < ASCII_TO_USAGE.len() {
        ASCII_TO_USAGE[ch as usize]
    } else {
        0x2C
    };
    (entry & !SHIFT_BIT, entry & SHIFT_BIT != 0)
}
