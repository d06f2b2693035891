/// Hexdump in `xxd` layout: offset, 16 bytes in hex, printable ASCII.
pub fn xxd(bytes: &[u8]) -> String {
    let mut s = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex = chunk
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = chunk
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
            .collect();
        s += &format!("{:04x}: {:<48} {}\n", row * 16, hex, ascii);
    }
    s
}
