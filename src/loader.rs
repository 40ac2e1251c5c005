// Program loader: turns .ls8 listings or Intel HEX files into a memory image
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid instruction byte {text:?}")]
    InvalidLine { line: usize, text: String },
    #[error("line {line}: hex decoding error: {source}")]
    Hex {
        line: usize,
        source: hex::FromHexError,
    },
    #[error("line {line}: truncated hex record")]
    TruncatedRecord { line: usize },
    #[error("line {line}: checksum {actual:#04x}, expected {expected:#04x}")]
    Checksum { line: usize, expected: u8, actual: u8 },
    #[error("program needs {len} bytes but memory holds {capacity}")]
    ProgramTooLarge { len: usize, capacity: usize },
}

/// Reads a program file and returns its memory image.
///
/// Files whose first meaningful line starts with `:` are treated as Intel HEX,
/// anything else as an `.ls8` listing of binary literals.
pub fn load_program_file(path: impl AsRef<Path>, capacity: usize) -> Result<Vec<u8>, LoadError> {
    let source = fs::read_to_string(path)?;
    let is_hex = source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with(':'));

    if is_hex {
        parse_intel_hex(&source, capacity)
    } else {
        parse_ls8(&source, capacity)
    }
}

/// Parses an `.ls8` listing: one binary byte per line, `#` starts a comment,
/// blank lines are skipped.
pub fn parse_ls8(source: &str, capacity: usize) -> Result<Vec<u8>, LoadError> {
    let mut program = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let code = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(code, 2).map_err(|_| LoadError::InvalidLine {
            line: index + 1,
            text: code.to_string(),
        })?;
        program.push(byte);
    }

    if program.len() > capacity {
        return Err(LoadError::ProgramTooLarge {
            len: program.len(),
            capacity,
        });
    }
    log::info!("parsed {} program bytes", program.len());
    Ok(program)
}

/// Parses Intel HEX data records into a flat image. Stops at the EOF record.
pub fn parse_intel_hex(source: &str, capacity: usize) -> Result<Vec<u8>, LoadError> {
    let mut image: Vec<u8> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if !line.starts_with(':') {
            continue;
        }
        let line_no = index + 1;

        let bytes = hex::decode(&line[1..]).map_err(|source| LoadError::Hex {
            line: line_no,
            source,
        })?;
        // count, address (2), type, data, checksum
        if bytes.len() < 5 || bytes.len() < 5 + bytes[0] as usize {
            return Err(LoadError::TruncatedRecord { line: line_no });
        }
        let byte_count = bytes[0] as usize;
        let address = ((bytes[1] as usize) << 8) | (bytes[2] as usize);
        let record_type = bytes[3];

        // Two's complement of the byte sum of everything before the checksum
        let actual = bytes[4 + byte_count];
        let expected = bytes[..4 + byte_count]
            .iter()
            .fold(0u8, |sum, &b| sum.wrapping_add(b))
            .wrapping_neg();
        if actual != expected {
            return Err(LoadError::Checksum {
                line: line_no,
                expected,
                actual,
            });
        }

        match record_type {
            // data record
            0x00 => {
                let data = &bytes[4..4 + byte_count];
                let end = address + byte_count;
                if end > capacity {
                    return Err(LoadError::ProgramTooLarge { len: end, capacity });
                }
                if image.len() < end {
                    image.resize(end, 0);
                }
                image[address..end].copy_from_slice(data);
            }
            // end of file
            0x01 => break,
            other => log::warn!("line {}: ignoring hex record type {:#04x}", line_no, other),
        }
    }

    log::info!("loaded {} bytes from hex image", image.len());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULT_LS8: &str = "\
# mult.ls8
10011001 # LDI R0,8
00000000
00001000

10011001 # LDI R1,9
00000001
00001001
10101010 # MUL R0,R1
00000000
00000001
01000011 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn ls8_strips_comments_and_blank_lines() {
        let program = parse_ls8(MULT_LS8, 256).unwrap();
        assert_eq!(
            program,
            vec![0b10011001, 0, 8, 0b10011001, 1, 9, 0b10101010, 0, 1, 0b01000011, 0, 1]
        );
    }

    #[test]
    fn ls8_reports_bad_line_number() {
        let err = parse_ls8("00000001\n10x10000 # bad\n", 256).unwrap_err();
        match err {
            LoadError::InvalidLine { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "10x10000");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn ls8_rejects_oversized_program() {
        let err = parse_ls8("00000001\n00000001\n00000001\n", 2).unwrap_err();
        assert!(matches!(err, LoadError::ProgramTooLarge { len: 3, capacity: 2 }));
    }

    #[test]
    fn intel_hex_places_data_records() {
        let source = ":030002009900085A\n:00000001FF\n:01000000FF00\n";
        let image = parse_intel_hex(source, 256).unwrap();
        assert_eq!(image, vec![0, 0, 0x99, 0x00, 0x08]);
    }

    #[test]
    fn intel_hex_rejects_bad_digits() {
        let err = parse_intel_hex(":zz\n", 256).unwrap_err();
        assert!(matches!(err, LoadError::Hex { line: 1, .. }));
    }

    #[test]
    fn intel_hex_rejects_bad_checksum() {
        let err = parse_intel_hex(":0100000001FE\n:0100010002FF\n", 256).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Checksum { line: 2, expected: 0xFC, actual: 0xFF }
        ));
    }

    #[test]
    fn intel_hex_rejects_short_record() {
        let err = parse_intel_hex(":0500000001\n", 256).unwrap_err();
        assert!(matches!(err, LoadError::TruncatedRecord { line: 1 }));
    }

    #[test]
    fn file_format_is_detected_from_content() {
        let dir = std::env::temp_dir();
        let ls8 = dir.join("ls8_loader_test_mult.ls8");
        let hex = dir.join("ls8_loader_test_prog.hex");
        fs::write(&ls8, MULT_LS8).unwrap();
        fs::write(&hex, "\n:0100000001FE\n:00000001FF\n").unwrap();

        assert_eq!(load_program_file(&ls8, 256).unwrap().len(), 12);
        assert_eq!(load_program_file(&hex, 256).unwrap(), vec![0x01]);

        fs::remove_file(ls8).ok();
        fs::remove_file(hex).ok();
    }
}
