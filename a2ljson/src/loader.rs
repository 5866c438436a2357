use crate::A2lError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// load()
// Read a file and convert its content to a String. The encoding is detected automatically.
pub(crate) fn load(path: &Path) -> Result<String, A2lError> {
    let mut file = File::open(path).map_err(|ioerror| A2lError::FileOpenError {
        filename: path.to_path_buf(),
        ioerror,
    })?;

    let filedata = read_data(&mut file, path)?;
    Ok(decode_text(&filedata))
}

fn read_data(file: &mut File, path: &Path) -> Result<Vec<u8>, A2lError> {
    let filesize = file
        .metadata()
        .map_err(|ioerror| A2lError::FileReadError {
            filename: path.to_path_buf(),
            ioerror,
        })?
        .len();
    // filesize > 4GB on 32bit systems - is it sane ?!?
    let bufsize = usize::try_from(filesize).unwrap_or(usize::MAX);
    let mut buffer = Vec::with_capacity(bufsize);
    file.read_to_end(&mut buffer)
        .map_err(|ioerror| A2lError::FileReadError {
            filename: path.to_path_buf(),
            ioerror,
        })?;
    Ok(buffer)
}

// decode_text()
// Convert raw input bytes to text and strip the byte order mark, if there is one.
pub(crate) fn decode_text(data: &[u8]) -> String {
    let text = decode_raw_bytes(data);
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

fn decode_raw_bytes(filedata: &[u8]) -> String {
    /* an a2l file must have either a BOM or a character from the basic ASCII set as the first character in the file
    we can use this to guess the encoding, because we expect to see nul-bytes in the first character if UTF-16 or UTF-32 is used. */

    /* check UTF-32.
     * Big endian format: the filedata should be 0x00 0x00 0xFE 0xFF if it is a BOM, or 00 00 00 xx otherwise.
     * Little endian format: The filedata should be 0xFF 0xFE 0x00 0x00 if it is a BOM, or xx 00 00 00 otherwise.*/
    if filedata.len() % 4 == 0 && filedata.len() > 3 {
        let u32conversion: Option<fn([u8; 4]) -> u32> =
            if filedata[0] == 0 && filedata[1] == 0 && filedata[3] != 0 {
                Some(u32::from_be_bytes)
            } else if filedata[0] != 0 && filedata[2] == 0 && filedata[3] == 0 {
                Some(u32::from_le_bytes)
            } else {
                None
            };
        if let Some(conversion) = u32conversion {
            let decoded: Option<String> = filedata
                .chunks_exact(4)
                .map(|chunk| {
                    let charbytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
                    char::from_u32(conversion(charbytes))
                })
                .collect();
            if let Some(text) = decoded {
                return text;
            }
        }
    }

    /* check UTF-16
     * Big endian bom is 0xfe 0xff. Without BOM, the first character should be 0x00 0x??
     * little endian bom is 0xff 0xfe. Without BOM, the first character should be 0x?? 0x00 */
    if filedata.len() % 2 == 0 && filedata.len() > 1 {
        let u16conversion: Option<fn([u8; 2]) -> u16> = if (filedata[0] == 0
            && filedata[1] != 0)
            || (filedata[0] == 0xfe && filedata[1] == 0xff)
        {
            Some(u16::from_be_bytes)
        } else if (filedata[0] != 0 && filedata[1] == 0)
            || (filedata[0] == 0xff && filedata[1] == 0xfe)
        {
            Some(u16::from_le_bytes)
        } else {
            None
        };
        if let Some(conversion) = u16conversion {
            let units: Vec<u16> = filedata
                .chunks_exact(2)
                .map(|chunk| conversion([chunk[0], chunk[1]]))
                .collect();
            if let Ok(text) = String::from_utf16(&units) {
                return text;
            }
        }
    }

    /* try to handle the data as pure utf-8 */
    if let Ok(converted) = std::str::from_utf8(filedata) {
        return converted.to_string();
    }

    /* handle the data as ISO8859-1. This always succeeds, because every sequence of bytes can be a latin-1 string */
    filedata.iter().map(|ch| char::from(*ch)).collect()
}

/*************************************************************************************************/
