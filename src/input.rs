//! An input file reader.
//!
//! Provider files are tab-delimited text, optionally gzip-compressed. The
//! reader splits each line into its raw columns; all interpretation is the
//! provider's concern.

use std::io::BufRead;
use std::io::{self};
use std::path::Path;

use flate2::read::GzDecoder;

/// The column delimiter.
const DELIMITER: char = '\t';

/// An input file reader.
#[derive(Debug)]
pub struct Reader<T>(T)
where
    T: BufRead;

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates an input reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"MGI:97490\tGRCm38\tL1L2_Bact_P\n";
    /// let reader = alleleload::input::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Consumes `self` to iterate over the rows of the file.
    pub fn rows(self) -> Rows<T> {
        Rows(self.0)
    }
}

/// An iterator over the rows of an input file.
#[derive(Debug)]
pub struct Rows<T>(T)
where
    T: BufRead;

impl<T> Iterator for Rows<T>
where
    T: BufRead,
{
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        match self.0.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']);
                Some(Ok(trimmed
                    .split(DELIMITER)
                    .map(String::from)
                    .collect()))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Opens an input file, transparently decompressing `.gz` files.
pub fn open(path: impl AsRef<Path>) -> io::Result<Reader<Box<dyn BufRead>>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;

    let inner: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(io::BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(io::BufReader::new(file))
    };

    Ok(Reader::new(inner))
}
