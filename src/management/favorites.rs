//! Favorites list import and export.
//!
//! The file format is a four column CSV (`Artist, Album, Year, Rating`).
//! Fields may be quoted, and a doubled quote inside a quoted field stands for
//! one literal quote. Quoted fields keep line breaks and padding, so an
//! exported list imports back unchanged. Parsing is all-or-nothing: a bad
//! header or a row without artist or album rejects the whole file.

use std::{
    iter::Peekable,
    path::{Path, PathBuf},
    str::Chars,
};

use crate::{
    config,
    error::{Error, Result},
    types::AlbumRecord,
};

pub const HEADER: [&str; 4] = ["Artist", "Album", "Year", "Rating"];

/// The imported favorites list kept in the data directory.
pub fn favorites_path() -> PathBuf {
    config::data_dir().join("favorites.csv")
}

/// Iterates the records of a CSV document.
///
/// A quoted field may span lines and keeps its content verbatim; unquoted
/// fields are trimmed. Blank lines yield no record. Each item carries the
/// line its record starts on.
struct Records<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Records<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            line: 1,
        }
    }

    fn read_record(&mut self) -> std::result::Result<Vec<String>, String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut in_quotes = false;

        while let Some(c) = self.chars.next() {
            if c == '\n' {
                self.line += 1;
            }
            match c {
                '"' if in_quotes => {
                    if self.chars.peek() == Some(&'"') {
                        field.push('"');
                        self.chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '"' if !quoted && field.trim().is_empty() => {
                    field.clear();
                    quoted = true;
                    in_quotes = true;
                }
                ',' if !in_quotes => {
                    fields.push(finish_field(&mut field, quoted));
                    quoted = false;
                }
                '\n' if !in_quotes => {
                    fields.push(finish_field(&mut field, quoted));
                    return Ok(fields);
                }
                // Whitespace between a closing quote and the delimiter.
                c if quoted && !in_quotes && c.is_whitespace() => {}
                c => field.push(c),
            }
        }

        if in_quotes {
            return Err("unterminated quoted field".to_string());
        }
        fields.push(finish_field(&mut field, quoted));
        Ok(fields)
    }
}

impl Iterator for Records<'_> {
    type Item = (usize, std::result::Result<Vec<String>, String>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.chars.peek().is_some() {
            let line = self.line;
            match self.read_record() {
                Ok(fields) if fields.len() == 1 && fields[0].is_empty() => continue,
                result => return Some((line, result)),
            }
        }
        None
    }
}

fn finish_field(field: &mut String, quoted: bool) -> String {
    let value = if quoted {
        field.clone()
    } else {
        field.trim().to_string()
    };
    field.clear();
    value
}

/// Splits one CSV record into field values.
pub fn parse_line(line: &str) -> std::result::Result<Vec<String>, String> {
    match Records::new(line).next() {
        Some((_, result)) => result,
        None => Ok(vec![String::new()]),
    }
}

fn validate_header(columns: &[String]) -> Result<()> {
    let matches = columns.len() == HEADER.len()
        && columns
            .iter()
            .zip(HEADER)
            .all(|(column, expected)| column.eq_ignore_ascii_case(expected));

    if !matches {
        return Err(Error::Import(format!(
            "Invalid header. Expected \"{}\", found \"{}\"",
            HEADER.join(", "),
            columns.join(", ")
        )));
    }
    Ok(())
}

/// Parses a favorites CSV document into album records.
pub fn parse_csv(content: &str) -> Result<Vec<AlbumRecord>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut records_in = Records::new(content);

    let Some((_, header)) = records_in.next() else {
        return Err(Error::Import("File is empty".to_string()));
    };
    let header = header.map_err(|e| Error::Import(format!("Header: {e}")))?;
    validate_header(&header)?;

    let mut records = Vec::new();
    for (line_number, fields) in records_in {
        let mut fields = fields
            .map_err(|e| Error::Import(format!("Line {line_number}: {e}")))?
            .into_iter();

        let artist = fields.next().unwrap_or_default();
        let album = fields.next().unwrap_or_default();
        if artist.trim().is_empty() || album.trim().is_empty() {
            return Err(Error::Import(format!(
                "Line {line_number}: artist and album are required"
            )));
        }

        records.push(AlbumRecord {
            artist,
            album,
            year: fields.next().unwrap_or_default(),
            rating: fields.next().unwrap_or_default(),
        });
    }

    Ok(records)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Writes records in the import format, quoting every field.
pub fn export_csv(records: &[AlbumRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');
    for record in records {
        let row = [
            &record.artist,
            &record.album,
            &record.year,
            &record.rating,
        ]
        .map(|field| quote(field))
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

pub fn sample_records() -> Vec<AlbumRecord> {
    vec![
        AlbumRecord::new("Radiohead", "OK Computer", "1997", "10"),
        AlbumRecord::new("Kendrick Lamar", "To Pimp a Butterfly", "2015", "9.5"),
        AlbumRecord::new("Talking Heads", "Remain in Light", "1980", "9"),
        AlbumRecord::new("Sufjan Stevens", "Illinois", "2005", "9"),
        AlbumRecord::new("Fiona Apple", "Fetch the Bolt Cutters", "2020", "8.5"),
        AlbumRecord::new("The Avalanches", "Since I Left You", "2000", "8.5"),
        AlbumRecord::new(
            "Godspeed You! Black Emperor",
            "Lift Your Skinny Fists Like Antennas to Heaven",
            "2000",
            "9",
        ),
        AlbumRecord::new("Big Thief", "Dragon New Warm Mountain I Believe in You", "2022", "8"),
        AlbumRecord::new("Neutral Milk Hotel", "In the Aeroplane Over the Sea", "1998", "9.5"),
        AlbumRecord::new("Beyoncé", "Lemonade", "2016", "8.5"),
    ]
}

/// Example file users can start from.
pub fn sample_export() -> String {
    export_csv(&sample_records())
}

pub async fn load_favorites(path: &Path) -> Result<Vec<AlbumRecord>> {
    let content = async_fs::read_to_string(path).await?;
    parse_csv(&content)
}

pub async fn write_favorites(path: &Path, records: &[AlbumRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent).await?;
        }
    }
    async_fs::write(path, export_csv(records)).await?;
    Ok(())
}
