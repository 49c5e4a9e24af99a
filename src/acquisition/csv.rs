// src/acquisition/csv.rs
//! Comma separated sample tables with a `Time_ms` leading column

use super::table::{Column, SampleTable};
use crate::config::constants::signal::TIME_COLUMN;
use crate::error::{EmgError, EmgResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn parse_error(line_no: usize, reason: impl std::fmt::Display) -> EmgError {
    EmgError::Parse {
        reason: format!("CSV line {}: {}", line_no, reason),
    }
}

/// Read a table whose header is `Time_ms,<channel>,...`.
///
/// Blank lines are ignored. Every other row must have one field per header
/// column.
pub fn read_table<R: Read>(reader: R) -> EmgResult<SampleTable> {
    let mut lines = BufReader::new(reader).lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, Ok(line))) if line.trim().is_empty() => continue,
            Some((_, Ok(line))) => break line,
            Some((idx, Err(err))) => return Err(parse_error(idx + 1, err)),
            None => return Err(EmgError::invalid_data("CSV table", "missing header")),
        }
    };

    let mut names = header.trim().trim_start_matches('\u{feff}').split(',').map(str::trim);
    match names.next() {
        Some(TIME_COLUMN) => {}
        other => {
            return Err(EmgError::invalid_data(
                "CSV table",
                format!("first column must be '{}', found '{}'", TIME_COLUMN, other.unwrap_or_default()),
            ))
        }
    }
    let names: Vec<String> = names.map(str::to_string).collect();

    let mut time_ms = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line.map_err(|err| parse_error(line_no, err))?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != names.len() + 1 {
            return Err(parse_error(
                line_no,
                format!("expected {} fields, found {}", names.len() + 1, fields.len()),
            ));
        }

        let time = fields[0]
            .parse::<u64>()
            .map_err(|err| parse_error(line_no, format!("{} '{}': {}", TIME_COLUMN, fields[0], err)))?;
        time_ms.push(time);

        for ((field, column), name) in fields[1..].iter().zip(values.iter_mut()).zip(&names) {
            let value = field
                .parse::<f64>()
                .map_err(|err| parse_error(line_no, format!("{} '{}': {}", name, field, err)))?;
            column.push(value);
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column { name, values })
        .collect();
    SampleTable::new(time_ms, columns)
}

/// Write a table in the shape [`read_table`] accepts
pub fn write_table<W: Write>(writer: W, table: &SampleTable) -> std::io::Result<()> {
    let mut writer = BufWriter::new(writer);

    write!(writer, "{}", TIME_COLUMN)?;
    for name in table.column_names() {
        write!(writer, ",{}", name)?;
    }
    writeln!(writer)?;

    for (row, time) in table.time_ms().iter().enumerate() {
        write!(writer, "{}", time)?;
        for column in table.columns() {
            write!(writer, ",{}", column.values[row])?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}

pub fn load_table<P: AsRef<Path>>(path: P) -> EmgResult<SampleTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| EmgError::io(path, err))?;
    read_table(file)
}

pub fn save_table<P: AsRef<Path>>(path: P, table: &SampleTable) -> EmgResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| EmgError::io(path, err))?;
    write_table(file, table).map_err(|err| EmgError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table() {
        let data = "Time_ms,iliacus_left,iliacus_right\n0,0.5,-0.5\n1,1.0,2.0\n\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(table.time_ms(), &[0, 1]);
        assert_eq!(table.channel("iliacus_right").unwrap(), &[-0.5, 2.0]);
    }

    #[test]
    fn test_rejects_bad_header_and_rows() {
        assert!(read_table("time,a_left\n0,1\n".as_bytes()).is_err());
        assert!(read_table("".as_bytes()).is_err());

        let err = read_table("Time_ms,a_left\n0,1\n1,x\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));

        assert!(read_table("Time_ms,a_left\n0,1,2\n".as_bytes()).is_err());
        assert!(read_table("Time_ms,a_left\n1,1\n0,2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let table = SampleTable::from_columns(
            vec![0, 1, 2],
            vec![("soleus_left", vec![0.25, -1.5, 3.0]), ("soleus_left_envelope", vec![0.1, 0.2, 0.3])],
        )
        .unwrap();

        let mut buffer = Vec::new();
        write_table(&mut buffer, &table).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Time_ms,soleus_left,soleus_left_envelope\n"));

        assert_eq!(read_table(buffer.as_slice()).unwrap(), table);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_table("/nonexistent/emg/recording.csv").unwrap_err();
        assert!(matches!(err, EmgError::Io { .. }));
    }
}
