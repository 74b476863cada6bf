use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

/// Destination of a JSON result: a file if a path was given, stdout
/// otherwise.
#[derive(Debug)]
enum JsonSink {
    Stdout(StdoutLock<'static>),
    File { writer: BufWriter<File>, path: PathBuf },
}

impl JsonSink {
    fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(JsonSink::Stdout(io::stdout().lock()));
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(JsonSink::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            JsonSink::Stdout(writer) => writer,
            JsonSink::File { writer, .. } => writer,
        }
    }
}

impl fmt::Display for JsonSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSink::Stdout(_) => f.write_str("stdout"),
            JsonSink::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut sink = JsonSink::create(path)?;
    write_json(sink.writer(), value).with_context(|| format!("Failed to write JSON to {sink}"))?;
    if let JsonSink::File { path, .. } = &sink {
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}

fn write_json<T>(writer: &mut dyn Write, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_json<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Prints a horizontal bar chart to stderr.
pub fn print_histogram<I, S>(data: I)
where
    I: IntoIterator<Item = (S, usize)>,
    S: fmt::Display,
{
    const MAX_BAR_WIDTH: usize = 50;

    let data = data.into_iter().collect::<Vec<_>>();
    let max_count = data.iter().map(|(_, count)| *count).max().unwrap_or(0).max(1);
    for (label, count) in &data {
        let bar = "#".repeat(count * MAX_BAR_WIDTH / max_count);
        eprintln!("{label:>12} | {count:<6} {bar}");
    }
}
