//! ファイルI/Oユーティリティ（gzip対応）

use std::fs::{self, File, Permissions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

const READER_BUF_CAP: usize = 128 * 1024; // 128 KiB

fn is_gz(p: &Path) -> bool {
    p.extension().and_then(|e| e.to_str()).unwrap_or_default().eq_ignore_ascii_case("gz")
}

/// `.gz` なら展開しながら読む。`-` は標準入力。
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let p = path.as_ref();
    if p.to_string_lossy() == "-" {
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, io::stdin())));
    }
    let f = File::open(p)?;
    if is_gz(p) {
        let dec = flate2::read::GzDecoder::new(f);
        return Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, dec)));
    }
    Ok(Box::new(BufReader::with_capacity(READER_BUF_CAP, f)))
}

enum Sink {
    Plain(BufWriter<NamedTempFile>),
    Gz(flate2::write::GzEncoder<BufWriter<NamedTempFile>>),
}

/// 出力先と同じディレクトリの一時ファイルに書き、`commit` で置き換える。
///
/// `commit` せずに drop した場合は一時ファイルごと消えるので、途中までの出力は残らない。
/// 新規作成時のパーミッションは通常の `File::create` と同じ（0666 & !umask）、
/// 既存ファイルを置き換える場合は元のパーミッションを引き継ぐ。
#[must_use = "call .commit() to persist the output"]
pub struct AtomicWriter {
    sink: Sink,
    dest: PathBuf,
    existing_perms: Option<Permissions>,
}

impl Write for AtomicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(f) => f.write(buf),
            Sink::Gz(e) => e.write(buf),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(f) => f.flush(),
            Sink::Gz(e) => e.flush(),
        }
    }
}

impl AtomicWriter {
    /// ストリームを閉じて出力先へ rename する
    pub fn commit(self) -> io::Result<PathBuf> {
        let buffered = match self.sink {
            Sink::Plain(f) => f,
            Sink::Gz(e) => e.finish()?,
        };
        let mut tmp = buffered.into_inner().map_err(|e| e.into_error())?;
        tmp.flush()?;
        if let Some(perms) = self.existing_perms {
            tmp.as_file().set_permissions(perms)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.dest).map_err(|e| e.error)?;
        Ok(self.dest)
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }
}

pub fn open_atomic_writer<P: AsRef<Path>>(path: P) -> io::Result<AtomicWriter> {
    let dest = path.as_ref().to_path_buf();
    let dir = match dest.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut builder = tempfile::Builder::new();
    // NamedTempFile の既定は 0600。mode 指定で作成すれば umask が適用される
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(Permissions::from_mode(0o666));
    }
    let tmp = BufWriter::new(builder.tempfile_in(dir)?);
    let existing_perms = fs::metadata(&dest).ok().map(|m| m.permissions());
    let sink = if is_gz(&dest) {
        Sink::Gz(flate2::write::GzEncoder::new(tmp, flate2::Compression::default()))
    } else {
        Sink::Plain(tmp)
    };
    Ok(AtomicWriter { sink, dest, existing_perms })
}
