//! 出力先の決定（既存ファイルの上書き確認）

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// 出力先が既に存在する場合に上書きを確認する。
///
/// `y` / `yes` 以外の回答では新しいパスを尋ね、空いているパスか上書き承諾が得られるまで繰り返す。
/// `force` なら確認しない。入力が尽きた場合はエラー。
pub fn confirm_output_path<R: BufRead, W: Write>(
    path: PathBuf,
    force: bool,
    mut input: R,
    mut prompt: W,
) -> io::Result<PathBuf> {
    let mut path = path;
    if force {
        return Ok(path);
    }
    while path.is_file() {
        write!(prompt, "File {} exists. Overwrite [Y/N]? ", path.display())?;
        prompt.flush()?;
        let answer = read_answer(&mut input)?;
        if matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            break;
        }
        write!(prompt, "Input path to new output file: ")?;
        prompt.flush()?;
        path = PathBuf::from(read_answer(&mut input)?);
    }
    Ok(path)
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer for output file confirmation",
        ));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn free_path_is_returned_without_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut prompt = Vec::new();
        let got = confirm_output_path(path.clone(), false, &b""[..], &mut prompt).unwrap();
        assert_eq!(got, path);
        assert!(prompt.is_empty());
    }

    #[test]
    fn yes_keeps_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();
        let got = confirm_output_path(path.clone(), false, &b"Yes\n"[..], io::sink()).unwrap();
        assert_eq!(got, path);
    }

    #[test]
    fn no_asks_for_new_path_until_free() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        let third = dir.path().join("c.csv");
        fs::write(&first, "old").unwrap();
        fs::write(&second, "old").unwrap();
        let answers = format!("n\n{}\nno\n{}\n", second.display(), third.display());
        let got =
            confirm_output_path(first, false, answers.as_bytes(), io::sink()).unwrap();
        assert_eq!(got, third);
    }

    #[test]
    fn force_and_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();
        assert_eq!(confirm_output_path(path.clone(), true, &b""[..], io::sink()).unwrap(), path);
        let err = confirm_output_path(path, false, &b""[..], io::sink()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
