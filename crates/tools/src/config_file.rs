//! パイプライン設定ファイルの読み込み
//!
//! 拡張子で形式を決める（`.toml` / `.json` / `.yaml` / `.yml`）。不明な拡張子は TOML として読む。
//! 未知のキーはエラー。CLI 引数は読み込んだ値を項目ごとに上書きする。

use std::path::Path;

use anyhow::{Context, Result};
use ratings_core::PipelineConfig;

pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase());
    let config = match ext.as_deref() {
        Some("json") => serde_json::from_str(&data)
            .with_context(|| format!("invalid JSON config {}", path.display()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&data)
            .with_context(|| format!("invalid YAML config {}", path.display()))?,
        _ => toml::from_str(&data)
            .with_context(|| format!("invalid TOML config {}", path.display()))?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratings_core::{Direction, SortField, SortKey};
    use std::fs;

    #[test]
    fn loads_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("rank.toml");
        fs::write(&toml_path, "sort_by = [\"ayear\"]\n[limit]\nmax_entries = 10\n").unwrap();
        let json_path = dir.path().join("rank.json");
        fs::write(&json_path, r#"{"sort_by": ["ayear"], "limit": {"max_entries": 10}}"#).unwrap();
        let yaml_path = dir.path().join("rank.yml");
        fs::write(&yaml_path, "sort_by: [ayear]\nlimit:\n  max_entries: 10\n").unwrap();

        for path in [toml_path, json_path, yaml_path] {
            let cfg = load_config_file(&path).unwrap();
            assert_eq!(cfg.sort_by, vec![SortKey::new(SortField::Year, Direction::Ascending)]);
            assert_eq!(cfg.limit.max_entries, Some(10));
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rank.toml");
        fs::write(&path, "sort = [\"ayear\"]\n").unwrap();
        assert!(load_config_file(&path).is_err());
    }
}
