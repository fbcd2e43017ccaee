//! Shell scripts standing in for the BLAST+ binaries
//!
//! The mock `blastp` replays a hit table but, like the real tool, only
//! reports pairs whose query is in the query FASTA and whose subject is in
//! the FASTA the database was built from.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const MAKEBLASTDB: &str = r#"while [ "$#" -gt 0 ]; do
  case "$1" in
    -in) input="$2"; shift 2 ;;
    -out) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
[ -f "$input" ] || { echo "BLAST options error: File $input does not exist" >&2; exit 2; }
touch "$out.pin"
"#;

const BLASTP: &str = r#"while [ "$#" -gt 0 ]; do
  case "$1" in
    -version) echo "blastp: 2.14.0+"; exit 0 ;;
    -query) query="$2"; shift 2 ;;
    -db) db="$2"; shift 2 ;;
    *) shift ;;
  esac
done
[ -f "$db.pin" ] || { echo "BLAST Database error: No alias or index file found" >&2; exit 2; }
target="$(dirname "$(dirname "$db")")/target.faa"
awk -F'\t' -v qf="$query" -v tf="$target" '
BEGIN {
  while ((getline l < qf) > 0) if (substr(l, 1, 1) == ">") q[substr(l, 2)] = 1
  while ((getline l < tf) > 0) if (substr(l, 1, 1) == ">") t[substr(l, 2)] = 1
}
($1 in q) && ($2 in t)
' "__HITS__"
"#;

/// Write an executable `/bin/sh` script into `dir`
pub fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body))
        .with_context(|| format!("Failed to write mock script {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Install mock `makeblastdb` and `blastp` that replay `hits` (tabular lines)
pub fn install_blast_mock(bin_dir: &Path, hits: &[String]) -> Result<()> {
    let table = bin_dir.join("hits.tsv");
    let mut content = hits.join("\n");
    content.push('\n');
    fs::write(&table, content)?;

    write_script(bin_dir, "makeblastdb", MAKEBLASTDB)?;
    write_script(
        bin_dir,
        "blastp",
        &BLASTP.replace("__HITS__", &table.to_string_lossy()),
    )?;
    Ok(())
}

/// Install a `blastp` that prints `stderr` and exits with `code`
pub fn install_failing_blast_mock(bin_dir: &Path, stderr: &str, code: i32) -> Result<()> {
    write_script(bin_dir, "makeblastdb", MAKEBLASTDB)?;
    write_script(
        bin_dir,
        "blastp",
        &format!("echo '{}' >&2\nexit {}", stderr.replace('\'', ""), code),
    )?;
    Ok(())
}
